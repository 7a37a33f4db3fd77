use crate::body::{BodyDesc, BodyKind, CollisionShape};
use crate::convert;
use glam::Vec3;
use rapier3d::parry::query::RayCast;
use rapier3d::prelude::{
    CCDSolver, ColliderBuilder, ColliderSet, DefaultBroadPhase, ImpulseJointSet,
    IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase, PhysicsPipeline, Ray,
    RigidBodyBuilder, RigidBodyHandle, RigidBodySet,
};
use rapier3d::na::Vector3;

/// Result of a ray cast against the world's colliders.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// The body the hit collider is attached to.
    pub body: Option<RigidBodyHandle>,
    /// Distance along the (normalized) ray direction.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
}

/// Shape and pose of one collider, for debug visualization.
#[derive(Debug, Clone, Copy)]
pub struct DebugCollider {
    pub position: Vec3,
    pub rotation: Vec3,
    pub shape: CollisionShape,
}

/// The simulated world: rigid bodies, colliders, and the stepping pipeline.
///
/// Mutated only from the tick loop; one `step()` advances exactly one fixed
/// timestep.
pub struct PhysicsWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    gravity: Vector3<f32>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::with_gravity(Vec3::new(0.0, -9.81, 0.0))
    }

    pub fn with_gravity(gravity: Vec3) -> Self {
        Self {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            gravity: convert::to_na_vector(gravity),
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// The fixed timestep one `step()` advances, in seconds.
    pub fn timestep(&self) -> f32 {
        self.integration_parameters.dt
    }

    /// Advance the simulation by one fixed step.
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    /// Insert a body and its collider, returning the body handle.
    pub fn add_body(&mut self, desc: &BodyDesc) -> RigidBodyHandle {
        let builder = match desc.kind {
            BodyKind::Static => RigidBodyBuilder::fixed(),
            BodyKind::Dynamic => RigidBodyBuilder::dynamic().additional_mass(desc.mass),
        };
        let mut builder = builder.position(convert::to_isometry(desc.position, desc.rotation));
        if desc.fixed_rotation {
            builder = builder.lock_rotations();
        }
        let handle = self.bodies.insert(builder);

        let collider = match desc.shape {
            CollisionShape::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            CollisionShape::Ball { radius } => ColliderBuilder::ball(radius),
            CollisionShape::Cylinder {
                half_height,
                radius,
            } => ColliderBuilder::cylinder(half_height, radius),
        }
        .translation(convert::to_na_vector(desc.offset))
        .friction(desc.friction);
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        tracing::debug!(kind = ?desc.kind, shape = ?desc.shape, "body added");
        handle
    }

    /// Remove a body and its colliders. No-op (returns false) when the
    /// handle is already gone.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> bool {
        if !self.bodies.contains(handle) {
            return false;
        }
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        tracing::debug!(?handle, "body removed");
        true
    }

    pub fn contains(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_dynamic(&self, handle: RigidBodyHandle) -> bool {
        self.bodies
            .get(handle)
            .map(|b| b.is_dynamic())
            .unwrap_or(false)
    }

    pub fn translation(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.bodies
            .get(handle)
            .map(|b| convert::from_na_vector(b.translation()))
    }

    pub fn set_translation(&mut self, handle: RigidBodyHandle, position: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_translation(convert::to_na_vector(position), true);
        }
    }

    /// Body orientation as Euler angles (radians).
    pub fn rotation_euler(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.bodies
            .get(handle)
            .map(|b| convert::euler_from_quat(b.rotation()))
    }

    pub fn linear_velocity(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.bodies
            .get(handle)
            .map(|b| convert::from_na_vector(b.linvel()))
    }

    pub fn angular_velocity(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.bodies
            .get(handle)
            .map(|b| convert::from_na_vector(b.angvel()))
    }

    pub fn set_linear_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_linvel(convert::to_na_vector(velocity), true);
        }
    }

    pub fn set_angular_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_angvel(convert::to_na_vector(velocity), true);
        }
    }

    /// Cast a ray and return the nearest hit within `max_distance`.
    ///
    /// The direction is normalized internally, so `distance` is metric.
    pub fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }
        let ray = Ray::new(
            convert::to_na_point(origin),
            convert::to_na_vector(direction),
        );

        let mut best: Option<RayHit> = None;
        for (_, collider) in self.colliders.iter() {
            let Some(toi) =
                collider
                    .shape()
                    .cast_ray(collider.position(), &ray, max_distance, true)
            else {
                continue;
            };
            if best.map_or(true, |b| toi < b.distance) {
                best = Some(RayHit {
                    body: collider.parent(),
                    distance: toi,
                    point: origin + direction * toi,
                });
            }
        }
        best
    }

    /// Shapes and poses of all colliders, for debug wireframes.
    pub fn debug_colliders(&self) -> Vec<DebugCollider> {
        let mut out = Vec::new();
        for (_, collider) in self.colliders.iter() {
            let shape = if let Some(cuboid) = collider.shape().as_cuboid() {
                CollisionShape::Cuboid {
                    half_extents: convert::from_na_vector(&cuboid.half_extents),
                }
            } else if let Some(ball) = collider.shape().as_ball() {
                CollisionShape::Ball {
                    radius: ball.radius,
                }
            } else if let Some(cylinder) = collider.shape().as_cylinder() {
                CollisionShape::Cylinder {
                    half_height: cylinder.half_height,
                    radius: cylinder.radius,
                }
            } else {
                continue;
            };
            let position = collider.position();
            out.push(DebugCollider {
                position: convert::from_na_vector(&position.translation.vector),
                rotation: convert::euler_from_quat(&position.rotation),
                shape,
            });
        }
        out
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
