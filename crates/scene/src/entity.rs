use glam::Vec3;
use playspace_assets::{AssetLoader, Model, ModelNode, ResourceCache, ResourceError};
use playspace_common::{ProcessMode, Transform};
use playspace_physics::{BodyDesc, PhysicsWorld, RigidBodyHandle};
use playspace_render::{GraphError, Node, NodeId, SceneGraph};

/// Errors isolated per entity during a frame update.
#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    #[error("entity '{name}' reached a non-finite rotation")]
    NonFiniteRotation { name: String },
    #[error("entity '{name}' refers to a body that is no longer in the world")]
    StaleBody { name: String },
}

/// A composition unit: transform + optional visual node + optional physics
/// body + velocity state.
///
/// With a dynamic body attached, physics is authoritative: every update
/// copies the body pose and velocities onto the entity and its visual.
/// Without one, rotation integrates from the entity's angular velocity
/// directly (manual spin).
#[derive(Debug)]
pub struct Entity {
    origin: Vec3,
    rotation: Vec3,
    scale: f32,
    linear_velocity: Vec3,
    angular_velocity: Vec3,
    visual: Option<NodeId>,
    body: Option<RigidBodyHandle>,
    pending_body: Option<BodyDesc>,
    model_name: String,
    model_acquired: bool,
    name: String,
    process_mode: ProcessMode,
}

impl Entity {
    pub fn new(origin: Vec3) -> Self {
        Self {
            origin,
            rotation: Vec3::ZERO,
            scale: 1.0,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            visual: None,
            body: None,
            pending_body: None,
            model_name: String::new(),
            model_acquired: false,
            name: String::new(),
            process_mode: ProcessMode::Normal,
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Vec3) {
        self.origin = origin;
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn set_model_name(&mut self, model_name: impl Into<String>) {
        self.model_name = model_name.into();
    }

    pub fn process_mode(&self) -> ProcessMode {
        self.process_mode
    }

    pub fn set_process_mode(&mut self, mode: ProcessMode) {
        self.process_mode = mode;
    }

    pub fn visual(&self) -> Option<NodeId> {
        self.visual
    }

    pub fn set_visual(&mut self, node: NodeId) {
        self.visual = Some(node);
    }

    pub fn body(&self) -> Option<RigidBodyHandle> {
        self.body
    }

    /// Describe the body this entity should get; it attaches when the
    /// entity is registered with a scene (or at bulk load).
    pub fn set_body_desc(&mut self, desc: BodyDesc) {
        self.pending_body = Some(desc);
    }

    pub fn linear_velocity(&self) -> Vec3 {
        self.linear_velocity
    }

    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    /// Set the linear velocity, pushing it into the attached body so cached
    /// and simulated state stay consistent.
    pub fn set_linear_velocity(&mut self, velocity: Vec3, physics: &mut PhysicsWorld) {
        self.linear_velocity = velocity;
        if let Some(handle) = self.body {
            physics.set_linear_velocity(handle, velocity);
        }
    }

    /// Set the angular velocity, pushing it into the attached body.
    pub fn set_angular_velocity(&mut self, velocity: Vec3, physics: &mut PhysicsWorld) {
        self.angular_velocity = velocity;
        if let Some(handle) = self.body {
            physics.set_angular_velocity(handle, velocity);
        }
    }

    /// Insert the pending body into the world, carrying cached velocities
    /// over. No-op when a body is already attached or none is described.
    pub fn attach_body(&mut self, physics: &mut PhysicsWorld) {
        if self.body.is_some() {
            return;
        }
        if let Some(desc) = self.pending_body.take() {
            let handle = physics.add_body(&desc);
            if self.linear_velocity != Vec3::ZERO {
                physics.set_linear_velocity(handle, self.linear_velocity);
            }
            if self.angular_velocity != Vec3::ZERO {
                physics.set_angular_velocity(handle, self.angular_velocity);
            }
            self.body = Some(handle);
        }
    }

    /// Resolve `model_name` into a visual node tree under the world root.
    ///
    /// No-op when the entity has no model name or already owns a visual.
    pub fn load<L>(
        &mut self,
        models: &ResourceCache<L>,
        graph: &mut SceneGraph,
    ) -> Result<(), SceneLoadError>
    where
        L: AssetLoader<Asset = Model>,
    {
        if self.model_name.is_empty() || self.visual.is_some() {
            return Ok(());
        }
        let model = models.acquire(&self.model_name)?;
        self.model_acquired = true;

        let root_transform = Transform {
            position: self.origin,
            rotation: self.rotation,
            scale: Vec3::splat(self.scale),
        };
        let world_root = graph.root();
        let root = instantiate_node(graph, world_root, &model.root, Some(root_transform))?;
        self.visual = Some(root);
        Ok(())
    }

    /// Synchronize this entity for one frame.
    ///
    /// Runs only when the pause state matches the entity's process mode:
    /// `Normal` entities update while running, `Pause` entities while
    /// paused.
    pub fn update(
        &mut self,
        paused: bool,
        graph: &mut SceneGraph,
        physics: &PhysicsWorld,
    ) -> Result<(), EntityError> {
        if (self.process_mode == ProcessMode::Normal) == paused {
            return Ok(());
        }

        let dynamic_body = self.body.filter(|h| physics.is_dynamic(*h));
        if let Some(handle) = dynamic_body {
            let (Some(position), Some(rotation)) =
                (physics.translation(handle), physics.rotation_euler(handle))
            else {
                return Err(EntityError::StaleBody {
                    name: self.name.clone(),
                });
            };
            self.origin = position;
            self.rotation = rotation;
            self.linear_velocity = physics.linear_velocity(handle).unwrap_or(Vec3::ZERO);
            self.angular_velocity = physics.angular_velocity(handle).unwrap_or(Vec3::ZERO);

            if let Some(node) = self.visual.and_then(|id| graph.node_mut(id)) {
                node.transform.position = position;
                node.transform.rotation = rotation;
            }
        } else if let Some(node) = self.visual.and_then(|id| graph.node_mut(id)) {
            // Manual spin: plain Euler accumulation, no normalization.
            let rotation = node.transform.rotation + self.angular_velocity;
            if !rotation.is_finite() {
                return Err(EntityError::NonFiniteRotation {
                    name: self.name.clone(),
                });
            }
            node.transform.rotation = rotation;
            self.rotation = rotation;
        }
        Ok(())
    }

    /// Release the model reference, detach the visual, and remove the body.
    /// Safe to call more than once.
    pub fn destroy<L>(
        &mut self,
        graph: &mut SceneGraph,
        physics: &mut PhysicsWorld,
        models: &ResourceCache<L>,
    ) where
        L: AssetLoader<Asset = Model>,
    {
        if self.model_acquired {
            models.release(&self.model_name);
            self.model_acquired = false;
        }
        self.pending_body = None;
        if let Some(id) = self.visual.take() {
            graph.remove(id);
        }
        if let Some(handle) = self.body.take() {
            physics.remove_body(handle);
        }
    }
}

/// Errors from resolving an entity's visual.
#[derive(Debug, thiserror::Error)]
pub enum SceneLoadError {
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

fn instantiate_node(
    graph: &mut SceneGraph,
    parent: NodeId,
    proto: &ModelNode,
    override_transform: Option<Transform>,
) -> Result<NodeId, GraphError> {
    let mut node =
        Node::new(proto.name.clone()).with_transform(override_transform.unwrap_or(proto.transform));
    if let Some(mesh) = &proto.mesh {
        node = node.with_mesh(mesh.clone());
    }
    let id = graph.attach(parent, node)?;
    for child in &proto.children {
        instantiate_node(graph, id, child, None)?;
    }
    Ok(id)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use playspace_render::{Color, Geometry, GeometryKind, Material, MeshRef};
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Model loader that fabricates a one-node model per filename.
    #[derive(Default)]
    pub struct StubModelLoader {
        pub loads: AtomicU32,
        pub missing: bool,
    }

    impl AssetLoader for StubModelLoader {
        type Asset = Model;

        fn load(&self, path: &Path) -> Result<Model, ResourceError> {
            if self.missing {
                return Err(ResourceError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            self.loads.fetch_add(1, Ordering::SeqCst);
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(Model {
                name: name.clone(),
                root: ModelNode {
                    name,
                    transform: Transform::default(),
                    mesh: Some(MeshRef {
                        geometry: Arc::new(Geometry::new(GeometryKind::TriangleMesh {
                            vertex_count: 8,
                            index_count: 12,
                        })),
                        material: Arc::new(Material::basic(Color::WHITE)),
                    }),
                    children: Vec::new(),
                },
            })
        }
    }

    pub fn stub_models() -> ResourceCache<StubModelLoader> {
        ResourceCache::new(StubModelLoader::default(), "assets/mdl")
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::stub_models;
    use super::*;
    use playspace_physics::CollisionShape;

    fn cube_desc() -> BodyDesc {
        BodyDesc::dynamic(CollisionShape::Cuboid {
            half_extents: Vec3::splat(0.5),
        })
    }

    #[test]
    fn load_resolves_model_once() {
        let models = stub_models();
        let mut graph = SceneGraph::new();
        let mut entity = Entity::new(Vec3::new(0.0, 1.0, -2.0));
        entity.set_model_name("crate.glb");
        entity.set_scale(0.5);

        entity.load(&models, &mut graph).unwrap();
        let visual = entity.visual().expect("visual assigned");
        let node = graph.node(visual).unwrap();
        assert_eq!(node.transform.position, Vec3::new(0.0, 1.0, -2.0));
        assert_eq!(node.transform.scale, Vec3::splat(0.5));

        // Second load is a no-op: the visual already exists.
        entity.load(&models, &mut graph).unwrap();
        assert_eq!(models.ref_count("crate.glb"), Some(1));
    }

    #[test]
    fn load_without_model_name_is_noop() {
        let models = stub_models();
        let mut graph = SceneGraph::new();
        let mut entity = Entity::new(Vec3::ZERO);
        entity.load(&models, &mut graph).unwrap();
        assert!(entity.visual().is_none());
        assert!(models.is_empty());
    }

    #[test]
    fn load_surfaces_missing_model() {
        let models = ResourceCache::new(
            super::test_support::StubModelLoader {
                missing: true,
                ..Default::default()
            },
            "assets/mdl",
        );
        let mut graph = SceneGraph::new();
        let mut entity = Entity::new(Vec3::ZERO);
        entity.set_model_name("ghost.glb");
        assert!(entity.load(&models, &mut graph).is_err());
        assert!(entity.visual().is_none());
    }

    #[test]
    fn dynamic_body_is_authoritative() {
        let models = stub_models();
        let mut graph = SceneGraph::new();
        let mut physics = PhysicsWorld::new();

        let mut entity = Entity::new(Vec3::new(0.0, 10.0, 0.0));
        entity.set_model_name("ball.glb");
        entity.set_body_desc(cube_desc().at(Vec3::new(0.0, 10.0, 0.0)));
        entity.load(&models, &mut graph).unwrap();
        entity.attach_body(&mut physics);

        for _ in 0..30 {
            physics.step();
        }
        entity.update(false, &mut graph, &physics).unwrap();

        let handle = entity.body().unwrap();
        assert_eq!(entity.origin(), physics.translation(handle).unwrap());
        assert_eq!(
            entity.linear_velocity(),
            physics.linear_velocity(handle).unwrap()
        );
        // The visual mirrors the body.
        let node = graph.node(entity.visual().unwrap()).unwrap();
        assert_eq!(node.transform.position, entity.origin());
        assert!(entity.origin().y < 10.0);
    }

    #[test]
    fn manual_spin_without_dynamic_body() {
        let models = stub_models();
        let mut graph = SceneGraph::new();
        let physics = PhysicsWorld::new();

        let mut entity = Entity::new(Vec3::ZERO);
        entity.set_model_name("windmill.glb");
        entity.load(&models, &mut graph).unwrap();

        let mut throwaway = PhysicsWorld::new();
        entity.set_angular_velocity(Vec3::new(0.0, 0.01, 0.0), &mut throwaway);

        entity.update(false, &mut graph, &physics).unwrap();
        entity.update(false, &mut graph, &physics).unwrap();
        assert!((entity.rotation().y - 0.02).abs() < 1e-6);
        // Origin untouched by physics.
        assert_eq!(entity.origin(), Vec3::ZERO);
    }

    #[test]
    fn process_mode_gates_updates() {
        let models = stub_models();
        let mut graph = SceneGraph::new();
        let physics = PhysicsWorld::new();

        let mut normal = Entity::new(Vec3::ZERO);
        normal.set_model_name("a.glb");
        normal.load(&models, &mut graph).unwrap();
        let mut throwaway = PhysicsWorld::new();
        normal.set_angular_velocity(Vec3::new(0.0, 1.0, 0.0), &mut throwaway);

        // Paused scene: a NORMAL entity must not update.
        normal.update(true, &mut graph, &physics).unwrap();
        assert_eq!(normal.rotation(), Vec3::ZERO);
        normal.update(false, &mut graph, &physics).unwrap();
        assert_eq!(normal.rotation(), Vec3::new(0.0, 1.0, 0.0));

        let mut overlay = Entity::new(Vec3::ZERO);
        overlay.set_model_name("menu.glb");
        overlay.set_process_mode(ProcessMode::Pause);
        overlay.load(&models, &mut graph).unwrap();
        overlay.set_angular_velocity(Vec3::new(0.0, 1.0, 0.0), &mut throwaway);

        // Running scene: a PAUSE entity must not update.
        overlay.update(false, &mut graph, &physics).unwrap();
        assert_eq!(overlay.rotation(), Vec3::ZERO);
        overlay.update(true, &mut graph, &physics).unwrap();
        assert_eq!(overlay.rotation(), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn destroy_is_idempotent() {
        let models = stub_models();
        let mut graph = SceneGraph::new();
        let mut physics = PhysicsWorld::new();

        let mut entity = Entity::new(Vec3::ZERO);
        entity.set_model_name("crate.glb");
        entity.set_body_desc(cube_desc());
        entity.load(&models, &mut graph).unwrap();
        entity.attach_body(&mut physics);
        let visual = entity.visual().unwrap();

        entity.destroy(&mut graph, &mut physics, &models);
        assert!(graph.node(visual).is_none());
        assert_eq!(physics.body_count(), 0);
        assert!(!models.contains("crate.glb"));

        // Second destroy: nothing left to release, nothing double-freed.
        entity.destroy(&mut graph, &mut physics, &models);
        assert!(!models.contains("crate.glb"));
    }

    #[test]
    fn destroy_without_attachments_is_noop() {
        let models = stub_models();
        let mut graph = SceneGraph::new();
        let mut physics = PhysicsWorld::new();
        let mut entity = Entity::new(Vec3::ZERO);
        entity.destroy(&mut graph, &mut physics, &models);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn velocity_setters_push_into_body() {
        let mut physics = PhysicsWorld::new();
        let mut entity = Entity::new(Vec3::ZERO);
        entity.set_body_desc(cube_desc());
        entity.attach_body(&mut physics);

        entity.set_linear_velocity(Vec3::new(0.0, 0.0, -3.0), &mut physics);
        let handle = entity.body().unwrap();
        assert_eq!(
            physics.linear_velocity(handle).unwrap(),
            Vec3::new(0.0, 0.0, -3.0)
        );
    }

    #[test]
    fn attach_body_carries_preset_velocity() {
        let mut physics = PhysicsWorld::new();
        let mut entity = Entity::new(Vec3::ZERO);
        entity.set_body_desc(cube_desc());
        // Velocity set before the body exists must survive attachment.
        let mut throwaway = PhysicsWorld::new();
        entity.set_linear_velocity(Vec3::new(2.0, 0.0, 0.0), &mut throwaway);
        entity.attach_body(&mut physics);
        assert_eq!(
            physics.linear_velocity(entity.body().unwrap()).unwrap(),
            Vec3::new(2.0, 0.0, 0.0)
        );
    }
}
