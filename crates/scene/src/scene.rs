use crate::entity::Entity;
use glam::Vec3;
use playspace_assets::{AssetLoader, Model, ResourceCache};
use playspace_common::{EntityId, Transform};
use playspace_physics::{CollisionShape, PhysicsWorld};
use playspace_render::{
    Color, Geometry, GeometryKind, GraphError, Material, MeshRef, Node, NodeId, RenderView,
    Renderer, SceneGraph, TextureBinding,
};
use std::sync::Arc;

/// Marker for an active immersive session.
///
/// Session plumbing (device negotiation, reference spaces) belongs to the
/// platform layer; the scene only tracks whether one is running so pause
/// handling can account for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XrSession {
    /// Frame number the session started at.
    pub started_frame: u64,
}

/// The scene orchestrator: graph + physics + entity registry + pause state.
///
/// An explicitly constructed service — build one, pass it around. The
/// registry hands out ids in insertion order; removal tombstones the slot
/// so earlier ids stay valid and dead slots receive no updates.
pub struct GameScene {
    graph: SceneGraph,
    physics: PhysicsWorld,
    entities: Vec<Option<Entity>>,
    paused: bool,
    debug_collisions: bool,
    debug_nodes: Vec<NodeId>,
    frame: u64,
    xr_session: Option<XrSession>,
    update_hook: Option<Box<dyn FnMut(f64)>>,
}

impl GameScene {
    pub fn new() -> Self {
        Self {
            graph: SceneGraph::new(),
            physics: PhysicsWorld::new(),
            entities: Vec::new(),
            paused: false,
            debug_collisions: false,
            debug_nodes: Vec::new(),
            frame: 0,
            xr_session: None,
            update_hook: None,
        }
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Toggle the pause state. Physics stepping is gated on it; `Pause`
    /// process-mode entities update only while it is set.
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            tracing::info!(paused, "scene pause state changed");
        }
        self.paused = paused;
    }

    pub fn set_debug_collisions(&mut self, enabled: bool) {
        self.debug_collisions = enabled;
    }

    pub fn set_background(&mut self, binding: Option<TextureBinding>) {
        self.graph.set_background(binding);
    }

    /// Install the per-frame user callback, invoked after entity updates.
    pub fn set_update_hook(&mut self, hook: impl FnMut(f64) + 'static) {
        self.update_hook = Some(Box::new(hook));
    }

    pub fn begin_xr_session(&mut self) -> XrSession {
        let session = XrSession {
            started_frame: self.frame,
        };
        self.xr_session = Some(session);
        tracing::info!(frame = self.frame, "XR session started");
        session
    }

    pub fn end_xr_session(&mut self) {
        if self.xr_session.take().is_some() {
            tracing::info!(frame = self.frame, "XR session ended");
        }
    }

    pub fn xr_session(&self) -> Option<XrSession> {
        self.xr_session
    }

    /// Attach a node under the world-root container.
    pub fn add_to_world(&mut self, node: Node) -> Result<NodeId, GraphError> {
        let root = self.graph.root();
        self.graph.attach(root, node)
    }

    /// Remove a node (and its subtree) from the world. No-op when already
    /// gone.
    pub fn remove_from_world(&mut self, id: NodeId) {
        self.graph.remove(id);
    }

    /// Register an entity. Its pending body (if any) attaches immediately,
    /// so entities added after the bulk load need no second pass.
    pub fn add_entity(&mut self, mut entity: Entity) -> EntityId {
        entity.attach_body(&mut self.physics);
        let id = EntityId(self.entities.len() as u32);
        tracing::debug!(id = id.0, name = entity.name(), "entity registered");
        self.entities.push(Some(entity));
        id
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index()).and_then(Option::as_ref)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// First entity carrying the given name. Names are not unique; the
    /// earliest registration wins.
    pub fn find_entity_by_name(&self, name: &str) -> Option<(EntityId, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|e| (EntityId(i as u32), e)))
            .find(|(_, e)| e.name() == name)
    }

    /// Entity owning the given physics body, if any.
    pub fn find_entity_by_body(
        &self,
        handle: playspace_physics::RigidBodyHandle,
    ) -> Option<(EntityId, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|e| (EntityId(i as u32), e)))
            .find(|(_, e)| e.body() == Some(handle))
    }

    /// Move an entity, keeping its body and visual in lockstep. The entry
    /// point for teleport/dash locomotion.
    pub fn set_entity_origin(&mut self, id: EntityId, origin: Vec3) -> bool {
        let Some(entity) = self.entities.get_mut(id.index()).and_then(Option::as_mut) else {
            return false;
        };
        entity.set_origin(origin);
        if let Some(handle) = entity.body() {
            self.physics.set_translation(handle, origin);
        }
        if let Some(node) = entity.visual().and_then(|v| self.graph.node_mut(v)) {
            node.transform.position = origin;
        }
        true
    }

    /// Live entities, in registration order.
    pub fn entity_count(&self) -> usize {
        self.entities.iter().filter(|slot| slot.is_some()).count()
    }

    /// Destroy the entity and tombstone its slot. The id stops resolving
    /// and the slot receives no further updates; other ids are unaffected.
    pub fn remove_entity<L>(&mut self, id: EntityId, models: &ResourceCache<L>) -> bool
    where
        L: AssetLoader<Asset = Model>,
    {
        let Some(slot) = self.entities.get_mut(id.index()) else {
            return false;
        };
        let Some(mut entity) = slot.take() else {
            return false;
        };
        entity.destroy(&mut self.graph, &mut self.physics, models);
        tracing::debug!(id = id.0, "entity removed");
        true
    }

    /// Resolve visuals and attach bodies for every registered entity, in
    /// registration order. Resource failures degrade: the entity is left
    /// without a visual and the failure is logged.
    pub fn load<L>(&mut self, models: &ResourceCache<L>)
    where
        L: AssetLoader<Asset = Model>,
    {
        for slot in &mut self.entities {
            let Some(entity) = slot.as_mut() else {
                continue;
            };
            if let Err(err) = entity.load(models, &mut self.graph) {
                tracing::warn!(
                    entity = entity.name(),
                    model = entity.model_name(),
                    error = %err,
                    "entity visual failed to load"
                );
            }
            entity.attach_body(&mut self.physics);
        }
    }

    /// Advance one frame: step physics (unless paused), update entities in
    /// registration order, refresh debug shapes, run the user hook.
    ///
    /// Rendering is the fifth step; call [`GameScene::render`] with the
    /// frame's output target, or use [`GameScene::frame`] to do both.
    pub fn update(&mut self, time: f64) {
        if !self.paused {
            self.physics.step();
        }

        for slot in &mut self.entities {
            let Some(entity) = slot.as_mut() else {
                continue;
            };
            // One entity's failure never takes the frame down.
            if let Err(err) = entity.update(self.paused, &mut self.graph, &self.physics) {
                tracing::warn!(entity = entity.name(), error = %err, "entity update failed");
            }
        }

        if self.debug_collisions {
            self.refresh_debug_collisions();
        }

        if let Some(hook) = self.update_hook.as_mut() {
            hook(time);
        }
        self.frame += 1;
    }

    pub fn render<R: Renderer>(&self, renderer: &R, view: &RenderView) -> R::Output {
        renderer.render(&self.graph, view)
    }

    /// One full frame: update then render.
    pub fn frame<R: Renderer>(&mut self, time: f64, renderer: &R, view: &RenderView) -> R::Output {
        self.update(time);
        self.render(renderer, view)
    }

    /// Rebuild the wireframe nodes mirroring the physics colliders.
    fn refresh_debug_collisions(&mut self) {
        for id in self.debug_nodes.drain(..) {
            self.graph.remove(id);
        }
        let root = self.graph.root();
        for (i, collider) in self.physics.debug_colliders().into_iter().enumerate() {
            let kind = match collider.shape {
                CollisionShape::Cuboid { half_extents } => GeometryKind::Box {
                    width: half_extents.x * 2.0,
                    height: half_extents.y * 2.0,
                    depth: half_extents.z * 2.0,
                },
                CollisionShape::Ball { radius } => GeometryKind::Sphere {
                    radius,
                    width_segments: 8,
                    height_segments: 6,
                },
                CollisionShape::Cylinder {
                    half_height,
                    radius,
                } => GeometryKind::Cylinder {
                    radius_top: radius,
                    radius_bottom: radius,
                    height: half_height * 2.0,
                    radial_segments: 8,
                },
            };
            let node = Node::new(format!("debug_collider_{i}"))
                .with_transform(Transform {
                    position: collider.position,
                    rotation: collider.rotation,
                    scale: Vec3::ONE,
                })
                .with_mesh(MeshRef {
                    geometry: Arc::new(Geometry::new(kind)),
                    material: Arc::new(Material::basic(Color::new(0.0, 1.0, 0.3))),
                });
            if let Ok(id) = self.graph.attach(root, node) {
                self.debug_nodes.push(id);
            }
        }
    }
}

impl Default for GameScene {
    fn default() -> Self {
        Self::new()
    }
}
