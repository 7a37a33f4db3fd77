use crate::geometry::Geometry;
use crate::material::Material;
use crate::texture::TextureBinding;
use playspace_common::Transform;
use std::sync::Arc;

/// Handle to a node in a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Errors from scene graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("node {0:?} does not exist")]
    NodeNotFound(NodeId),
}

/// Geometry + material pair rendered at a node.
#[derive(Debug, Clone)]
pub struct MeshRef {
    pub geometry: Arc<Geometry>,
    pub material: Arc<Material>,
}

/// A node in the scene graph: a transform, optional mesh, and children.
#[derive(Debug)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub visible: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub mesh: Option<MeshRef>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            visible: true,
            cast_shadow: false,
            receive_shadow: false,
            mesh: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshRef) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena-backed scene graph rooted at the world-root container.
///
/// Gameplay-visible objects are parented under the world root; overlays and
/// debug helpers get their own subtrees. Slots are tombstoned on removal so
/// outstanding [`NodeId`]s never alias a different node.
#[derive(Debug)]
pub struct SceneGraph {
    nodes: Vec<Option<Node>>,
    root: NodeId,
    background: Option<TextureBinding>,
}

impl SceneGraph {
    pub fn new() -> Self {
        let mut graph = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            background: None,
        };
        graph.nodes.push(Some(Node::new("world_root")));
        graph.root = NodeId(0);
        graph
    }

    /// The world-root container every gameplay object hangs from.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn background(&self) -> Option<&TextureBinding> {
        self.background.as_ref()
    }

    pub fn set_background(&mut self, binding: Option<TextureBinding>) {
        self.background = binding;
    }

    /// Attach a node under `parent`, returning its id.
    pub fn attach(&mut self, parent: NodeId, mut node: Node) -> Result<NodeId, GraphError> {
        if self.node(parent).is_none() {
            return Err(GraphError::NodeNotFound(parent));
        }
        node.parent = Some(parent);
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(node));
        if let Some(p) = self.node_slot_mut(parent) {
            p.children.push(id);
        }
        Ok(id)
    }

    /// Remove a node and its entire subtree. Returns the detached node.
    /// Removing a node that is already gone is a no-op.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        if id == self.root {
            return None;
        }
        let node = self.nodes.get_mut(id.index())?.take()?;
        if let Some(parent) = node.parent {
            if let Some(p) = self.node_slot_mut(parent) {
                p.children.retain(|c| *c != id);
            }
        }
        for child in node.children.clone() {
            self.remove_subtree(child);
        }
        Some(node)
    }

    fn remove_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id.index()).and_then(Option::take) {
            for child in node.children {
                self.remove_subtree(child);
            }
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.node_slot_mut(id)
    }

    fn node_slot_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Number of live nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Depth-first walk from the root in attach order.
    pub fn traverse(&self, mut visit: impl FnMut(NodeId, &Node, usize)) {
        self.traverse_from(self.root, 0, &mut visit);
    }

    fn traverse_from(
        &self,
        id: NodeId,
        depth: usize,
        visit: &mut impl FnMut(NodeId, &Node, usize),
    ) {
        if let Some(node) = self.node(id) {
            visit(id, node, depth);
            for child in node.children() {
                self.traverse_from(*child, depth + 1, visit);
            }
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
