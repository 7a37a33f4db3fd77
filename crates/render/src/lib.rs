//! Rendering Adapter: renderer-agnostic scene graph and interface.
//!
//! # Invariants
//! - Renderers read the graph; they never mutate it.
//! - Node iteration order is deterministic (attach order, depth first).
//!
//! # Workaround
//! Provides a trait-based renderer interface with a debug text renderer as a
//! workaround for a GPU backend. The trait is stable; swap in a real backend
//! without changing consumers.

mod geometry;
mod graph;
mod material;
mod renderer;
mod texture;

pub use geometry::{Geometry, GeometryKind};
pub use graph::{GraphError, MeshRef, Node, NodeId, SceneGraph};
pub use material::{Color, Material, MaterialKind};
pub use renderer::{DebugTextRenderer, RenderView, Renderer};
pub use texture::{ColorSpace, Texture, TextureBinding, TextureMapping, WrapMode};

pub fn crate_info() -> &'static str {
    "playspace-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
