use crate::graph::SceneGraph;
use glam::Vec3;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        // Standing eye height, matching the VR camera rig.
        Self {
            eye: Vec3::new(0.0, 1.6, 0.0),
            target: Vec3::new(0.0, 1.6, -1.0),
            fov_degrees: 90.0,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene graph and a view configuration, then
/// produces output. It never mutates the graph — scene truth is owned by
/// the game scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given graph and view.
    fn render(&self, graph: &SceneGraph, view: &RenderView) -> Self::Output;
}

/// Debug text renderer — workaround for a GPU backend.
///
/// Produces a deterministic, human-readable dump of the scene graph.
/// Useful for CLI output, logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, graph: &SceneGraph, view: &RenderView) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Scene ({} nodes) ===\n",
            graph.len()
        ));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        ));
        match graph.background() {
            Some(bg) => out.push_str(&format!("Background: {}\n", bg.texture.name())),
            None => out.push_str("Background: none\n"),
        }

        graph.traverse(|_, node, depth| {
            let indent = "  ".repeat(depth + 1);
            let p = node.transform.position;
            let mesh = match &node.mesh {
                Some(m) => format!(
                    " mesh={}/{}",
                    m.geometry.kind().tag(),
                    m.material.kind.tag()
                ),
                None => String::new(),
            };
            let hidden = if node.visible { "" } else { " [hidden]" };
            out.push_str(&format!(
                "{}{} pos=({:.2}, {:.2}, {:.2}){}{}\n",
                indent, node.name, p.x, p.y, p.z, mesh, hidden
            ));
        });

        out
    }
}
