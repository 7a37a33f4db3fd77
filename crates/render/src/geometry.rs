use std::sync::atomic::{AtomicBool, Ordering};

/// The fixed closed set of geometry shapes a scene can carry.
///
/// Primitive variants hold the dimensional parameters a backend needs to
/// tessellate them; `TriangleMesh` covers imported model geometry, which
/// arrives already triangulated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryKind {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
    Cone {
        radius: f32,
        height: f32,
        radial_segments: u32,
        height_segments: u32,
    },
    Circle {
        radius: f32,
        segments: u32,
    },
    Plane {
        width: f32,
        height: f32,
    },
    Torus {
        radius: f32,
        tube_radius: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
    TriangleMesh {
        vertex_count: u32,
        index_count: u32,
    },
}

impl GeometryKind {
    /// Short tag for logs and the debug renderer.
    pub fn tag(&self) -> &'static str {
        match self {
            GeometryKind::Box { .. } => "box",
            GeometryKind::Sphere { .. } => "sphere",
            GeometryKind::Cylinder { .. } => "cylinder",
            GeometryKind::Cone { .. } => "cone",
            GeometryKind::Circle { .. } => "circle",
            GeometryKind::Plane { .. } => "plane",
            GeometryKind::Torus { .. } => "torus",
            GeometryKind::TriangleMesh { .. } => "triangle_mesh",
        }
    }
}

/// A geometry resource.
///
/// Backends own the uploaded buffers; `dispose` marks the native side
/// released. Disposal is driven externally (asset cache eviction walks
/// shared geometries with a visited set), so `dispose` itself only has to
/// be idempotent.
#[derive(Debug)]
pub struct Geometry {
    kind: GeometryKind,
    disposed: AtomicBool,
}

impl Geometry {
    pub fn new(kind: GeometryKind) -> Self {
        Self {
            kind,
            disposed: AtomicBool::new(false),
        }
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    /// Release the native resources. Returns true the first time only.
    pub fn dispose(&self) -> bool {
        !self.disposed.swap(true, Ordering::AcqRel)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispose_is_idempotent() {
        let g = Geometry::new(GeometryKind::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        });
        assert!(!g.is_disposed());
        assert!(g.dispose());
        assert!(!g.dispose());
        assert!(g.is_disposed());
    }

    #[test]
    fn kind_tags() {
        let g = Geometry::new(GeometryKind::Sphere {
            radius: 0.5,
            width_segments: 32,
            height_segments: 16,
        });
        assert_eq!(g.kind().tag(), "sphere");
    }
}
