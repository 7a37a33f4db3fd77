use glam::Vec3;

/// Whether a body is simulated or pinned in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Fixed in place; collides but never moves.
    Static,
    /// Subject to gravity, forces, and velocity integration.
    Dynamic,
}

/// Collision shape in engine units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionShape {
    Cuboid { half_extents: Vec3 },
    Ball { radius: f32 },
    Cylinder { half_height: f32, radius: f32 },
}

/// Description of a rigid body and its collider.
///
/// `offset` translates the collider relative to the body origin, so a
/// body can sit at an entity's origin while its hull covers, say, the
/// torso above it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub shape: CollisionShape,
    pub position: Vec3,
    pub rotation: Vec3,
    pub offset: Vec3,
    pub mass: f32,
    pub friction: f32,
    pub fixed_rotation: bool,
}

impl BodyDesc {
    pub fn fixed(shape: CollisionShape) -> Self {
        Self {
            kind: BodyKind::Static,
            shape,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            offset: Vec3::ZERO,
            mass: 0.0,
            friction: 0.5,
            fixed_rotation: false,
        }
    }

    pub fn dynamic(shape: CollisionShape) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            mass: 1.0,
            ..Self::fixed(shape)
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn rotated(mut self, euler: Vec3) -> Self {
        self.rotation = euler;
        self
    }

    pub fn offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn lock_rotation(mut self) -> Self {
        self.fixed_rotation = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_desc_defaults() {
        let desc = BodyDesc::fixed(CollisionShape::Ball { radius: 0.5 });
        assert_eq!(desc.kind, BodyKind::Static);
        assert_eq!(desc.mass, 0.0);
        assert_eq!(desc.friction, 0.5);
        assert!(!desc.fixed_rotation);
    }

    #[test]
    fn dynamic_desc_has_mass() {
        let desc = BodyDesc::dynamic(CollisionShape::Cuboid {
            half_extents: Vec3::splat(0.25),
        })
        .at(Vec3::new(1.0, 1.0, -1.5))
        .lock_rotation();
        assert_eq!(desc.kind, BodyKind::Dynamic);
        assert_eq!(desc.mass, 1.0);
        assert!(desc.fixed_rotation);
        assert_eq!(desc.position, Vec3::new(1.0, 1.0, -1.5));
    }
}
