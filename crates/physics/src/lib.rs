//! Physics facade: rigid bodies, collision shapes, and the stepped world.
//!
//! # Invariants
//! - The world steps at a fixed timestep; state never rolls back.
//! - All mutation goes through [`PhysicsWorld`]; handles never dangle
//!   (removal is tombstoned inside rapier's arenas).
//!
//! The solver itself is rapier3d; this crate only owns composition:
//! descriptors in engine units (glam, Euler radians) in, handles out.

pub mod body;
pub mod convert;
mod world;

pub use body::{BodyDesc, BodyKind, CollisionShape};
pub use rapier3d::prelude::RigidBodyHandle;
pub use world::{DebugCollider, PhysicsWorld, RayHit};

pub fn crate_info() -> &'static str {
    "playspace-physics v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("physics"));
    }
}
