//! Scene kernel: entity lifecycle and the tick loop.
//!
//! # Invariants
//! - Within one frame: physics step, then entity updates in registration
//!   order, then debug refresh, then the user hook, then rendering.
//! - Physics steps only while the scene is unpaused; state never rolls back.
//! - A per-entity update failure is isolated and logged, never fatal to the
//!   frame.

mod entity;
mod scene;

pub use entity::{Entity, EntityError, SceneLoadError};
pub use scene::{GameScene, XrSession};

pub fn crate_info() -> &'static str {
    "playspace-scene v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scene"));
    }
}
