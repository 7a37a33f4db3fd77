//! Locomotion: controller input mapped to player movement.
//!
//! # Invariants
//! - Movement strategies never touch `Entity` internals; they go through
//!   the scene's movement entry points, so body and visual stay in step.
//! - New modes extend [`MovementMode`]; the entity type stays closed.

mod frame;
mod movement;

pub use frame::{ControlMode, ControllerFrame, ControllerPose};
pub use movement::{DashMove, FreeMove, MovementMode, PlayerRig, TeleportAim, Teleporter};

pub fn crate_info() -> &'static str {
    "playspace-locomotion v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("locomotion"));
    }
}
