use glam::{Quat, Vec2, Vec3};

/// What the controllers currently drive.
///
/// While the scene is paused a UI layer owns the controllers; locomotion
/// ignores input until they are handed back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ControlMode {
    #[default]
    Default,
    Ui,
}

/// World-space pose of the tracked controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerPose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for ControllerPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

/// One frame of controller input.
///
/// The platform layer produces these from whatever device it talks to;
/// locomotion consumes them without knowing about sessions or devices.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControllerFrame {
    pub pose: ControllerPose,
    /// Primary thumbstick/touchpad axes, each in [-1, 1].
    pub axes: Vec2,
    /// Trigger held this frame.
    pub select_pressed: bool,
    /// Trigger released this frame (edge, not level).
    pub select_released: bool,
}

impl ControllerFrame {
    /// A frame with only stick input, facing straight ahead.
    pub fn with_axes(x: f32, y: f32) -> Self {
        Self {
            axes: Vec2::new(x, y),
            ..Default::default()
        }
    }
}
