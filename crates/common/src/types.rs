use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Identifier for an entity registered with a scene.
///
/// Ids are registry slot indices handed out in insertion order. A removed
/// entity leaves a tombstoned slot behind, so ids issued earlier stay valid
/// for the lifetime of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Spatial transform: position, Euler rotation (radians, XYZ order), scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// Selects whether an entity updates while the scene runs or while it is
/// paused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessMode {
    /// Update only while the scene is running.
    #[default]
    #[serde(rename = "NORMAL")]
    Normal,
    /// Update only while the scene is paused (pause menus, overlays).
    #[serde(rename = "PAUSE")]
    Pause,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Vec3::ZERO);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn transform_from_position() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn process_mode_default_is_normal() {
        assert_eq!(ProcessMode::default(), ProcessMode::Normal);
    }

    #[test]
    fn process_mode_wire_names() {
        let m: ProcessMode = serde_json::from_str("\"PAUSE\"").unwrap();
        assert_eq!(m, ProcessMode::Pause);
        let m: ProcessMode = serde_json::from_str("\"NORMAL\"").unwrap();
        assert_eq!(m, ProcessMode::Normal);
    }
}
