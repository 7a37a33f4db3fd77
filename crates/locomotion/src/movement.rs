use crate::frame::{ControlMode, ControllerFrame};
use glam::{Vec2, Vec3};
use playspace_common::EntityId;
use playspace_scene::GameScene;

/// Name marker for surfaces the teleporter accepts.
const TELEPORTABLE_MARKER: &str = "TELEPORTABLE";

/// Continuous movement along the controller's facing.
///
/// Axis X strafes; axis Y moves along the view direction, with the
/// forward direction boosted 2×.
#[derive(Debug, Clone, Copy)]
pub struct FreeMove {
    /// Meters per frame at full stick deflection.
    pub speed: f32,
}

impl Default for FreeMove {
    fn default() -> Self {
        Self { speed: 0.01 }
    }
}

impl FreeMove {
    pub fn update(&self, scene: &mut GameScene, player: EntityId, frame: &ControllerFrame) {
        if frame.axes == Vec2::ZERO {
            return;
        }
        let boost = if frame.axes.y < 0.0 { 2.0 } else { 1.0 };
        let local = Vec3::new(
            frame.axes.x * self.speed,
            0.0,
            frame.axes.y * self.speed * boost,
        );
        let delta = frame.pose.orientation * local;
        let Some(origin) = scene.entity(player).map(|e| e.origin()) else {
            return;
        };
        scene.set_entity_origin(player, origin + delta);
    }
}

/// Result of one teleport aim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeleportAim {
    /// Where the ray landed, if it landed at all.
    pub point: Option<Vec3>,
    /// Whether releasing now would teleport there.
    pub teleportable: bool,
}

/// Cooldown-gated point-and-jump teleportation.
///
/// `aim` casts against the physics world each frame the trigger is held;
/// `release` commits to the last accepted point and starts the cooldown.
#[derive(Debug, Clone, Copy)]
pub struct Teleporter {
    /// Ray reach in meters.
    pub range: f32,
    cooldown: f32,
    last_point: Option<Vec3>,
}

impl Teleporter {
    /// Cooldown between teleports, in seconds.
    pub const MAX_COOLDOWN: f32 = 1.0;

    pub fn new(range: f32) -> Self {
        Self {
            range,
            cooldown: 0.0,
            last_point: None,
        }
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Advance the cooldown timer.
    pub fn update(&mut self, dt: f32) {
        self.cooldown = (self.cooldown - dt).max(0.0);
    }

    /// Cast from the controller and record the landing point if the hit
    /// surface accepts teleports and the cooldown has elapsed.
    pub fn aim(&mut self, scene: &GameScene, origin: Vec3, direction: Vec3) -> TeleportAim {
        let Some(hit) = scene.physics().cast_ray(origin, direction, self.range) else {
            self.last_point = None;
            return TeleportAim {
                point: None,
                teleportable: false,
            };
        };
        let teleportable = hit
            .body
            .and_then(|b| scene.find_entity_by_body(b))
            .is_some_and(|(_, e)| e.name().contains(TELEPORTABLE_MARKER));

        if teleportable && self.cooldown <= 0.0 {
            self.last_point = Some(hit.point);
            TeleportAim {
                point: Some(hit.point),
                teleportable: true,
            }
        } else {
            TeleportAim {
                point: Some(hit.point),
                teleportable: false,
            }
        }
    }

    /// Commit the aimed teleport. Returns the landing point, or `None`
    /// while cooling down or with nothing aimed.
    pub fn release(&mut self) -> Option<Vec3> {
        if self.cooldown > 0.0 {
            return None;
        }
        self.cooldown = Self::MAX_COOLDOWN;
        self.last_point.take()
    }
}

/// Teleport variant that glides to the accepted point instead of jumping.
#[derive(Debug, Clone, Copy)]
pub struct DashMove {
    /// Glide speed in meters per second.
    pub speed: f32,
    target: Option<Vec3>,
}

impl Default for DashMove {
    fn default() -> Self {
        Self {
            speed: 5.0,
            target: None,
        }
    }
}

impl DashMove {
    pub fn start(&mut self, target: Vec3) {
        self.target = Some(target);
    }

    pub fn active(&self) -> bool {
        self.target.is_some()
    }

    /// Move the player toward the target, never overshooting; clears the
    /// target on arrival.
    pub fn update(&mut self, scene: &mut GameScene, player: EntityId, dt: f32) {
        let Some(target) = self.target else {
            return;
        };
        let Some(origin) = scene.entity(player).map(|e| e.origin()) else {
            self.target = None;
            return;
        };
        let to_target = target - origin;
        let step = self.speed * dt;
        if to_target.length() <= step {
            scene.set_entity_origin(player, target);
            self.target = None;
        } else {
            scene.set_entity_origin(player, origin + to_target.normalize() * step);
        }
    }
}

/// Movement strategy, selected per rig. Adding a mode means adding a
/// variant here; the entity type stays untouched.
#[derive(Debug)]
pub enum MovementMode {
    Free(FreeMove),
    Teleport(Teleporter),
    Dash {
        teleporter: Teleporter,
        dash: DashMove,
    },
}

/// A player: an entity driven by one movement strategy.
#[derive(Debug)]
pub struct PlayerRig {
    pub entity: EntityId,
    pub mode: MovementMode,
    /// While `Ui`, input belongs to an overlay and locomotion stands down.
    pub control_mode: ControlMode,
}

impl PlayerRig {
    pub fn new(entity: EntityId, mode: MovementMode) -> Self {
        Self {
            entity,
            mode,
            control_mode: ControlMode::Default,
        }
    }

    /// Consume one input frame.
    pub fn update(&mut self, scene: &mut GameScene, frame: &ControllerFrame, dt: f32) {
        if self.control_mode == ControlMode::Ui {
            return;
        }
        match &mut self.mode {
            MovementMode::Free(free) => free.update(scene, self.entity, frame),
            MovementMode::Teleport(teleporter) => {
                teleporter.update(dt);
                if frame.select_pressed {
                    let (origin, direction) = aim_ray(frame);
                    teleporter.aim(scene, origin, direction);
                }
                if frame.select_released {
                    if let Some(point) = teleporter.release() {
                        tracing::debug!(?point, "teleport");
                        scene.set_entity_origin(self.entity, point);
                    }
                }
            }
            MovementMode::Dash { teleporter, dash } => {
                teleporter.update(dt);
                if frame.select_pressed {
                    let (origin, direction) = aim_ray(frame);
                    teleporter.aim(scene, origin, direction);
                }
                if frame.select_released {
                    if let Some(point) = teleporter.release() {
                        tracing::debug!(?point, "dash started");
                        dash.start(point);
                    }
                }
                dash.update(scene, self.entity, dt);
            }
        }
    }
}

/// The controller's pointing ray: forward is -Z in controller space.
fn aim_ray(frame: &ControllerFrame) -> (Vec3, Vec3) {
    (
        frame.pose.position,
        frame.pose.orientation * Vec3::NEG_Z,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ControllerPose;
    use glam::Quat;
    use playspace_physics::{BodyDesc, CollisionShape};
    use playspace_scene::Entity;
    use std::f32::consts::FRAC_PI_2;

    fn scene_with_player() -> (GameScene, EntityId) {
        let mut scene = GameScene::new();
        let mut player = Entity::new(Vec3::ZERO);
        player.set_name("player");
        let id = scene.add_entity(player);
        (scene, id)
    }

    fn add_floor(scene: &mut GameScene, name: &str) {
        let mut floor = Entity::new(Vec3::ZERO);
        floor.set_name(name);
        floor.set_body_desc(BodyDesc::fixed(CollisionShape::Cuboid {
            half_extents: Vec3::new(5.0, 0.1, 5.0),
        }));
        scene.add_entity(floor);
    }

    #[test]
    fn free_move_strafes_along_x() {
        let (mut scene, player) = scene_with_player();
        let free = FreeMove::default();
        free.update(&mut scene, player, &ControllerFrame::with_axes(1.0, 0.0));
        let origin = scene.entity(player).unwrap().origin();
        assert!((origin.x - 0.01).abs() < 1e-6);
        assert_eq!(origin.y, 0.0);
    }

    #[test]
    fn free_move_forward_gets_double_speed() {
        let (mut scene, player) = scene_with_player();
        let free = FreeMove::default();
        free.update(&mut scene, player, &ControllerFrame::with_axes(0.0, -1.0));
        assert!((scene.entity(player).unwrap().origin().z + 0.02).abs() < 1e-6);

        // Backward is not boosted.
        let (mut scene, player) = scene_with_player();
        free.update(&mut scene, player, &ControllerFrame::with_axes(0.0, 1.0));
        assert!((scene.entity(player).unwrap().origin().z - 0.01).abs() < 1e-6);
    }

    #[test]
    fn free_move_follows_controller_facing() {
        let (mut scene, player) = scene_with_player();
        let mut frame = ControllerFrame::with_axes(0.0, -1.0);
        frame.pose.orientation = Quat::from_rotation_y(FRAC_PI_2);
        FreeMove::default().update(&mut scene, player, &frame);

        // Facing 90° left, forward input moves along -X.
        let origin = scene.entity(player).unwrap().origin();
        assert!((origin.x + 0.02).abs() < 1e-5);
        assert!(origin.z.abs() < 1e-5);
    }

    #[test]
    fn teleporter_accepts_marked_surfaces_only() {
        let (mut scene, _player) = scene_with_player();
        add_floor(&mut scene, "TELEPORTABLE_ground");

        let mut teleporter = Teleporter::new(20.0);
        let aim = teleporter.aim(&scene, Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        assert!(aim.teleportable);
        let point = aim.point.unwrap();
        assert!((point.y - 0.1).abs() < 1e-3);

        let landing = teleporter.release().expect("release should teleport");
        assert_eq!(landing, point);
    }

    #[test]
    fn teleporter_rejects_unmarked_surfaces() {
        let (mut scene, _player) = scene_with_player();
        add_floor(&mut scene, "plain_floor");

        let mut teleporter = Teleporter::new(20.0);
        let aim = teleporter.aim(&scene, Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        assert!(aim.point.is_some());
        assert!(!aim.teleportable);
        assert!(teleporter.release().is_none());
    }

    #[test]
    fn teleporter_cooldown_gates_releases() {
        let (mut scene, _player) = scene_with_player();
        add_floor(&mut scene, "TELEPORTABLE_ground");

        let mut teleporter = Teleporter::new(20.0);
        teleporter.aim(&scene, Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        assert!(teleporter.release().is_some());
        assert_eq!(teleporter.cooldown(), Teleporter::MAX_COOLDOWN);

        // Cooling down: aims are not accepted and release does nothing.
        let aim = teleporter.aim(&scene, Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        assert!(!aim.teleportable);
        assert!(teleporter.release().is_none());

        teleporter.update(Teleporter::MAX_COOLDOWN + 0.1);
        let aim = teleporter.aim(&scene, Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        assert!(aim.teleportable);
    }

    #[test]
    fn teleporter_miss_clears_last_point() {
        let (mut scene, _player) = scene_with_player();
        add_floor(&mut scene, "TELEPORTABLE_ground");

        let mut teleporter = Teleporter::new(20.0);
        teleporter.aim(&scene, Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        // Aim into the void: the stored point must not survive.
        teleporter.aim(&scene, Vec3::new(0.0, 5.0, 0.0), Vec3::Y);
        assert!(teleporter.release().is_none());
    }

    #[test]
    fn dash_approaches_without_overshoot() {
        let (mut scene, player) = scene_with_player();
        let mut dash = DashMove::default();
        dash.start(Vec3::new(10.0, 0.0, 0.0));

        dash.update(&mut scene, player, 0.1);
        let origin = scene.entity(player).unwrap().origin();
        assert!((origin.x - 0.5).abs() < 1e-5);
        assert!(dash.active());

        // Run long enough to arrive; position snaps exactly to the target.
        for _ in 0..30 {
            dash.update(&mut scene, player, 0.1);
        }
        assert_eq!(
            scene.entity(player).unwrap().origin(),
            Vec3::new(10.0, 0.0, 0.0)
        );
        assert!(!dash.active());
    }

    #[test]
    fn rig_teleports_on_release() {
        let (mut scene, player) = scene_with_player();
        add_floor(&mut scene, "TELEPORTABLE_ground");
        let mut rig = PlayerRig::new(player, MovementMode::Teleport(Teleporter::new(20.0)));

        let pose = ControllerPose {
            position: Vec3::new(0.0, 5.0, 0.0),
            orientation: Quat::from_rotation_x(-FRAC_PI_2),
        };
        let hold = ControllerFrame {
            pose,
            select_pressed: true,
            ..Default::default()
        };
        rig.update(&mut scene, &hold, 0.016);

        let release = ControllerFrame {
            pose,
            select_released: true,
            ..Default::default()
        };
        rig.update(&mut scene, &release, 0.016);

        let origin = scene.entity(player).unwrap().origin();
        assert!((origin.y - 0.1).abs() < 1e-3);
    }

    #[test]
    fn rig_ignores_input_in_ui_mode() {
        let (mut scene, player) = scene_with_player();
        let mut rig = PlayerRig::new(player, MovementMode::Free(FreeMove::default()));
        rig.control_mode = ControlMode::Ui;

        rig.update(&mut scene, &ControllerFrame::with_axes(1.0, -1.0), 0.016);
        assert_eq!(scene.entity(player).unwrap().origin(), Vec3::ZERO);

        rig.control_mode = ControlMode::Default;
        rig.update(&mut scene, &ControllerFrame::with_axes(1.0, 0.0), 0.016);
        assert!(scene.entity(player).unwrap().origin().x > 0.0);
    }

    #[test]
    fn rig_dash_glides_to_target() {
        let (mut scene, player) = scene_with_player();
        add_floor(&mut scene, "TELEPORTABLE_ground");
        let mut rig = PlayerRig::new(
            player,
            MovementMode::Dash {
                teleporter: Teleporter::new(20.0),
                dash: DashMove::default(),
            },
        );

        let pose = ControllerPose {
            position: Vec3::new(3.0, 5.0, 0.0),
            orientation: Quat::from_rotation_x(-FRAC_PI_2),
        };
        rig.update(
            &mut scene,
            &ControllerFrame {
                pose,
                select_pressed: true,
                ..Default::default()
            },
            0.016,
        );
        rig.update(
            &mut scene,
            &ControllerFrame {
                pose,
                select_released: true,
                ..Default::default()
            },
            0.016,
        );

        // Gliding, not jumping: after a few frames the player is between
        // start and target.
        let neutral = ControllerFrame {
            pose,
            ..Default::default()
        };
        rig.update(&mut scene, &neutral, 0.1);
        let mid = scene.entity(player).unwrap().origin();
        assert!(mid.length() > 0.0);
        assert!((mid - Vec3::new(3.0, 0.1, 0.0)).length() > 0.1);

        for _ in 0..50 {
            rig.update(&mut scene, &neutral, 0.1);
        }
        let end = scene.entity(player).unwrap().origin();
        assert!((end - Vec3::new(3.0, 0.1, 0.0)).length() < 1e-3);
    }
}
