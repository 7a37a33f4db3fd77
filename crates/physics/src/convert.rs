//! Conversions between engine math (glam, Euler radians) and the solver's
//! nalgebra types.

use glam::Vec3;
use rapier3d::na::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};

pub fn to_na_vector(v: Vec3) -> Vector3<f32> {
    Vector3::new(v.x, v.y, v.z)
}

pub fn to_na_point(v: Vec3) -> Point3<f32> {
    Point3::new(v.x, v.y, v.z)
}

pub fn from_na_vector(v: &Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn from_na_point(p: &Point3<f32>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

/// Euler angles (radians, roll/pitch/yaw about X/Y/Z) to a unit quaternion.
pub fn quat_from_euler(euler: Vec3) -> UnitQuaternion<f32> {
    UnitQuaternion::from_euler_angles(euler.x, euler.y, euler.z)
}

/// Unit quaternion back to Euler angles (roll/pitch/yaw).
pub fn euler_from_quat(quat: &UnitQuaternion<f32>) -> Vec3 {
    let (roll, pitch, yaw) = quat.euler_angles();
    Vec3::new(roll, pitch, yaw)
}

/// Position + Euler rotation as a solver isometry.
pub fn to_isometry(position: Vec3, euler: Vec3) -> Isometry3<f32> {
    Isometry3::from_parts(
        Translation3::new(position.x, position.y, position.z),
        quat_from_euler(euler),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_round_trip() {
        let v = Vec3::new(1.5, -2.0, 3.25);
        assert_eq!(from_na_vector(&to_na_vector(v)), v);
        assert_eq!(from_na_point(&to_na_point(v)), v);
    }

    #[test]
    fn euler_round_trip() {
        let e = Vec3::new(0.3, -0.7, 1.1);
        let back = euler_from_quat(&quat_from_euler(e));
        assert!((back - e).length() < 1e-5);
    }

    #[test]
    fn isometry_carries_position() {
        let iso = to_isometry(Vec3::new(4.0, 5.0, 6.0), Vec3::ZERO);
        assert_eq!(from_na_vector(&iso.translation.vector), Vec3::new(4.0, 5.0, 6.0));
    }
}
