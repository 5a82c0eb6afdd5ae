// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Object placement: translation plus axis/angle rotation

use crate::utils::math::{deg_to_rad, rad_to_deg};
use nalgebra::{Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Rotation about `axis` by `angle` degrees (right-handed).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub axis: Vector3<f64>,
    pub angle: f64,
}

impl Rotation {
    pub fn identity() -> Self {
        Self {
            axis: Vector3::z(),
            angle: 0.0,
        }
    }

    pub fn from_axis_angle(axis: Vector3<f64>, angle: f64) -> Self {
        Self { axis, angle }
    }

    pub fn from_quaternion(q: &UnitQuaternion<f64>) -> Self {
        match q.axis_angle() {
            Some((axis, angle)) => Self {
                axis: axis.into_inner(),
                angle: rad_to_deg(angle),
            },
            None => Self::identity(),
        }
    }

    /// A zero-length axis is treated as no rotation.
    pub fn to_quaternion(&self) -> UnitQuaternion<f64> {
        match Unit::try_new(self.axis, 1e-12) {
            Some(axis) => UnitQuaternion::from_axis_angle(&axis, deg_to_rad(self.angle)),
            None => UnitQuaternion::identity(),
        }
    }

    /// Rotation angle in radians, in `[0, π]`.
    pub fn angle_rad(&self) -> f64 {
        self.to_quaternion().angle()
    }

    pub fn is_identity(&self, tolerance: f64) -> bool {
        self.angle_rad() <= tolerance
    }

    /// Yaw, pitch and roll in degrees for the `z-y'-x''` convention,
    /// i.e. `R = Rz(yaw) * Ry(pitch) * Rx(roll)`.
    pub fn to_euler(&self) -> [f64; 3] {
        let (roll, pitch, yaw) = self.to_quaternion().euler_angles();
        [rad_to_deg(yaw), rad_to_deg(pitch), rad_to_deg(roll)]
    }

    pub fn rotate(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.to_quaternion() * v
    }

    /// Rotation taking `self`'s frame to `other`'s.
    pub fn relative_to(&self, other: &Rotation) -> Rotation {
        Rotation::from_quaternion(&(self.to_quaternion().inverse() * other.to_quaternion()))
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::identity()
    }
}

/// Translation and rotation of a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placement {
    pub base: Vector3<f64>,
    pub rotation: Rotation,
}

impl Placement {
    pub fn identity() -> Self {
        Self {
            base: Vector3::zeros(),
            rotation: Rotation::identity(),
        }
    }

    pub fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            base: Vector3::new(x, y, z),
            rotation: Rotation::identity(),
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Translation after moving the anchor by `delta`, expressed in the
    /// object's own rotated frame.
    pub fn adjusted(&self, delta: &Vector3<f64>) -> Vector3<f64> {
        self.base + self.rotation.rotate(delta)
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_rotation() {
        let rot = Rotation::identity();
        assert!(rot.is_identity(1e-12));
        assert_eq!(rot.to_euler(), [0.0, 0.0, 0.0]);

        let degenerate = Rotation::from_axis_angle(Vector3::zeros(), 45.0);
        assert!(degenerate.is_identity(1e-12));
    }

    #[test]
    fn test_euler_about_z() {
        let rot = Rotation::from_axis_angle(Vector3::z(), 90.0);
        let [yaw, pitch, roll] = rot.to_euler();
        assert_relative_eq!(yaw, 90.0, epsilon = 1e-9);
        assert_relative_eq!(pitch, 0.0, epsilon = 1e-9);
        assert_relative_eq!(roll, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_euler_about_x() {
        let rot = Rotation::from_axis_angle(Vector3::x(), 30.0);
        let [yaw, pitch, roll] = rot.to_euler();
        assert_relative_eq!(yaw, 0.0, epsilon = 1e-9);
        assert_relative_eq!(pitch, 0.0, epsilon = 1e-9);
        assert_relative_eq!(roll, 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_adjusted_delta_follows_rotation() {
        let placement = Placement::from_translation(1.0, 2.0, 3.0)
            .with_rotation(Rotation::from_axis_angle(Vector3::z(), 90.0));
        let moved = placement.adjusted(&Vector3::new(5.0, 0.0, 0.0));
        assert_relative_eq!(moved, Vector3::new(1.0, 7.0, 3.0), epsilon = 1e-9);
    }

    #[test]
    fn test_relative_rotation() {
        let a = Rotation::from_axis_angle(Vector3::z(), 30.0);
        let b = Rotation::from_axis_angle(Vector3::z(), 30.0);
        assert!(a.relative_to(&b).is_identity(1e-9));

        let c = Rotation::from_axis_angle(Vector3::z(), 75.0);
        assert_relative_eq!(a.relative_to(&c).angle, 45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_placement_deserializes_with_defaults() {
        let placement: Placement = serde_json::from_str(r#"{"base": [1, 2, 3]}"#).unwrap();
        assert_eq!(placement.base, Vector3::new(1.0, 2.0, 3.0));
        assert!(placement.rotation.is_identity(0.0));
    }
}
