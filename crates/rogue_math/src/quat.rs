//! Unit quaternion for representing rotations in 3D space
//!
//! Rotations follow the right-hand rule: a positive angle about an axis turns
//! counter-clockwise when looking back down that axis toward the origin.

use serde::{Serialize, Deserialize};

use crate::{Vec3, EPSILON};

/// Rotation quaternion `w + xi + yj + zk`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    /// Identity rotation (no rotation)
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    /// Create a quaternion from raw components
    #[inline]
    pub const fn from_xyzw(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians about `axis`
    ///
    /// The axis is normalized first; a degenerate axis yields the identity.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let axis = axis.normalized();
        if axis == Vec3::ZERO {
            return Self::IDENTITY;
        }
        let half = angle * 0.5;
        let (sin_h, cos_h) = half.sin_cos();
        Self::from_xyzw(axis.x * sin_h, axis.y * sin_h, axis.z * sin_h, cos_h)
    }

    /// Rotation about the X axis
    #[inline]
    pub fn from_rotation_x(angle: f32) -> Self {
        Self::from_axis_angle(Vec3::X, angle)
    }

    /// Rotation about the Y axis
    #[inline]
    pub fn from_rotation_y(angle: f32) -> Self {
        Self::from_axis_angle(Vec3::Y, angle)
    }

    /// Rotation about the Z axis
    #[inline]
    pub fn from_rotation_z(angle: f32) -> Self {
        Self::from_axis_angle(Vec3::Z, angle)
    }

    /// The vector part (x, y, z)
    #[inline]
    fn xyz(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    #[inline]
    pub fn length_squared(&self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Normalize to unit length, falling back to identity for a zero quaternion
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > EPSILON {
            let inv = 1.0 / len;
            Self::from_xyzw(self.x * inv, self.y * inv, self.z * inv, self.w * inv)
        } else {
            Self::IDENTITY
        }
    }

    /// Conjugate; the inverse rotation for unit quaternions
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self::from_xyzw(-self.x, -self.y, -self.z, self.w)
    }

    /// Compose two rotations: the result applies `other` first, then `self`
    pub fn compose(&self, other: &Self) -> Self {
        let a = self.xyz();
        let b = other.xyz();
        let v = b * self.w + a * other.w + a.cross(b);
        Self::from_xyzw(v.x, v.y, v.z, self.w * other.w - a.dot(b))
    }

    /// Rotate a vector
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        let q = self.xyz();
        let t = q.cross(v) * 2.0;
        v + t * self.w + q.cross(t)
    }

    /// Angle in radians between two rotations
    pub fn angle_between(&self, other: &Self) -> f32 {
        let d = self.normalize().dot(&other.normalize()).abs().min(1.0);
        2.0 * d.acos()
    }

    /// True if every component is finite
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }
}

impl std::ops::Mul for Quat {
    type Output = Self;
    #[inline]
    fn mul(self, other: Self) -> Self {
        self.compose(&other)
    }
}

impl std::ops::Mul<Vec3> for Quat {
    type Output = Vec3;
    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        self.rotate(v)
    }
}
