//! Rigid transform of a scene node relative to its parent

use rogue_math::{Quat, Vec3};
use serde::{Serialize, Deserialize};

/// Position and rotation; rigid, so directions and distances are preserved
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position relative to the parent
    pub position: Vec3,
    /// Rotation relative to the parent
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Transform a point from local space to parent space (rotate, then translate)
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation.rotate(p) + self.position
    }

    /// Transform a direction from local space to parent space
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        self.rotation.rotate(d)
    }

    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.conjugate();
        Self {
            position: rotation.rotate(-self.position),
            rotation,
        }
    }

    /// Compose two transforms: result = self * other
    ///
    /// The composed transform applies `other` first, then `self`.
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            position: self.transform_point(other.position),
            rotation: self.rotation.compose(&other.rotation).normalize(),
        }
    }

    /// Translate the transform by an offset
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Pre-multiply a rotation (applied after the current one)
    pub fn rotate(&mut self, rotation: Quat) {
        self.rotation = rotation.compose(&self.rotation).normalize();
    }

    /// Forward direction (-Z rotated into parent space)
    pub fn forward(&self) -> Vec3 {
        self.rotation.rotate(Vec3::FORWARD)
    }

    /// Right direction (+X rotated into parent space)
    pub fn right(&self) -> Vec3 {
        self.rotation.rotate(Vec3::RIGHT)
    }

    /// Up direction (+Y rotated into parent space)
    pub fn up(&self) -> Vec3 {
        self.rotation.rotate(Vec3::UP)
    }
}
