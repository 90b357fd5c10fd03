//! First-person locomotion
//!
//! Ground check, gravity along the body's own up axis, and planar movement
//! driven through a [`CollisionBackend`]. Horizontal velocity never carries
//! over between ticks: the controller only remembers its speed along up.

use crate::collision::CollisionLayer;
use crate::world::{BodyKey, CollisionBackend};
use rogue_core::{NodeKey, TransformHierarchy};
use rogue_math::Vec3;
use std::fmt;

/// Default planar movement speed (units per second)
pub const DEFAULT_MOVEMENT_SPEED: f32 = 12.0;

/// Default gravity acceleration along the body's up axis
pub const DEFAULT_GRAVITY: f32 = -9.81;

/// Default radius of the ground probe sphere
pub const DEFAULT_GROUND_CHECK_RADIUS: f32 = 0.4;

/// Tuning for [`MovementController`]
#[derive(Clone, Debug, PartialEq)]
pub struct MovementSettings {
    /// Planar speed; negative values invert the controls
    pub speed: f32,
    /// Signed acceleration along the body's up axis
    pub gravity: f32,
    pub ground_check_radius: f32,
    /// Layers that count as ground
    pub ground_mask: CollisionLayer,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            speed: DEFAULT_MOVEMENT_SPEED,
            gravity: DEFAULT_GRAVITY,
            ground_check_radius: DEFAULT_GROUND_CHECK_RADIUS,
            ground_mask: CollisionLayer::GROUND | CollisionLayer::STATIC,
        }
    }
}

impl MovementSettings {
    /// Reject settings that would poison the simulation
    pub fn validate(&self) -> Result<(), MovementConfigError> {
        for (name, value) in [
            ("speed", self.speed),
            ("gravity", self.gravity),
            ("ground_check_radius", self.ground_check_radius),
        ] {
            if !value.is_finite() {
                return Err(MovementConfigError::NotFinite(name));
            }
        }
        if self.ground_check_radius < 0.0 {
            return Err(MovementConfigError::NegativeGroundCheckRadius(self.ground_check_radius));
        }
        Ok(())
    }
}

/// Invalid movement settings
#[derive(Debug, Clone, PartialEq)]
pub enum MovementConfigError {
    NegativeGroundCheckRadius(f32),
    NotFinite(&'static str),
}

impl fmt::Display for MovementConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovementConfigError::NegativeGroundCheckRadius(r) => {
                write!(f, "ground check radius must be non-negative, got {}", r)
            }
            MovementConfigError::NotFinite(field) => {
                write!(f, "movement setting '{}' must be finite", field)
            }
        }
    }
}

impl std::error::Error for MovementConfigError {}

/// Directional input for one tick, each axis in [-1, 1]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveInput {
    /// Positive moves along the body's forward vector
    pub forward: f32,
    /// Positive moves along the body's right vector
    pub sideways: f32,
}

impl MoveInput {
    pub fn new(forward: f32, sideways: f32) -> Self {
        Self { forward, sideways }
    }
}

/// What one movement tick did
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementOutput {
    pub grounded: bool,
    /// Velocity handed to the collision move, before re-projection onto up
    pub pre_move_velocity: Vec3,
    /// Displacement requested from the collision backend
    pub attempted: Vec3,
    /// Displacement the backend actually applied
    pub applied: Vec3,
}

/// Drives a body node and its capsule from directional input and gravity
#[derive(Clone, Debug)]
pub struct MovementController {
    settings: MovementSettings,
    body: NodeKey,
    capsule: BodyKey,
    velocity: Vec3,
    grounded: bool,
}

impl MovementController {
    pub fn new(settings: MovementSettings, body: NodeKey, capsule: BodyKey) -> Self {
        Self {
            settings,
            body,
            capsule,
            velocity: Vec3::ZERO,
            grounded: false,
        }
    }

    pub fn settings(&self) -> &MovementSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut MovementSettings {
        &mut self.settings
    }

    pub fn body(&self) -> NodeKey {
        self.body
    }

    pub fn capsule(&self) -> BodyKey {
        self.capsule
    }

    /// Persistent velocity; only its component along up survives a tick
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Ground contact as of the last tick
    pub fn grounded(&self) -> bool {
        self.grounded
    }

    /// Drop any stored velocity, e.g. after teleporting the body
    pub fn reset(&mut self) {
        self.velocity = Vec3::ZERO;
        self.grounded = false;
    }

    /// Advance one simulation step
    pub fn tick(
        &mut self,
        input: MoveInput,
        dt: f32,
        hierarchy: &mut dyn TransformHierarchy,
        collision: &mut dyn CollisionBackend,
    ) -> MovementOutput {
        let position = hierarchy.world_position(self.body);
        let basis = hierarchy.basis(self.body);
        let s = &self.settings;

        self.grounded = collision.overlap_sphere(position, s.ground_check_radius, s.ground_mask);

        let up_speed = self.velocity.scalar_projection(basis.up);
        if self.grounded && up_speed < 0.0 {
            self.velocity = Vec3::ZERO;
        }

        self.velocity += basis.forward * (input.forward * s.speed)
            + basis.right * (input.sideways * s.speed)
            + basis.up * (s.gravity * dt);

        let pre_move_velocity = self.velocity;
        let attempted = self.velocity * dt;
        let applied = collision.move_and_collide(hierarchy, self.capsule, attempted);

        self.velocity = self.velocity.project_onto(basis.up);

        log::trace!(
            "movement: grounded={} up_speed={} attempted={:?} applied={:?}",
            self.grounded, up_speed, attempted, applied
        );

        MovementOutput {
            grounded: self.grounded,
            pre_move_velocity,
            attempted,
            applied,
        }
    }
}
