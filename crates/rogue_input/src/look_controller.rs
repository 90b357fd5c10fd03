//! First-person look controller
//!
//! Pointer motion turns the body about the world up axis (yaw) and tilts the
//! camera child about its local X axis (pitch). Pitch is stored and clamped;
//! yaw is applied incrementally to the body and never stored.
//!
//! Conventions: positive pitch looks down, positive yaw turns right.

use crate::cursor::{CursorLockMode, PointerLock};
use rogue_core::{NodeKey, TransformHierarchy};
use rogue_math::{Quat, Vec3};
use std::fmt;

/// Tuning for [`LookController`]
#[derive(Clone, Debug, PartialEq)]
pub struct LookSettings {
    /// Degrees of yaw per unit of "Mouse X" per second
    pub sensitivity_x: f32,
    /// Degrees of pitch per unit of "Mouse Y" per second
    pub sensitivity_y: f32,
    pub invert_y: bool,
    /// Lowest pitch in degrees, within [-90, 90]
    pub pitch_min: f32,
    /// Highest pitch in degrees, within [-90, 90]
    pub pitch_max: f32,
}

impl Default for LookSettings {
    fn default() -> Self {
        Self {
            sensitivity_x: 100.0,
            sensitivity_y: 100.0,
            invert_y: false,
            pitch_min: -90.0,
            pitch_max: 90.0,
        }
    }
}

impl LookSettings {
    pub const PITCH_LIMIT: f32 = 90.0;

    pub fn validate(&self) -> Result<(), LookConfigError> {
        for (name, value) in [
            ("sensitivity_x", self.sensitivity_x),
            ("sensitivity_y", self.sensitivity_y),
            ("pitch_min", self.pitch_min),
            ("pitch_max", self.pitch_max),
        ] {
            if !value.is_finite() {
                return Err(LookConfigError::NotFinite(name));
            }
        }
        for value in [self.pitch_min, self.pitch_max] {
            if value.abs() > Self::PITCH_LIMIT {
                return Err(LookConfigError::PitchOutOfRange(value));
            }
        }
        if self.pitch_min > self.pitch_max {
            return Err(LookConfigError::PitchRangeInverted {
                min: self.pitch_min,
                max: self.pitch_max,
            });
        }
        for value in [self.sensitivity_x, self.sensitivity_y] {
            if value < 0.0 {
                return Err(LookConfigError::NegativeSensitivity(value));
            }
        }
        Ok(())
    }

    /// Midpoint of the pitch range
    pub fn initial_pitch(&self) -> f32 {
        (self.pitch_max - self.pitch_min) / 2.0 + self.pitch_min
    }
}

/// Invalid look settings
#[derive(Debug, Clone, PartialEq)]
pub enum LookConfigError {
    PitchOutOfRange(f32),
    PitchRangeInverted { min: f32, max: f32 },
    NegativeSensitivity(f32),
    NotFinite(&'static str),
}

impl fmt::Display for LookConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookConfigError::PitchOutOfRange(v) => {
                write!(f, "pitch limit {} is outside [-90, 90]", v)
            }
            LookConfigError::PitchRangeInverted { min, max } => {
                write!(f, "pitch_min {} is greater than pitch_max {}", min, max)
            }
            LookConfigError::NegativeSensitivity(v) => {
                write!(f, "look sensitivity must be non-negative, got {}", v)
            }
            LookConfigError::NotFinite(field) => {
                write!(f, "look setting '{}' must be finite", field)
            }
        }
    }
}

impl std::error::Error for LookConfigError {}

/// What one look tick did
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LookOutput {
    /// Camera pitch after clamping, in degrees
    pub pitch: f32,
    /// Yaw applied to the body this tick, in degrees (positive is right)
    pub yaw: f32,
}

/// Drives body yaw and camera pitch from pointer motion
#[derive(Clone, Debug)]
pub struct LookController {
    settings: LookSettings,
    body: NodeKey,
    camera: NodeKey,
    pitch: f32,
    saved_lock_mode: Option<CursorLockMode>,
}

impl LookController {
    /// Create a controller with pitch at the middle of its range
    pub fn new(settings: LookSettings, body: NodeKey, camera: NodeKey) -> Self {
        let pitch = settings.initial_pitch();
        Self {
            settings,
            body,
            camera,
            pitch,
            saved_lock_mode: None,
        }
    }

    pub fn settings(&self) -> &LookSettings {
        &self.settings
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Override the stored pitch; clamped to the configured range
    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.settings.pitch_min, self.settings.pitch_max);
    }

    pub fn body(&self) -> NodeKey {
        self.body
    }

    pub fn camera(&self) -> NodeKey {
        self.camera
    }

    pub fn is_enabled(&self) -> bool {
        self.saved_lock_mode.is_some()
    }

    /// Remember the current pointer lock and lock the pointer
    ///
    /// Enabling twice keeps the first snapshot.
    pub fn enable(&mut self, lock: &mut dyn PointerLock) {
        if self.saved_lock_mode.is_some() {
            return;
        }
        let previous = lock.lock_mode();
        self.saved_lock_mode = Some(previous);
        lock.set_lock_mode(CursorLockMode::Locked);
        log::debug!("look enabled, saved pointer lock {:?}", previous);
    }

    /// Put the pointer lock back to what it was at [`enable`](Self::enable)
    pub fn disable(&mut self, lock: &mut dyn PointerLock) {
        if let Some(previous) = self.saved_lock_mode.take() {
            lock.set_lock_mode(previous);
            log::debug!("look disabled, restored pointer lock {:?}", previous);
        }
    }

    /// Apply one frame of pointer motion
    ///
    /// `dx`/`dy` are "Mouse X"/"Mouse Y" axis values (up is positive).
    pub fn tick(
        &mut self,
        dx: f32,
        dy: f32,
        dt: f32,
        hierarchy: &mut dyn TransformHierarchy,
    ) -> LookOutput {
        let yaw_delta = dx * self.settings.sensitivity_x;
        let pitch_delta = dy * self.settings.sensitivity_y;

        if self.settings.invert_y {
            self.pitch += pitch_delta * dt;
        } else {
            self.pitch -= pitch_delta * dt;
        }
        self.pitch = self.pitch.clamp(self.settings.pitch_min, self.settings.pitch_max);

        hierarchy.set_local_rotation(self.camera, pitch_rotation(self.pitch));

        let yaw = yaw_delta * dt;
        if yaw != 0.0 {
            // Right-handed about +Y turns left, so a right turn is negative
            hierarchy.rotate_world(self.body, Vec3::UP, -yaw);
        }

        log::trace!("look: pitch={} yaw={}", self.pitch, yaw);
        LookOutput { pitch: self.pitch, yaw }
    }
}

/// Camera-local rotation for a pitch in degrees (positive looks down)
pub fn pitch_rotation(pitch_degrees: f32) -> Quat {
    Quat::from_rotation_x(-pitch_degrees.to_radians())
}
