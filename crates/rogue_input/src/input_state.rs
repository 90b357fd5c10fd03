//! Keyboard and mouse state turned into named input axes
//!
//! Controls:
//! - W/S or Up/Down: "Vertical" axis (forward/backward)
//! - A/D or Left/Right: "Horizontal" axis (strafe)
//! - Mouse motion: "Mouse X" / "Mouse Y" (up is positive)

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// A named input axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
    MouseX,
    MouseY,
}

impl Axis {
    pub const ALL: [Axis; 4] = [Axis::Horizontal, Axis::Vertical, Axis::MouseX, Axis::MouseY];

    /// Canonical axis name
    pub fn name(self) -> &'static str {
        match self {
            Axis::Horizontal => "Horizontal",
            Axis::Vertical => "Vertical",
            Axis::MouseX => "Mouse X",
            Axis::MouseY => "Mouse Y",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown axis name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAxis(pub String);

impl fmt::Display for UnknownAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown input axis '{}'", self.0)
    }
}

impl std::error::Error for UnknownAxis {}

impl FromStr for Axis {
    type Err = UnknownAxis;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Axis::ALL
            .into_iter()
            .find(|axis| axis.name() == s)
            .ok_or_else(|| UnknownAxis(s.to_string()))
    }
}

/// Source of per-frame input for the controllers
pub trait InputSource {
    /// Current value of an axis; digital axes are in [-1, 1]
    fn axis(&self, axis: Axis) -> f32;

    /// Pointer motion this frame as ("Mouse X", "Mouse Y")
    fn pointer_delta(&self) -> (f32, f32) {
        (self.axis(Axis::MouseX), self.axis(Axis::MouseY))
    }
}

/// Smoothing for the digital axes
#[derive(Clone, Debug, PartialEq)]
pub struct AxisSettings {
    /// Rate (units/s) at which an axis moves toward a pressed direction
    pub sensitivity: f32,
    /// Rate (units/s) at which an axis falls back to zero when released
    pub gravity: f32,
    /// Jump to zero when the opposite direction is pressed
    pub snap: bool,
    /// Multiplier from raw mouse counts to "Mouse X"/"Mouse Y" units
    pub pointer_scale: f32,
}

impl Default for AxisSettings {
    fn default() -> Self {
        Self {
            sensitivity: 3.0,
            gravity: 3.0,
            snap: true,
            pointer_scale: 0.1,
        }
    }
}

const VERTICAL_KEYS: AxisKeys = AxisKeys {
    positive: [KeyCode::KeyW, KeyCode::ArrowUp],
    negative: [KeyCode::KeyS, KeyCode::ArrowDown],
};

const HORIZONTAL_KEYS: AxisKeys = AxisKeys {
    positive: [KeyCode::KeyD, KeyCode::ArrowRight],
    negative: [KeyCode::KeyA, KeyCode::ArrowLeft],
};

/// Physical keys driving one digital axis
struct AxisKeys {
    positive: [KeyCode; 2],
    negative: [KeyCode; 2],
}

impl AxisKeys {
    fn contains(&self, key: KeyCode) -> bool {
        self.positive.contains(&key) || self.negative.contains(&key)
    }

    /// -1, 0 or 1 depending on which directions have at least one key held
    fn target(&self, held: &HashSet<KeyCode>) -> f32 {
        let positive = self.positive.iter().any(|k| held.contains(k));
        let negative = self.negative.iter().any(|k| held.contains(k));
        (positive as i32 - negative as i32) as f32
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct DigitalAxis {
    value: f32,
}

impl DigitalAxis {
    fn update(&mut self, target: f32, settings: &AxisSettings, dt: f32) {
        if target != 0.0 {
            if settings.snap && self.value != 0.0 && self.value.signum() != target.signum() {
                self.value = 0.0;
            }
            self.value = move_towards(self.value, target, settings.sensitivity * dt);
        } else {
            self.value = move_towards(self.value, 0.0, settings.gravity * dt);
        }
    }
}

fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Keyboard and mouse accumulator implementing [`InputSource`]
#[derive(Clone, Debug, Default)]
pub struct InputState {
    held: HashSet<KeyCode>,
    horizontal: DigitalAxis,
    vertical: DigitalAxis,
    pending_x: f32,
    pending_y: f32,
    pub settings: AxisSettings,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: AxisSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Process keyboard input
    ///
    /// Returns true if the key drives one of the axes.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        if !VERTICAL_KEYS.contains(key) && !HORIZONTAL_KEYS.contains(key) {
            return false;
        }

        match state {
            ElementState::Pressed => self.held.insert(key),
            ElementState::Released => self.held.remove(&key),
        };
        true
    }

    /// Process raw mouse movement (device counts, +y is down)
    pub fn process_mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        self.pending_x += delta_x as f32;
        self.pending_y += delta_y as f32;
    }

    /// Advance axis smoothing by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        let horizontal = HORIZONTAL_KEYS.target(&self.held);
        let vertical = VERTICAL_KEYS.target(&self.held);
        self.horizontal.update(horizontal, &self.settings, dt);
        self.vertical.update(vertical, &self.settings, dt);
    }

    /// Clear per-frame pointer motion
    pub fn end_frame(&mut self) {
        self.pending_x = 0.0;
        self.pending_y = 0.0;
    }

    /// Release every key and drop smoothed values, e.g. on focus loss
    pub fn clear(&mut self) {
        self.held.clear();
        self.horizontal = DigitalAxis::default();
        self.vertical = DigitalAxis::default();
        self.end_frame();
    }

    /// Check if any movement keys are pressed
    pub fn is_moving(&self) -> bool {
        HORIZONTAL_KEYS.target(&self.held) != 0.0 || VERTICAL_KEYS.target(&self.held) != 0.0
    }
}

impl InputSource for InputState {
    fn axis(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.horizontal.value,
            Axis::Vertical => self.vertical.value,
            Axis::MouseX => self.pending_x * self.settings.pointer_scale,
            Axis::MouseY => -self.pending_y * self.settings.pointer_scale,
        }
    }
}
