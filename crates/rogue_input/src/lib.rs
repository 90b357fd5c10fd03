//! Input handling for Rogue
//!
//! Keyboard/mouse events become named axes ([`InputState`]), the pointer lock
//! is abstracted behind [`PointerLock`], and [`LookController`] turns pointer
//! motion into body yaw and camera pitch.

mod cursor;
mod input_state;
mod look_controller;

pub use cursor::{CursorLockMode, PointerLock, SoftwarePointerLock};
pub use input_state::{Axis, AxisSettings, InputSource, InputState, UnknownAxis};
pub use look_controller::{pitch_rotation, LookConfigError, LookController, LookOutput, LookSettings};
