//! Host-level input handling
//!
//! Turns window events into actions on the player and the window. Movement
//! keys bypass this and go straight to `InputState`.

mod actions;

pub use actions::{ActionMap, InputAction};
