//! Rogue - First-person avatar controller
//!
//! Application layer over the controller crates: configuration, RON scenes,
//! player rig construction, and the systems the binary runs every frame.

pub mod config;
pub mod input;
pub mod scene;
pub mod systems;
