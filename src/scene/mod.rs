//! Level construction
//!
//! RON scene files, a fluent builder for the scene graph and physics world,
//! and the player that ties the controllers to its rig.

mod player;
mod scene_builder;
mod scene_file;

pub use player::Player;
pub use scene_builder::{Level, PlayerRig, SceneBuilder};
pub use scene_file::{ColliderDef, Scene, SceneLoadError, ShapeDef};
