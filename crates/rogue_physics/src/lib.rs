//! Physics for Rogue
//!
//! This crate provides:
//! - Collision shapes (spheres, AABBs, planes, capsules)
//! - Collision detection and layer filtering
//! - A static-geometry world with kinematic capsule bodies
//! - First-person locomotion driven through [`CollisionBackend`]

pub mod collision;
pub mod movement;
pub mod shapes;
pub mod world;

// Re-export commonly used types
pub use collision::{capsule_vs_collider, sphere_vs_aabb, sphere_vs_plane, CollisionFilter, CollisionLayer, Contact};
pub use movement::{
    MoveInput, MovementConfigError, MovementController, MovementOutput, MovementSettings,
    DEFAULT_GRAVITY, DEFAULT_GROUND_CHECK_RADIUS, DEFAULT_MOVEMENT_SPEED,
};
pub use shapes::{Aabb, Capsule, Collider, Plane, Sphere};
pub use world::{BodyKey, CapsuleBody, CollisionBackend, PhysicsConfig, PhysicsWorld, StaticCollider};
