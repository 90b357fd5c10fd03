//! 3D Mathematics Library
//!
//! Vector and rotation types shared by the Rogue controller crates.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Quat`] - Unit quaternion rotation
//!
//! ## Conventions
//!
//! Right-handed, `+Y` up, `-Z` forward, `+X` right. Angles on the public
//! controller surface are in degrees; the quaternion constructors take radians.

mod vec3;
mod quat;

pub use vec3::Vec3;
pub use quat::Quat;

/// Tolerance used when deciding whether a vector is degenerate
pub const EPSILON: f32 = 1e-6;
