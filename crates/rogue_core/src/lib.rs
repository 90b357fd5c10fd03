//! Core types for Rogue
//!
//! This crate provides the transform hierarchy the controllers operate on:
//!
//! - [`Transform`] - Position and rotation relative to a parent
//! - [`TransformHierarchy`] - Read/write contract for a hierarchy of transforms
//! - [`SceneGraph`] - Slotmap-backed implementation of [`TransformHierarchy`]
//! - [`NodeKey`] - Generational key to a node in the graph
//! - [`Basis`] - World-space forward/right/up vectors of a node

mod transform;
mod scene_graph;

pub use transform::Transform;
pub use scene_graph::{Basis, Node, NodeKey, SceneGraph, SceneGraphError, TransformHierarchy};

// Re-export commonly used types from rogue_math for convenience
pub use rogue_math::{Quat, Vec3};
