//! SceneBuilder - Declarative level construction
//!
//! Provides a fluent API for building the scene graph, physics world, and
//! player rig the controllers run against.

use rogue_core::{NodeKey, Quat, SceneGraph, SceneGraphError, Transform, TransformHierarchy};
use rogue_math::Vec3;
use rogue_physics::{
    Aabb, BodyKey, CapsuleBody, Collider, CollisionLayer, PhysicsConfig, PhysicsWorld, Sphere,
    StaticCollider,
};

use super::scene_file::{Scene, SceneLoadError};
use crate::config::CharacterConfig;

/// Handles to the player's nodes and capsule
#[derive(Clone, Copy, Debug)]
pub struct PlayerRig {
    /// Body node: carries yaw, sits at the feet
    pub body: NodeKey,
    /// Camera node: child of the body, carries pitch
    pub camera: NodeKey,
    pub capsule: BodyKey,
    /// Body transform to return to on reset
    pub spawn: Transform,
}

/// Everything the simulation mutates
pub struct Level {
    pub name: String,
    pub graph: SceneGraph,
    pub physics: PhysicsWorld,
    pub player: Option<PlayerRig>,
}

impl Level {
    /// World position of the player's feet, if there is a player
    pub fn player_position(&self) -> Option<Vec3> {
        self.player.map(|rig| self.graph.world_position(rig.body))
    }
}

/// Builder for constructing levels with physics
///
/// # Example
/// ```ignore
/// let level = SceneBuilder::new()
///     .add_floor(0.0)
///     .add_box(Vec3::new(0.0, 1.0, -5.0), Vec3::new(4.0, 1.0, 0.5))
///     .add_player(Vec3::new(0.0, 0.0, 5.0), 0.0, &CharacterConfig::default())?
///     .build();
/// ```
pub struct SceneBuilder {
    name: String,
    graph: SceneGraph,
    physics: PhysicsWorld,
    player: Option<PlayerRig>,
}

impl SceneBuilder {
    /// Create a new scene builder
    pub fn new() -> Self {
        Self {
            name: "Untitled".to_string(),
            graph: SceneGraph::new(),
            physics: PhysicsWorld::new(),
            player: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the collision solver settings
    pub fn with_physics_config(mut self, config: PhysicsConfig) -> Self {
        self.physics.config = config;
        self
    }

    /// Add a walkable floor at the given Y position
    pub fn add_floor(self, y: f32) -> Self {
        self.add_collider(StaticCollider::floor(y))
    }

    /// Add an axis-aligned box on the static layer
    pub fn add_box(self, center: Vec3, half_extents: Vec3) -> Self {
        self.add_collider(StaticCollider::new(
            Collider::Aabb(Aabb::from_center_half_extents(center, half_extents)),
            CollisionLayer::STATIC,
        ))
    }

    /// Add a sphere on the static layer
    pub fn add_sphere(self, center: Vec3, radius: f32) -> Self {
        self.add_collider(StaticCollider::new(
            Collider::Sphere(Sphere::new(center, radius)),
            CollisionLayer::STATIC,
        ))
    }

    pub fn add_collider(mut self, collider: StaticCollider) -> Self {
        self.physics.add_static_collider(collider);
        self
    }

    /// Add every collider from a scene file
    pub fn add_scene(mut self, scene: &Scene) -> Result<Self, SceneLoadError> {
        for collider in scene.static_colliders()? {
            self.physics.add_static_collider(collider);
        }
        self.name = scene.name.clone();
        Ok(self)
    }

    /// Add the player: a body node at `feet`, a camera child at eye height,
    /// and a capsule standing on the body node
    ///
    /// `yaw_degrees` turns the body right from facing -Z.
    pub fn add_player(
        mut self,
        feet: Vec3,
        yaw_degrees: f32,
        character: &CharacterConfig,
    ) -> Result<Self, SceneGraphError> {
        let spawn = Transform::from_position_rotation(
            feet,
            Quat::from_rotation_y(-yaw_degrees.to_radians()),
        );
        let body = self.graph.add_node("player", spawn);
        let camera = self.graph.add_child(
            body,
            "camera",
            Transform::from_position(Vec3::new(0.0, character.eye_height, 0.0)),
        )?;
        let capsule = self
            .physics
            .add_body(CapsuleBody::new(body, character.radius, character.height));

        self.player = Some(PlayerRig { body, camera, capsule, spawn });
        Ok(self)
    }

    /// Build the level
    pub fn build(self) -> Level {
        Level {
            name: self.name,
            graph: self.graph,
            physics: self.physics,
            player: self.player,
        }
    }
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}
