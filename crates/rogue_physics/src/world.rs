//! Physics world: static geometry and kinematic capsule bodies
//!
//! [`CollisionBackend`] is the contract the movement controller drives: a
//! sphere overlap query and a collide-and-slide move for a capsule attached to
//! a scene node. [`PhysicsWorld`] implements it against a list of static
//! colliders.

use crate::collision::{capsule_vs_collider, sphere_overlaps, CollisionFilter, CollisionLayer};
use crate::shapes::{Capsule, Collider, Sphere};
use rogue_core::{NodeKey, TransformHierarchy};
use rogue_math::Vec3;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Key to a capsule body in the physics world
    pub struct BodyKey;
}

/// Collision queries consumed by the movement controller
pub trait CollisionBackend {
    /// True iff a sphere at `center` overlaps (or touches) any collider on `mask`
    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: CollisionLayer) -> bool;

    /// Move the capsule `body` by up to `displacement`, sliding along whatever
    /// it hits, and write the result to its scene node
    ///
    /// Returns the displacement actually applied.
    fn move_and_collide(
        &mut self,
        hierarchy: &mut dyn TransformHierarchy,
        body: BodyKey,
        displacement: Vec3,
    ) -> Vec3;
}

/// Static collision geometry on a layer
#[derive(Clone, Copy, Debug)]
pub struct StaticCollider {
    pub collider: Collider,
    pub layer: CollisionLayer,
}

impl StaticCollider {
    pub fn new(collider: Collider, layer: CollisionLayer) -> Self {
        Self { collider, layer }
    }

    /// A walkable floor plane at the given height
    pub fn floor(y: f32) -> Self {
        Self::new(Collider::Plane(crate::shapes::Plane::floor(y)), CollisionLayer::GROUND)
    }
}

/// A kinematic capsule attached to a scene node
///
/// The capsule is aligned with the node's up vector and centred
/// `center_height` above the node position, so with the default the node
/// sits at the capsule's feet.
#[derive(Clone, Copy, Debug)]
pub struct CapsuleBody {
    /// Scene node moved by this body
    pub node: NodeKey,
    pub radius: f32,
    /// Total height including both caps
    pub height: f32,
    /// Offset of the capsule centre along the node's up axis
    pub center_height: f32,
    /// Layers that block this body
    pub collision_mask: CollisionLayer,
}

impl CapsuleBody {
    /// Capsule standing on its node, blocked by everything except players and triggers
    pub fn new(node: NodeKey, radius: f32, height: f32) -> Self {
        Self {
            node,
            radius,
            height,
            center_height: height * 0.5,
            collision_mask: CollisionFilter::player().mask,
        }
    }

    pub fn with_collision_mask(mut self, mask: CollisionLayer) -> Self {
        self.collision_mask = mask;
        self
    }

    pub fn with_center_height(mut self, center_height: f32) -> Self {
        self.center_height = center_height;
        self
    }

    /// The capsule shape for a node at `position` with the given up vector
    pub fn capsule_at(&self, position: Vec3, up: Vec3) -> Capsule {
        let up = up.normalized();
        Capsule::from_center_axis(position + up * self.center_height, up, self.height, self.radius)
    }
}

/// Solver settings for the collide-and-slide move
#[derive(Clone, Debug)]
pub struct PhysicsConfig {
    /// Maximum push-out passes per sub-step
    pub max_depenetration_iterations: u32,
    /// Upper bound on sub-steps per move
    ///
    /// Sub-steps never exceed half the capsule radius, so this also limits
    /// how far one move can go: anything past `max_substeps * radius / 2`
    /// is dropped.
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            max_depenetration_iterations: 4,
            max_substeps: 32,
        }
    }
}

/// The physics world containing static colliders and capsule bodies
#[derive(Default)]
pub struct PhysicsWorld {
    static_colliders: Vec<StaticCollider>,
    bodies: SlotMap<BodyKey, CapsuleBody>,
    pub config: PhysicsConfig,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            static_colliders: Vec::new(),
            bodies: SlotMap::with_key(),
            config,
        }
    }

    /// Add a static collider to the world
    pub fn add_static_collider(&mut self, collider: StaticCollider) {
        self.static_colliders.push(collider);
    }

    /// Get immutable access to static colliders
    pub fn static_colliders(&self) -> &[StaticCollider] {
        &self.static_colliders
    }

    /// Add a capsule body and return its key
    pub fn add_body(&mut self, body: CapsuleBody) -> BodyKey {
        self.bodies.insert(body)
    }

    /// Remove a body from the world and return it
    pub fn remove_body(&mut self, key: BodyKey) -> Option<CapsuleBody> {
        self.bodies.remove(key)
    }

    pub fn get_body(&self, key: BodyKey) -> Option<&CapsuleBody> {
        self.bodies.get(key)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Push the capsule out of every blocking collider it penetrates
    fn depenetrate(&self, body: &CapsuleBody, mut position: Vec3, up: Vec3) -> Vec3 {
        for _ in 0..self.config.max_depenetration_iterations {
            let mut moved = false;
            for s in &self.static_colliders {
                if !s.layer.intersects(body.collision_mask) {
                    continue;
                }
                let capsule = body.capsule_at(position, up);
                if let Some(contact) = capsule_vs_collider(&capsule, &s.collider) {
                    if contact.is_colliding() {
                        // Removes the into-surface part of the motion; the tangential part survives
                        position += contact.normal * contact.penetration;
                        moved = true;
                    }
                }
            }
            if !moved {
                break;
            }
        }
        position
    }
}

impl CollisionBackend for PhysicsWorld {
    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: CollisionLayer) -> bool {
        let sphere = Sphere::new(center, radius);
        self.static_colliders
            .iter()
            .filter(|s| s.layer.intersects(mask))
            .any(|s| sphere_overlaps(&sphere, &s.collider))
    }

    fn move_and_collide(
        &mut self,
        hierarchy: &mut dyn TransformHierarchy,
        body: BodyKey,
        displacement: Vec3,
    ) -> Vec3 {
        let Some(capsule) = self.bodies.get(body).copied() else {
            log::warn!("move_and_collide on unknown body {:?}", body);
            return Vec3::ZERO;
        };

        let distance = displacement.length();
        if distance <= f32::EPSILON || !displacement.is_finite() {
            return Vec3::ZERO;
        }

        let start = hierarchy.world_position(capsule.node);
        let up = hierarchy.basis(capsule.node).up;

        // Sub-steps stay within half the radius; a move longer than the
        // sub-step budget covers is cut short instead of stretching the steps
        let max_step = (capsule.radius * 0.5).max(0.01);
        let budget = self.config.max_substeps.max(1);
        let needed = (distance / max_step).ceil() as u32;
        let (substeps, step) = if needed > budget {
            log::debug!(
                "capsule {:?}: move of {:.2} exceeds {} sub-steps, truncated to {:.2}",
                body, distance, budget, budget as f32 * max_step
            );
            (budget, displacement / distance * max_step)
        } else {
            let substeps = needed.max(1);
            (substeps, displacement / substeps as f32)
        };

        let mut position = start;
        for _ in 0..substeps {
            position = self.depenetrate(&capsule, position + step, up);
        }

        let applied = position - start;
        log::trace!(
            "capsule {:?}: requested {:?} applied {:?} in {} sub-steps",
            body, displacement, applied, substeps
        );
        hierarchy.translate_world(capsule.node, applied);
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Aabb, Plane};
    use rogue_core::{SceneGraph, Transform};

    const EPSILON: f32 = 0.001;

    fn setup(start: Vec3) -> (PhysicsWorld, SceneGraph, BodyKey, NodeKey) {
        let mut world = PhysicsWorld::new();
        world.add_static_collider(StaticCollider::floor(0.0));
        let mut graph = SceneGraph::new();
        let node = graph.add_node("player", Transform::from_position(start));
        let body = world.add_body(CapsuleBody::new(node, 0.5, 2.0));
        (world, graph, body, node)
    }

    #[test]
    fn test_overlap_sphere_respects_mask() {
        let (world, _, _, _) = setup(Vec3::ZERO);
        assert!(world.overlap_sphere(Vec3::new(0.0, 0.2, 0.0), 0.4, CollisionLayer::GROUND));
        assert!(!world.overlap_sphere(Vec3::new(0.0, 0.2, 0.0), 0.4, CollisionLayer::STATIC));
        assert!(!world.overlap_sphere(Vec3::new(0.0, 1.0, 0.0), 0.4, CollisionLayer::ALL));
    }

    #[test]
    fn test_free_move_is_unobstructed() {
        let (mut world, mut graph, body, node) = setup(Vec3::new(0.0, 1.0, 0.0));
        let applied = world.move_and_collide(&mut graph, body, Vec3::new(0.3, 0.0, -0.2));
        assert!((applied - Vec3::new(0.3, 0.0, -0.2)).length() < EPSILON);
        assert!((graph.world_position(node) - Vec3::new(0.3, 1.0, -0.2)).length() < EPSILON);
    }

    #[test]
    fn test_floor_stops_descent() {
        let (mut world, mut graph, body, node) = setup(Vec3::new(0.0, 0.1, 0.0));
        let applied = world.move_and_collide(&mut graph, body, Vec3::new(0.0, -1.0, 0.0));
        assert!((applied.y + 0.1).abs() < EPSILON, "applied {:?}", applied);
        assert!(graph.world_position(node).y.abs() < EPSILON);
    }

    #[test]
    fn test_slides_along_floor() {
        let (mut world, mut graph, body, node) = setup(Vec3::ZERO);
        let applied = world.move_and_collide(&mut graph, body, Vec3::new(1.0, -0.5, 0.0));
        assert!((applied.x - 1.0).abs() < EPSILON);
        assert!(applied.y.abs() < EPSILON);
        assert!((graph.world_position(node) - Vec3::new(1.0, 0.0, 0.0)).length() < EPSILON);
    }

    #[test]
    fn test_wall_blocks_and_slides() {
        let (mut world, mut graph, body, node) = setup(Vec3::ZERO);
        world.add_static_collider(StaticCollider::new(
            Collider::Aabb(Aabb::new(Vec3::new(1.0, 0.0, -10.0), Vec3::new(2.0, 3.0, 10.0))),
            CollisionLayer::STATIC,
        ));
        let applied = world.move_and_collide(&mut graph, body, Vec3::new(2.0, 0.0, -1.0));
        let pos = graph.world_position(node);
        // Capsule surface stops at the wall face, tangential motion is kept
        assert!((pos.x - 0.5).abs() < EPSILON, "pos {:?}", pos);
        assert!((pos.z + 1.0).abs() < EPSILON);
        assert!((applied - pos).length() < EPSILON);
    }

    #[test]
    fn test_mask_excludes_layers() {
        let (mut world, mut graph, _, node) = setup(Vec3::ZERO);
        world.add_static_collider(StaticCollider::new(
            Collider::Plane(Plane::new(-Vec3::X, -1.0)),
            CollisionLayer::TRIGGER,
        ));
        let ghost = world.add_body(CapsuleBody::new(node, 0.5, 2.0));
        let applied = world.move_and_collide(&mut graph, ghost, Vec3::new(3.0, 0.0, 0.0));
        assert!((applied.x - 3.0).abs() < EPSILON);
    }

    #[test]
    fn test_long_move_cannot_skip_thin_platform() {
        let (mut world, mut graph, body, node) = setup(Vec3::ZERO);
        // 0.1 thick, far thinner than a 100 / 32 unit sub-step would be
        world.add_static_collider(StaticCollider::new(
            Collider::Aabb(Aabb::new(Vec3::new(-5.0, 2.95, -5.0), Vec3::new(5.0, 3.05, 5.0))),
            CollisionLayer::STATIC,
        ));
        graph.translate_world(node, Vec3::new(0.0, 10.0, 0.0));

        let applied = world.move_and_collide(&mut graph, body, Vec3::new(0.0, -100.0, 0.0));
        let pos = graph.world_position(node);
        assert!((pos.y - 3.05).abs() < EPSILON, "pos {:?}", pos);
        assert!((applied.y + 6.95).abs() < EPSILON, "applied {:?}", applied);
    }

    #[test]
    fn test_move_truncated_to_substep_budget() {
        let mut world = PhysicsWorld::with_config(PhysicsConfig {
            max_depenetration_iterations: 4,
            max_substeps: 8,
        });
        let mut graph = SceneGraph::new();
        let node = graph.add_node("player", Transform::identity());
        let body = world.add_body(CapsuleBody::new(node, 0.5, 2.0));

        // 8 steps of 0.25
        let applied = world.move_and_collide(&mut graph, body, Vec3::new(10.0, 0.0, 0.0));
        assert!((applied - Vec3::new(2.0, 0.0, 0.0)).length() < EPSILON, "applied {:?}", applied);
        assert!((graph.world_position(node).x - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_zero_displacement_is_noop() {
        let (mut world, mut graph, body, node) = setup(Vec3::new(0.0, -0.2, 0.0));
        let applied = world.move_and_collide(&mut graph, body, Vec3::ZERO);
        assert_eq!(applied, Vec3::ZERO);
        assert_eq!(graph.world_position(node), Vec3::new(0.0, -0.2, 0.0));
    }

    #[test]
    fn test_unknown_body() {
        let (mut world, mut graph, body, _) = setup(Vec3::ZERO);
        world.remove_body(body);
        assert_eq!(world.move_and_collide(&mut graph, body, Vec3::X), Vec3::ZERO);
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_tilted_body_capsule_follows_up() {
        let (mut world, mut graph, body, node) = setup(Vec3::new(0.0, 0.6, 0.0));
        // Lying on its side: capsule axis along X, lowest point 0.5 below the node
        graph.rotate_world(node, Vec3::Z, 90.0);
        let applied = world.move_and_collide(&mut graph, body, Vec3::new(0.0, -1.0, 0.0));
        assert!((graph.world_position(node).y - 0.5).abs() < EPSILON, "applied {:?}", applied);
    }
}
