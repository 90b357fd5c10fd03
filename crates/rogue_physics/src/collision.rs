//! Collision detection
//!
//! Contact generation between spheres/capsules and the static shapes, plus
//! collision filtering via layer masks.

use bitflags::bitflags;

use crate::shapes::{Aabb, Capsule, Collider, Plane, Sphere};
use rogue_math::Vec3;

bitflags! {
    /// Collision layers for filtering which objects can collide
    ///
    /// Each layer is a bit in a 32-bit mask. Objects can belong to multiple layers
    /// and queries select the layers they care about with a mask.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CollisionLayer: u32 {
        /// Default layer for most objects
        const DEFAULT = 1 << 0;
        /// Player character layer
        const PLAYER = 1 << 1;
        /// Walkable ground
        const GROUND = 1 << 2;
        /// Static world geometry (walls, props)
        const STATIC = 1 << 3;
        /// Trigger zones (detect but don't push)
        const TRIGGER = 1 << 4;
        /// All layers
        const ALL = 0xFFFFFFFF;
    }
}

impl CollisionLayer {
    /// Parse a single lowercase layer name as used in config and scene files
    pub fn from_layer_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "default" => Some(Self::DEFAULT),
            "player" => Some(Self::PLAYER),
            "ground" => Some(Self::GROUND),
            "static" => Some(Self::STATIC),
            "trigger" => Some(Self::TRIGGER),
            "all" => Some(Self::ALL),
            _ => None,
        }
    }

    /// Union of a list of layer names
    ///
    /// Returns the first unknown name on failure.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, String> {
        names.iter().try_fold(Self::empty(), |acc, name| {
            Self::from_layer_name(name.as_ref())
                .map(|layer| acc | layer)
                .ok_or_else(|| name.as_ref().to_string())
        })
    }
}

/// Collision filter determining what an object collides with
///
/// Two objects A and B collide if:
/// - (A.layer & B.mask) != 0, AND
/// - (B.layer & A.mask) != 0
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionFilter {
    /// Which layer(s) this object belongs to
    pub layer: CollisionLayer,
    /// Which layer(s) this object can collide with
    pub mask: CollisionLayer,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            layer: CollisionLayer::DEFAULT,
            mask: CollisionLayer::ALL,
        }
    }
}

impl CollisionFilter {
    pub fn new(layer: CollisionLayer, mask: CollisionLayer) -> Self {
        Self { layer, mask }
    }

    /// Check if this filter allows collision with another filter
    pub fn collides_with(&self, other: &Self) -> bool {
        self.layer.intersects(other.mask) && other.layer.intersects(self.mask)
    }

    /// Player capsules are blocked by everything except players and triggers
    pub fn player() -> Self {
        Self {
            layer: CollisionLayer::PLAYER,
            mask: CollisionLayer::ALL & !CollisionLayer::PLAYER & !CollisionLayer::TRIGGER,
        }
    }
}

/// Contact information from a collision
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    /// Point of contact (on the surface of the second shape)
    pub point: Vec3,
    /// Normal pointing from the second shape toward the first
    pub normal: Vec3,
    /// Penetration depth (positive means overlapping)
    pub penetration: f32,
}

impl Contact {
    pub fn new(point: Vec3, normal: Vec3, penetration: f32) -> Self {
        Self {
            point,
            normal,
            penetration,
        }
    }

    /// Check if this represents an actual collision (positive penetration)
    pub fn is_colliding(&self) -> bool {
        self.penetration > 0.0
    }
}

/// Test sphere vs plane collision
///
/// Returns a contact if the sphere is intersecting or touching the plane's
/// half-space. The normal is the plane normal.
pub fn sphere_vs_plane(sphere: &Sphere, plane: &Plane) -> Option<Contact> {
    // radius - signed distance covers centers both above and below the plane
    let penetration = sphere.radius - plane.signed_distance(sphere.center);

    if penetration >= 0.0 {
        let point = sphere.center - plane.normal * (sphere.radius - penetration);
        Some(Contact::new(point, plane.normal, penetration))
    } else {
        None
    }
}

/// Test sphere vs AABB collision
///
/// The normal points from the AABB toward the sphere.
pub fn sphere_vs_aabb(sphere: &Sphere, aabb: &Aabb) -> Option<Contact> {
    let closest = aabb.closest_point(sphere.center);
    let delta = sphere.center - closest;
    let dist_squared = delta.length_squared();

    if dist_squared > sphere.radius * sphere.radius {
        return None;
    }

    let dist = dist_squared.sqrt();
    if dist > 0.0001 {
        return Some(Contact::new(closest, delta / dist, sphere.radius - dist));
    }

    // Center is inside the box: escape through the nearest face
    let to_min = sphere.center - aabb.min;
    let to_max = aabb.max - sphere.center;
    let candidates = [
        (to_min.x, -Vec3::X),
        (to_max.x, Vec3::X),
        (to_min.y, -Vec3::Y),
        (to_max.y, Vec3::Y),
        (to_min.z, -Vec3::Z),
        (to_max.z, Vec3::Z),
    ];
    let (depth, normal) = candidates
        .iter()
        .copied()
        .fold((f32::INFINITY, Vec3::Y), |best, c| if c.0 < best.0 { c } else { best });

    let point = sphere.center + normal * depth;
    Some(Contact::new(point, normal, sphere.radius + depth))
}

/// Test sphere vs sphere collision
///
/// The normal points from `b` toward `a`.
pub fn sphere_vs_sphere(a: &Sphere, b: &Sphere) -> Option<Contact> {
    let delta = a.center - b.center;
    let dist_sq = delta.length_squared();
    let min_dist = a.radius + b.radius;

    if dist_sq > min_dist * min_dist {
        return None;
    }

    let dist = dist_sq.sqrt();
    // Coincident centers have no preferred direction; push up
    let normal = if dist > 0.0001 { delta / dist } else { Vec3::UP };
    let point = b.center + normal * b.radius;
    Some(Contact::new(point, normal, min_dist - dist))
}

/// Contact between a sphere and any static collider
pub fn sphere_vs_collider(sphere: &Sphere, collider: &Collider) -> Option<Contact> {
    match collider {
        Collider::Plane(plane) => sphere_vs_plane(sphere, plane),
        Collider::Aabb(aabb) => sphere_vs_aabb(sphere, aabb),
        Collider::Sphere(other) => sphere_vs_sphere(sphere, other),
    }
}

/// Contact between a capsule and any static collider
///
/// Reduces to a sphere test at the segment point closest to the collider.
pub fn capsule_vs_collider(capsule: &Capsule, collider: &Collider) -> Option<Contact> {
    let sphere = match collider {
        Collider::Plane(plane) => {
            let da = plane.signed_distance(capsule.a);
            let db = plane.signed_distance(capsule.b);
            let center = if (da - db).abs() < 0.0001 {
                (capsule.a + capsule.b) * 0.5
            } else if da < db {
                capsule.a
            } else {
                capsule.b
            };
            Sphere::new(center, capsule.radius)
        }
        Collider::Sphere(s) => capsule.sphere_toward(s.center),
        Collider::Aabb(aabb) => {
            // Alternate closest-point projections; converges in a few rounds
            let mut p = (capsule.a + capsule.b) * 0.5;
            for _ in 0..4 {
                p = capsule.closest_point_on_segment(aabb.closest_point(p));
            }
            Sphere::new(p, capsule.radius)
        }
    };
    sphere_vs_collider(&sphere, collider)
}

/// True if the sphere overlaps or touches the collider
pub fn sphere_overlaps(sphere: &Sphere, collider: &Collider) -> bool {
    sphere_vs_collider(sphere, collider).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    #[test]
    fn test_layer_from_names() {
        let mask = CollisionLayer::from_names(&["ground", "Static"]).unwrap();
        assert_eq!(mask, CollisionLayer::GROUND | CollisionLayer::STATIC);
        assert_eq!(CollisionLayer::from_names(&["ground", "lava"]), Err("lava".to_string()));
        let empty: [&str; 0] = [];
        assert_eq!(CollisionLayer::from_names(&empty), Ok(CollisionLayer::empty()));
    }

    #[test]
    fn test_filter_player_ignores_triggers() {
        let trigger = CollisionFilter::new(CollisionLayer::TRIGGER, CollisionLayer::PLAYER);
        let ground = CollisionFilter::new(CollisionLayer::GROUND, CollisionLayer::ALL);
        assert!(!CollisionFilter::player().collides_with(&trigger));
        assert!(CollisionFilter::player().collides_with(&ground));
    }

    #[test]
    fn test_sphere_vs_plane_touching_counts() {
        let floor = Plane::floor(0.0);
        let touching = Sphere::new(Vec3::new(0.0, 0.4, 0.0), 0.4);
        let contact = sphere_vs_plane(&touching, &floor).unwrap();
        assert!(contact.penetration.abs() < EPSILON);
        assert!(!contact.is_colliding());

        let hovering = Sphere::new(Vec3::new(0.0, 0.5, 0.0), 0.4);
        assert!(sphere_vs_plane(&hovering, &floor).is_none());
    }

    #[test]
    fn test_sphere_vs_plane_below_surface() {
        let floor = Plane::floor(0.0);
        let sunk = Sphere::new(Vec3::new(0.0, -0.2, 0.0), 0.5);
        let contact = sphere_vs_plane(&sunk, &floor).unwrap();
        assert!((contact.penetration - 0.7).abs() < EPSILON);
        assert_eq!(contact.normal, Vec3::UP);
    }

    #[test]
    fn test_sphere_vs_aabb_side() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let sphere = Sphere::new(Vec3::new(1.3, 0.5, 0.5), 0.5);
        let contact = sphere_vs_aabb(&sphere, &aabb).unwrap();
        assert!((contact.normal - Vec3::X).length() < EPSILON);
        assert!((contact.penetration - 0.2).abs() < EPSILON);
    }

    #[test]
    fn test_sphere_vs_aabb_center_inside() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::new(4.0, 1.0, 4.0));
        let sphere = Sphere::new(Vec3::new(2.0, 0.9, 2.0), 0.25);
        let contact = sphere_vs_aabb(&sphere, &aabb).unwrap();
        assert_eq!(contact.normal, Vec3::Y);
        assert!((contact.penetration - 0.35).abs() < EPSILON);
    }

    #[test]
    fn test_sphere_vs_sphere() {
        let a = Sphere::new(Vec3::new(1.5, 0.0, 0.0), 1.0);
        let b = Sphere::new(Vec3::ZERO, 1.0);
        let contact = sphere_vs_sphere(&a, &b).unwrap();
        assert_eq!(contact.normal, Vec3::X);
        assert!((contact.penetration - 0.5).abs() < EPSILON);
        assert!(sphere_vs_sphere(&Sphere::new(Vec3::new(3.0, 0.0, 0.0), 1.0), &b).is_none());
    }

    #[test]
    fn test_capsule_vs_floor_uses_lowest_end() {
        let capsule = Capsule::from_center_axis(Vec3::new(0.0, 0.9, 0.0), Vec3::UP, 2.0, 0.5);
        let contact = capsule_vs_collider(&capsule, &Collider::Plane(Plane::floor(0.0))).unwrap();
        assert!((contact.penetration - 0.1).abs() < EPSILON);
        assert_eq!(contact.normal, Vec3::UP);
    }

    #[test]
    fn test_capsule_vs_wall_box() {
        let wall = Collider::Aabb(Aabb::new(Vec3::new(1.0, 0.0, -5.0), Vec3::new(2.0, 3.0, 5.0)));
        let capsule = Capsule::from_center_axis(Vec3::new(0.6, 1.0, 0.0), Vec3::UP, 2.0, 0.5);
        let contact = capsule_vs_collider(&capsule, &wall).unwrap();
        assert!((contact.normal - (-Vec3::X)).length() < EPSILON);
        assert!((contact.penetration - 0.1).abs() < EPSILON);

        let clear = Capsule::from_center_axis(Vec3::new(0.2, 1.0, 0.0), Vec3::UP, 2.0, 0.5);
        assert!(capsule_vs_collider(&clear, &wall).is_none());
    }

    #[test]
    fn test_capsule_vs_sphere() {
        let rock = Collider::Sphere(Sphere::new(Vec3::new(0.0, 1.5, 1.0), 0.5));
        let capsule = Capsule::from_center_axis(Vec3::new(0.0, 1.0, 0.2), Vec3::UP, 2.0, 0.5);
        let contact = capsule_vs_collider(&capsule, &rock).unwrap();
        assert!((contact.normal - (-Vec3::Z)).length() < EPSILON);
        assert!((contact.penetration - 0.2).abs() < EPSILON);
    }

    #[test]
    fn test_sphere_overlaps() {
        let floor = Collider::Plane(Plane::floor(0.0));
        assert!(sphere_overlaps(&Sphere::new(Vec3::new(0.0, 0.3, 0.0), 0.4), &floor));
        assert!(!sphere_overlaps(&Sphere::new(Vec3::new(0.0, 2.0, 0.0), 0.4), &floor));
    }
}
