//! Collision shapes
//!
//! Lightweight primitives used for overlap queries and contact generation.

use rogue_math::Vec3;
use serde::{Serialize, Deserialize};

/// A sphere defined by center and radius
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    /// Create a new sphere at the given center with the given radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if a point is inside or on the sphere
    pub fn contains(&self, point: Vec3) -> bool {
        (point - self.center).length_squared() <= self.radius * self.radius
    }
}

/// An axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a position with given half-extents
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check if a point is inside or on the AABB
    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Get the closest point inside or on the AABB to a given point
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp_components(self.min, self.max)
    }
}

/// An infinite plane bounding a solid half-space
///
/// The plane equation is: normal · point = distance.
/// Everything on the negative side counts as solid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Unit normal vector pointing out of the solid
    pub normal: Vec3,
    /// Signed distance from origin along the normal
    pub distance: f32,
}

impl Plane {
    /// Create a new plane from a normal and distance
    ///
    /// The normal will be normalized automatically.
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self {
            normal: normal.normalized(),
            distance,
        }
    }

    /// Create a plane from a point on the plane and a normal
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let n = normal.normalized();
        Self {
            normal: n,
            distance: n.dot(point),
        }
    }

    /// Create a horizontal floor plane at the given Y height
    pub fn floor(y: f32) -> Self {
        Self::from_point_normal(Vec3::new(0.0, y, 0.0), Vec3::UP)
    }

    /// Positive above the plane, negative inside the solid
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }
}

/// A capsule: a segment swept by a sphere
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Capsule {
    /// Bottom segment end
    pub a: Vec3,
    /// Top segment end
    pub b: Vec3,
    pub radius: f32,
}

impl Capsule {
    /// Capsule of total `height` centred on `center`, aligned with `up`
    ///
    /// Heights below `2 * radius` collapse to a sphere.
    pub fn from_center_axis(center: Vec3, up: Vec3, height: f32, radius: f32) -> Self {
        let half_segment = (height * 0.5 - radius).max(0.0);
        let axis = up.normalized() * half_segment;
        Self {
            a: center - axis,
            b: center + axis,
            radius,
        }
    }

    /// Closest point on the inner segment to `point`
    pub fn closest_point_on_segment(&self, point: Vec3) -> Vec3 {
        let ab = self.b - self.a;
        let len_sq = ab.length_squared();
        if len_sq <= f32::EPSILON {
            return self.a;
        }
        let t = ((point - self.a).dot(ab) / len_sq).clamp(0.0, 1.0);
        self.a + ab * t
    }

    /// Sphere at the segment point closest to `point`
    pub fn sphere_toward(&self, point: Vec3) -> Sphere {
        Sphere::new(self.closest_point_on_segment(point), self.radius)
    }
}

/// Collider enum for storing different static shape types
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    Sphere(Sphere),
    Aabb(Aabb),
    Plane(Plane),
}

impl Collider {
    /// A representative point of the collider
    ///
    /// For planes, returns the point on the plane closest to the origin.
    pub fn center(&self) -> Vec3 {
        match self {
            Collider::Sphere(s) => s.center,
            Collider::Aabb(b) => b.center(),
            Collider::Plane(p) => p.normal * p.distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_contains() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0);
        assert!(sphere.contains(Vec3::new(0.5, 0.0, 0.0)));
        assert!(sphere.contains(Vec3::new(1.0, 0.0, 0.0))); // on surface
        assert!(!sphere.contains(Vec3::new(1.1, 0.0, 0.0)));
    }

    #[test]
    fn test_aabb_from_center_half_extents() {
        let aabb = Aabb::from_center_half_extents(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.5, 0.5, 0.5));
        assert_eq!(aabb.min, Vec3::new(0.5, 1.5, 2.5));
        assert_eq!(aabb.max, Vec3::new(1.5, 2.5, 3.5));
        assert_eq!(aabb.center(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_aabb_closest_point() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let inside = Vec3::new(0.5, 0.5, 0.5);
        assert_eq!(aabb.closest_point(inside), inside);
        assert_eq!(aabb.closest_point(Vec3::new(2.0, 0.5, 0.5)), Vec3::new(1.0, 0.5, 0.5));
    }

    #[test]
    fn test_plane_signed_distance() {
        let floor = Plane::floor(0.0);
        assert!(floor.signed_distance(Vec3::ZERO).abs() < 0.0001);
        assert!((floor.signed_distance(Vec3::new(0.0, 1.0, 0.0)) - 1.0).abs() < 0.0001);
        assert!((floor.signed_distance(Vec3::new(0.0, -1.0, 0.0)) + 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_capsule_segment() {
        let capsule = Capsule::from_center_axis(Vec3::new(0.0, 1.0, 0.0), Vec3::UP, 2.0, 0.5);
        assert_eq!(capsule.a, Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(capsule.b, Vec3::new(0.0, 1.5, 0.0));
        assert_eq!(capsule.closest_point_on_segment(Vec3::new(3.0, 1.2, 0.0)), Vec3::new(0.0, 1.2, 0.0));
        assert_eq!(capsule.closest_point_on_segment(Vec3::new(0.0, -4.0, 0.0)), capsule.a);
    }

    #[test]
    fn test_short_capsule_is_sphere() {
        let capsule = Capsule::from_center_axis(Vec3::ZERO, Vec3::UP, 0.5, 0.5);
        assert_eq!(capsule.a, capsule.b);
        assert_eq!(capsule.closest_point_on_segment(Vec3::new(1.0, 1.0, 1.0)), Vec3::ZERO);
    }
}
