//! RON scene files
//!
//! A scene lists the static collision geometry of a level and where the
//! player starts:
//!
//! ```ron
//! Scene(
//!     name: "Courtyard",
//!     player_spawn: Some((0.0, 0.0, 6.0)),
//!     player_yaw: Some(0.0),
//!     colliders: [
//!         (shape: Plane(normal: (0.0, 1.0, 0.0), distance: 0.0), layers: ["ground"]),
//!         (shape: Box(center: (0.0, 1.5, -8.0), half_extents: (6.0, 1.5, 0.5))),
//!     ],
//! )
//! ```

use rogue_math::Vec3;
use rogue_physics::{Aabb, Collider, CollisionLayer, Plane, Sphere, StaticCollider};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Shape of a static collider as written in a scene file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ShapeDef {
    /// Solid half-space below `normal · p = distance`
    Plane { normal: [f32; 3], distance: f32 },
    /// Axis-aligned box
    Box { center: [f32; 3], half_extents: [f32; 3] },
    Sphere { center: [f32; 3], radius: f32 },
}

impl ShapeDef {
    /// Reject shapes the collision tests cannot handle
    ///
    /// A plane needs a non-zero normal; sizes must be finite and non-negative.
    pub fn validate(&self) -> Result<(), SceneLoadError> {
        fn finite(v: &[f32]) -> bool {
            v.iter().all(|x| x.is_finite())
        }

        let problem = match self {
            ShapeDef::Plane { normal, distance } => {
                if !finite(normal) || !distance.is_finite() {
                    Some("plane has a non-finite value")
                } else if Vec3::from(*normal).length_squared() < f32::EPSILON {
                    Some("plane normal is zero")
                } else {
                    None
                }
            }
            ShapeDef::Box { center, half_extents } => {
                if !finite(center) || !finite(half_extents) {
                    Some("box has a non-finite value")
                } else if half_extents.iter().any(|h| *h < 0.0) {
                    Some("box half extents are negative")
                } else {
                    None
                }
            }
            ShapeDef::Sphere { center, radius } => {
                if !finite(center) || !radius.is_finite() {
                    Some("sphere has a non-finite value")
                } else if *radius < 0.0 {
                    Some("sphere radius is negative")
                } else {
                    None
                }
            }
        };
        match problem {
            Some(reason) => Err(SceneLoadError::InvalidShape(reason.to_string())),
            None => Ok(()),
        }
    }

    pub fn to_collider(&self) -> Collider {
        match self {
            ShapeDef::Plane { normal, distance } => {
                Collider::Plane(Plane::new(Vec3::from(*normal), *distance))
            }
            ShapeDef::Box { center, half_extents } => Collider::Aabb(Aabb::from_center_half_extents(
                Vec3::from(*center),
                Vec3::from(*half_extents),
            )),
            ShapeDef::Sphere { center, radius } => {
                Collider::Sphere(Sphere::new(Vec3::from(*center), *radius))
            }
        }
    }
}

fn default_layers() -> Vec<String> {
    vec!["static".to_string()]
}

/// A static collider entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColliderDef {
    pub shape: ShapeDef,
    /// Layer names; defaults to `["static"]`
    #[serde(default = "default_layers")]
    pub layers: Vec<String>,
}

impl ColliderDef {
    pub fn new(shape: ShapeDef, layers: &[&str]) -> Self {
        Self {
            shape,
            layers: layers.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn to_static_collider(&self) -> Result<StaticCollider, SceneLoadError> {
        self.shape.validate()?;
        let layer = CollisionLayer::from_names(&self.layers).map_err(SceneLoadError::InvalidLayer)?;
        Ok(StaticCollider::new(self.shape.to_collider(), layer))
    }
}

/// A level: static geometry plus the player start
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene name (for display/debugging)
    pub name: String,
    /// Player feet position [x, y, z]
    #[serde(default)]
    pub player_spawn: Option<[f32; 3]>,
    /// Initial body yaw in degrees (positive turns right)
    #[serde(default)]
    pub player_yaw: Option<f32>,
    #[serde(default)]
    pub colliders: Vec<ColliderDef>,
}

impl Scene {
    /// Create a new empty scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            player_spawn: None,
            player_yaw: None,
            colliders: Vec::new(),
        }
    }

    /// Load a scene from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneLoadError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Parse a scene from RON text and check its shapes and layer names
    pub fn from_ron_str(contents: &str) -> Result<Self, SceneLoadError> {
        let scene: Scene = ron::from_str(contents)?;
        for collider in &scene.colliders {
            collider.to_static_collider()?;
        }
        Ok(scene)
    }

    /// Set the player spawn position
    pub fn with_player_spawn(mut self, x: f32, y: f32, z: f32) -> Self {
        self.player_spawn = Some([x, y, z]);
        self
    }

    pub fn with_collider(mut self, collider: ColliderDef) -> Self {
        self.colliders.push(collider);
        self
    }

    /// Physics colliders for every entry
    pub fn static_colliders(&self) -> Result<Vec<StaticCollider>, SceneLoadError> {
        self.colliders.iter().map(ColliderDef::to_static_collider).collect()
    }
}

/// Error loading a scene
#[derive(Debug)]
pub enum SceneLoadError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
    /// Unknown collision layer name
    InvalidLayer(String),
    /// Degenerate collider shape
    InvalidShape(String),
}

impl From<io::Error> for SceneLoadError {
    fn from(e: io::Error) -> Self {
        SceneLoadError::Io(e)
    }
}

impl From<ron::error::SpannedError> for SceneLoadError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneLoadError::Parse(e)
    }
}

impl std::fmt::Display for SceneLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneLoadError::Io(e) => write!(f, "IO error: {}", e),
            SceneLoadError::Parse(e) => write!(f, "Parse error: {}", e),
            SceneLoadError::InvalidLayer(name) => write!(f, "Unknown collision layer: {}", name),
            SceneLoadError::InvalidShape(reason) => write!(f, "Invalid collider shape: {}", reason),
        }
    }
}

impl std::error::Error for SceneLoadError {}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"
        Scene(
            name: "Test",
            player_spawn: Some((1.0, 2.0, 3.0)),
            colliders: [
                (shape: Plane(normal: (0.0, 1.0, 0.0), distance: 0.0), layers: ["ground"]),
                (shape: Box(center: (0.0, 1.0, -5.0), half_extents: (2.0, 1.0, 0.5))),
                (shape: Sphere(center: (3.0, 0.0, 0.0), radius: 1.0), layers: ["static", "trigger"]),
            ],
        )
    "#;

    #[test]
    fn test_parse_scene() {
        let scene = Scene::from_ron_str(SCENE).unwrap();
        assert_eq!(scene.name, "Test");
        assert_eq!(scene.player_spawn, Some([1.0, 2.0, 3.0]));
        assert_eq!(scene.player_yaw, None);
        assert_eq!(scene.colliders.len(), 3);
        assert_eq!(scene.colliders[1].layers, vec!["static".to_string()]);
    }

    #[test]
    fn test_static_colliders_layers() {
        let colliders = Scene::from_ron_str(SCENE).unwrap().static_colliders().unwrap();
        assert_eq!(colliders[0].layer, CollisionLayer::GROUND);
        assert_eq!(colliders[1].layer, CollisionLayer::STATIC);
        assert_eq!(colliders[2].layer, CollisionLayer::STATIC | CollisionLayer::TRIGGER);
        match colliders[1].collider {
            Collider::Aabb(aabb) => assert_eq!(aabb.min, Vec3::new(-2.0, 0.0, -5.5)),
            other => panic!("Expected box, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_layer_is_error() {
        let text = r#"Scene(name: "Bad", colliders: [(shape: Sphere(center: (0.0, 0.0, 0.0), radius: 1.0), layers: ["lava"])])"#;
        match Scene::from_ron_str(text) {
            Err(SceneLoadError::InvalidLayer(name)) => assert_eq!(name, "lava"),
            other => panic!("Expected InvalidLayer, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_plane_normal_is_error() {
        let text = r#"Scene(name: "Flat", colliders: [(shape: Plane(normal: (0.0, 0.0, 0.0), distance: 0.0), layers: ["ground"])])"#;
        match Scene::from_ron_str(text) {
            Err(SceneLoadError::InvalidShape(reason)) => assert!(reason.contains("normal"), "{}", reason),
            other => panic!("Expected InvalidShape, got {:?}", other),
        }
    }

    #[test]
    fn test_degenerate_shapes_rejected() {
        let bad = [
            ShapeDef::Sphere { center: [0.0, 0.0, 0.0], radius: -1.0 },
            ShapeDef::Box { center: [0.0, f32::NAN, 0.0], half_extents: [1.0, 1.0, 1.0] },
            ShapeDef::Box { center: [0.0, 0.0, 0.0], half_extents: [1.0, -1.0, 1.0] },
        ];
        for shape in bad {
            let scene = Scene::new("Bad").with_collider(ColliderDef::new(shape.clone(), &["static"]));
            assert!(
                matches!(scene.static_colliders(), Err(SceneLoadError::InvalidShape(_))),
                "{:?} should be rejected",
                shape
            );
        }
        // A tilted, unnormalised plane is fine
        assert!(ShapeDef::Plane { normal: [0.0, 2.0, 2.0], distance: 1.0 }.validate().is_ok());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(Scene::from_ron_str("Scene(name: )"), Err(SceneLoadError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(Scene::load("does/not/exist.ron"), Err(SceneLoadError::Io(_))));
    }

    #[test]
    fn test_round_trip_through_ron() {
        let scene = Scene::new("Built")
            .with_player_spawn(0.0, 1.0, 0.0)
            .with_collider(ColliderDef::new(
                ShapeDef::Plane { normal: [0.0, 1.0, 0.0], distance: 0.0 },
                &["ground"],
            ));
        let text = ron::ser::to_string(&scene).unwrap();
        assert_eq!(Scene::from_ron_str(&text).unwrap(), scene);
    }
}
