//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`ROGUE_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use rogue_input::{AxisSettings, LookConfigError, LookSettings};
use rogue_physics::{CollisionLayer, MovementConfigError, MovementSettings, PhysicsConfig};
use serde::{Serialize, Deserialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Mouse look configuration
    #[serde(default)]
    pub look: LookConfig,
    /// Locomotion configuration
    #[serde(default)]
    pub movement: MovementConfig,
    /// Player capsule and camera placement
    #[serde(default)]
    pub character: CharacterConfig,
    /// Input axis configuration
    #[serde(default)]
    pub input: InputConfig,
    /// Frame timing and collision solver
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Scene configuration
    #[serde(default)]
    pub scene: SceneConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`ROGUE_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // ROGUE_LOOK__INVERT_Y=true -> look.invert_y = true
        figment = figment.merge(Env::prefixed("ROGUE_").split("__"));

        let config: AppConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section that feeds a controller
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.look.to_settings().validate()?;
        self.movement.to_settings()?.validate()?;
        self.character.validate()?;
        if !(self.simulation.max_frame_time > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "simulation.max_frame_time must be positive, got {}",
                self.simulation.max_frame_time
            )));
        }
        Ok(())
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Rogue".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
        }
    }
}

/// Mouse look configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookConfig {
    /// Degrees of yaw per "Mouse X" unit per second
    pub sensitivity_x: f32,
    /// Degrees of pitch per "Mouse Y" unit per second
    pub sensitivity_y: f32,
    pub invert_y: bool,
    /// Lowest pitch in degrees (positive looks down)
    pub pitch_min: f32,
    /// Highest pitch in degrees
    pub pitch_max: f32,
}

impl Default for LookConfig {
    fn default() -> Self {
        let defaults = LookSettings::default();
        Self {
            sensitivity_x: defaults.sensitivity_x,
            sensitivity_y: defaults.sensitivity_y,
            invert_y: defaults.invert_y,
            pitch_min: defaults.pitch_min,
            pitch_max: defaults.pitch_max,
        }
    }
}

impl LookConfig {
    pub fn to_settings(&self) -> LookSettings {
        LookSettings {
            sensitivity_x: self.sensitivity_x,
            sensitivity_y: self.sensitivity_y,
            invert_y: self.invert_y,
            pitch_min: self.pitch_min,
            pitch_max: self.pitch_max,
        }
    }
}

/// Locomotion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Planar speed (units per second)
    pub speed: f32,
    /// Acceleration along the body's up axis (negative = downward)
    pub gravity: f32,
    /// Radius of the ground probe sphere at the player's feet
    pub ground_check_radius: f32,
    /// Layer names that count as ground
    pub ground_mask: Vec<String>,
}

impl Default for MovementConfig {
    fn default() -> Self {
        let defaults = MovementSettings::default();
        Self {
            speed: defaults.speed,
            gravity: defaults.gravity,
            ground_check_radius: defaults.ground_check_radius,
            ground_mask: vec!["ground".to_string(), "static".to_string()],
        }
    }
}

impl MovementConfig {
    pub fn to_settings(&self) -> Result<MovementSettings, ConfigError> {
        let ground_mask = CollisionLayer::from_names(&self.ground_mask)
            .map_err(ConfigError::InvalidLayer)?;
        Ok(MovementSettings {
            speed: self.speed,
            gravity: self.gravity,
            ground_check_radius: self.ground_check_radius,
            ground_mask,
        })
    }
}

/// Player capsule and camera placement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// Capsule radius
    pub radius: f32,
    /// Capsule height including both caps
    pub height: f32,
    /// Camera height above the feet
    pub eye_height: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            radius: 0.5,
            height: 2.0,
            eye_height: 1.6,
        }
    }
}

impl CharacterConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius > 0.0) || !self.radius.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "character.radius must be positive, got {}",
                self.radius
            )));
        }
        if !(self.height >= 2.0 * self.radius) || !self.height.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "character.height {} is shorter than the capsule diameter {}",
                self.height,
                2.0 * self.radius
            )));
        }
        if !(self.eye_height >= 0.0 && self.eye_height <= self.height) {
            return Err(ConfigError::Invalid(format!(
                "character.eye_height {} must lie within the capsule height {}",
                self.eye_height, self.height
            )));
        }
        Ok(())
    }
}

/// Input axis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Rate at which movement axes reach a pressed direction (units/s)
    pub axis_sensitivity: f32,
    /// Rate at which movement axes return to zero (units/s)
    pub axis_gravity: f32,
    /// Reset an axis to zero when the opposite direction is pressed
    pub snap: bool,
    /// Scale from raw mouse counts to look axis units
    pub pointer_scale: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        let defaults = AxisSettings::default();
        Self {
            axis_sensitivity: defaults.sensitivity,
            axis_gravity: defaults.gravity,
            snap: defaults.snap,
            pointer_scale: defaults.pointer_scale,
        }
    }
}

impl InputConfig {
    pub fn to_axis_settings(&self) -> AxisSettings {
        AxisSettings {
            sensitivity: self.axis_sensitivity,
            gravity: self.axis_gravity,
            snap: self.snap,
            pointer_scale: self.pointer_scale,
        }
    }
}

/// Frame timing and collision solver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Longest frame time fed to the controllers, in seconds
    pub max_frame_time: f32,
    /// Push-out passes per collision sub-step
    pub max_depenetration_iterations: u32,
    /// Upper bound on collision sub-steps per move
    pub max_substeps: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let physics = PhysicsConfig::default();
        Self {
            max_frame_time: 1.0 / 30.0,
            max_depenetration_iterations: physics.max_depenetration_iterations,
            max_substeps: physics.max_substeps,
        }
    }
}

impl SimulationConfig {
    pub fn to_physics_config(&self) -> PhysicsConfig {
        PhysicsConfig {
            max_depenetration_iterations: self.max_depenetration_iterations,
            max_substeps: self.max_substeps,
        }
    }
}

/// Scene configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Path to the RON scene file
    pub path: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            path: "scenes/courtyard.ron".to_string(),
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Show position and ground state in the window title
    pub show_overlay: bool,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_overlay: true,
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub enum ConfigError {
    /// Extraction from TOML/env failed
    Figment(figment::Error),
    /// Unknown collision layer name
    InvalidLayer(String),
    Look(LookConfigError),
    Movement(MovementConfigError),
    /// Any other out-of-range value
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::Figment(e)
    }
}

impl From<LookConfigError> for ConfigError {
    fn from(e: LookConfigError) -> Self {
        ConfigError::Look(e)
    }
}

impl From<MovementConfigError> for ConfigError {
    fn from(e: MovementConfigError) -> Self {
        ConfigError::Movement(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Figment(e) => write!(f, "Configuration error: {}", e),
            ConfigError::InvalidLayer(name) => write!(f, "Configuration error: unknown collision layer '{}'", name),
            ConfigError::Look(e) => write!(f, "Configuration error: {}", e),
            ConfigError::Movement(e) => write!(f, "Configuration error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Figment(e) => Some(e),
            ConfigError::Look(e) => Some(e),
            ConfigError::Movement(e) => Some(e),
            ConfigError::InvalidLayer(_) | ConfigError::Invalid(_) => None,
        }
    }
}
