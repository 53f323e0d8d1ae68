//! Display configuration, passed explicitly to the navigator.

use std::path::Path;

use foundation::Unit;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Request a stereo display; honored only when the renderer supports it.
    #[serde(default)]
    pub stereo: bool,

    #[serde(default)]
    pub viewport: ViewportConfig,

    /// Uniform scale of the initial (and saved) camera transform.
    #[serde(default = "default_initial_scale")]
    pub initial_scale: f64,

    #[serde(default)]
    pub vertical: VerticalConfig,

    /// Altitude used for points without one, in the vertical unit.
    #[serde(default)]
    pub reference_altitude: f64,

    #[serde(default)]
    pub clip: ClipConfig,

    #[serde(default = "default_eye_separation")]
    pub eye_separation: f64,

    #[serde(default = "default_fov")]
    pub field_of_view_deg: f64,

    #[serde(default)]
    pub animation: AnimationConfig,

    #[serde(default)]
    pub rotation: RotationConfig,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalConfig {
    pub min: f64,
    pub max: f64,
    #[serde(default = "default_vertical_unit")]
    pub unit: Unit,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipConfig {
    /// Front clip distance for parallel projection.
    #[serde(default = "default_front_clip")]
    pub front_default: f64,
    /// Front clip distance forced while perspective is on.
    #[serde(default = "default_front_clip_perspective")]
    pub front_perspective: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    #[serde(default = "default_animation_steps")]
    pub steps: u32,
    #[serde(default = "default_step_interval_ms")]
    pub step_interval_ms: u64,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationConfig {
    #[serde(default = "default_rotation_delay_ms")]
    pub delay_ms: u64,
    /// Degrees per step about x, y and z at scale 1.
    #[serde(default = "default_rotation_multiplier")]
    pub multiplier: [f64; 3],
}

fn default_initial_scale() -> f64 {
    0.5
}

fn default_vertical_unit() -> Unit {
    Unit::Meter
}

fn default_front_clip() -> f64 {
    -2000.0
}

fn default_front_clip_perspective() -> f64 {
    0.1
}

fn default_eye_separation() -> f64 {
    0.004
}

fn default_fov() -> f64 {
    45.0
}

fn default_animation_steps() -> u32 {
    20
}

fn default_step_interval_ms() -> u64 {
    50
}

fn default_rotation_delay_ms() -> u64 {
    50
}

fn default_rotation_multiplier() -> [f64; 3] {
    [0.0, -1.0, 0.0]
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            stereo: false,
            viewport: ViewportConfig::default(),
            initial_scale: default_initial_scale(),
            vertical: VerticalConfig::default(),
            reference_altitude: 0.0,
            clip: ClipConfig::default(),
            eye_separation: default_eye_separation(),
            field_of_view_deg: default_fov(),
            animation: AnimationConfig::default(),
            rotation: RotationConfig::default(),
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
        }
    }
}

impl Default for VerticalConfig {
    fn default() -> Self {
        Self {
            min: scene::DEFAULT_VERTICAL_MIN_M,
            max: scene::DEFAULT_VERTICAL_MAX_M,
            unit: default_vertical_unit(),
        }
    }
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            front_default: default_front_clip(),
            front_perspective: default_front_clip_perspective(),
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            steps: default_animation_steps(),
            step_interval_ms: default_step_interval_ms(),
        }
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_rotation_delay_ms(),
            multiplier: default_rotation_multiplier(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "config io error: {msg}"),
            ConfigError::Parse(msg) => write!(f, "config parse error: {msg}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl DisplayConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let v = &self.vertical;
        if !v.min.is_finite() || !v.max.is_finite() || v.min >= v.max {
            return Err(ConfigError::Invalid(format!(
                "vertical range [{}, {}] is empty or not finite",
                v.min, v.max
            )));
        }
        if !v.unit.can_convert(Unit::Meter) {
            return Err(ConfigError::Invalid(format!(
                "vertical unit {} is not a length",
                v.unit
            )));
        }
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(ConfigError::Invalid("viewport must be non-empty".into()));
        }
        if !(self.field_of_view_deg > 0.0 && self.field_of_view_deg < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "field of view {} must be in (0, 180)",
                self.field_of_view_deg
            )));
        }
        if !(self.initial_scale.is_finite() && self.initial_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "initial scale {} must be positive",
                self.initial_scale
            )));
        }
        if !self.eye_separation.is_finite() {
            return Err(ConfigError::Invalid("eye separation must be finite".into()));
        }
        if self.animation.steps == 0 {
            return Err(ConfigError::Invalid("animation needs at least one step".into()));
        }
        if self.rotation.multiplier.iter().any(|m| !m.is_finite()) {
            return Err(ConfigError::Invalid("rotation multiplier must be finite".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, DisplayConfig};
    use foundation::Unit;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_uses_defaults() {
        let config = DisplayConfig::from_json_str("{}").expect("parse");
        assert_eq!(config, DisplayConfig::default());
        assert_eq!(config.viewport.width, 600);
        assert_eq!(config.clip.front_default, -2000.0);
        assert_eq!(config.clip.front_perspective, 0.1);
        assert_eq!(config.animation.steps, 20);
        assert_eq!(config.rotation.multiplier, [0.0, -1.0, 0.0]);
    }

    #[test]
    fn partial_sections_fill_in() {
        let config = DisplayConfig::from_json_str(
            r#"{"vertical": {"min": -5, "max": 5, "unit": "km"}, "clip": {"front_default": -10}}"#,
        )
        .expect("parse");
        assert_eq!(config.vertical.unit, Unit::Kilometer);
        assert_eq!(config.clip.front_default, -10.0);
        assert_eq!(config.clip.front_perspective, 0.1);
    }

    #[test]
    fn rejects_degenerate_values() {
        for json in [
            r#"{"vertical": {"min": 5, "max": 5}}"#,
            r#"{"vertical": {"min": 0, "max": 1, "unit": "hPa"}}"#,
            r#"{"animation": {"steps": 0}}"#,
            r#"{"field_of_view_deg": 0}"#,
            r#"{"viewport": {"width": 0, "height": 10}}"#,
        ] {
            assert!(
                matches!(DisplayConfig::from_json_str(json), Err(ConfigError::Invalid(_))),
                "{json}"
            );
        }
        assert!(matches!(
            DisplayConfig::from_json_str("{"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = DisplayConfig::load("/nonexistent/globe.json").expect_err("missing");
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
