//! Engine policy constants.
//!
//! Every placement distance the builder and controller rely on lives here
//! so a host can tune them from a JSON file without touching the logic.
//!
//! ```
//! use tinyhome_engine::config::EngineConfig;
//!
//! let config = EngineConfig::from_json(r#"{ "eye_height": 1.7 }"#).unwrap();
//! assert_eq!(config.eye_height, 1.7);
//! assert_eq!(config.path_length, 8.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// How exterior room boxes are tinted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ColorScheme {
    /// Fixed palette slot chosen by hashing the room name.
    Palette,
    /// Seeded random tint per room; stable for a given seed and name.
    Random { seed: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How far the garden path extends from the door.
    pub path_length: f32,
    pub path_width: f32,
    /// Wall thickness for interior builds.
    pub wall_thickness: f32,
    pub door_width: f32,
    pub door_height: f32,
    /// First-person eye height above the floor.
    pub eye_height: f32,
    /// Distance outside the door edge where the interior camera starts.
    pub door_standoff: f32,
    /// Side length of the permanent ground plane.
    pub ground_size: f32,
    /// Orbit camera minimum distance from the layout centre.
    pub overview_min_distance: f32,
    pub color_scheme: ColorScheme,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path_length: 8.0,
            path_width: 1.2,
            wall_thickness: 0.1,
            door_width: 1.0,
            door_height: 2.0,
            eye_height: 1.6,
            door_standoff: 0.3,
            ground_size: 50.0,
            overview_min_distance: 15.0,
            color_scheme: ColorScheme::Palette,
        }
    }
}

impl EngineConfig {
    pub fn from_json(body: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(body).map_err(|e| EngineError::Config(e.to_string()))?;
        // Serde also reads structs from sequences; only objects are configs.
        if !value.is_object() {
            return Err(EngineError::Config(
                "config must be a JSON object".to_string(),
            ));
        }
        let config: Self =
            serde_json::from_value(value).map_err(|e| EngineError::Config(e.to_string()))?;
        let errors = validate_config(&config);
        if !errors.is_empty() {
            return Err(EngineError::Config(errors.join("; ")));
        }
        Ok(config)
    }
}

/// Returns a list of problems with the config (empty = valid).
pub fn validate_config(config: &EngineConfig) -> Vec<String> {
    let mut errors = Vec::new();
    let positive = [
        ("path_length", config.path_length),
        ("path_width", config.path_width),
        ("wall_thickness", config.wall_thickness),
        ("door_width", config.door_width),
        ("door_height", config.door_height),
        ("eye_height", config.eye_height),
        ("ground_size", config.ground_size),
        ("overview_min_distance", config.overview_min_distance),
    ];
    for (name, value) in positive {
        if !value.is_finite() || value <= 0.0 {
            errors.push(format!("{} must be positive, got {}", name, value));
        }
    }
    if !config.door_standoff.is_finite() || config.door_standoff < 0.0 {
        errors.push(format!(
            "door_standoff must not be negative, got {}",
            config.door_standoff
        ));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(validate_config(&EngineConfig::default()).is_empty());
    }

    #[test]
    fn random_scheme_parses() {
        let config =
            EngineConfig::from_json(r#"{"color_scheme": {"mode": "random", "seed": 7}}"#).unwrap();
        assert_eq!(config.color_scheme, ColorScheme::Random { seed: 7 });
    }

    #[test]
    fn negative_wall_rejected() {
        let err = EngineConfig::from_json(r#"{"wall_thickness": -0.1}"#).unwrap_err();
        assert!(err.to_string().contains("wall_thickness"));
    }

    #[test]
    fn garbage_is_config_error() {
        assert!(matches!(
            EngineConfig::from_json("[]"),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn positional_array_is_not_a_config() {
        for body in ["[2.5]", "[8.0, 1.2, 0.1]", "3.0", "\"path_length\"", "null"] {
            assert!(
                matches!(EngineConfig::from_json(body), Err(EngineError::Config(_))),
                "accepted {}",
                body
            );
        }
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
    }
}
