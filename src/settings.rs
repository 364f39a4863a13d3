//! Game tuning and configuration
//!
//! Every gameplay number lives here so it can be overridden from a JSON
//! file. Missing fields fall back to the defaults in [`crate::consts`].

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Character ===
    /// Downward acceleration once the run has started
    pub gravity: f32,
    /// Upward impulse per flap (and on start)
    pub flap_impulse: f32,
    pub character_mass: f32,
    pub character_radius: f32,

    // === Scenery ===
    pub ground_height: f32,
    pub wall_size: Vec2,
    pub wall_center_offset: f32,
    pub score_zone_size: f32,

    // === Spawning ===
    pub spawn_interval_secs: f32,
    pub spawn_retry_secs: f32,
    pub gap_jitter: f32,
    pub scroll_secs_per_unit: f32,
    pub offscreen_margin: f32,

    // === Restart control ===
    pub restart_size: Vec2,
    pub restart_reveal_secs: f32,

    /// RNG seed for gap placement
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            gravity: GRAVITY,
            flap_impulse: FLAP_IMPULSE,
            character_mass: CHARACTER_MASS,
            character_radius: CHARACTER_RADIUS,

            ground_height: GROUND_HEIGHT,
            wall_size: Vec2::new(WALL_WIDTH, WALL_HEIGHT),
            wall_center_offset: WALL_CENTER_OFFSET,
            score_zone_size: SCORE_ZONE_SIZE,

            spawn_interval_secs: SPAWN_INTERVAL_SECS,
            spawn_retry_secs: SPAWN_RETRY_SECS,
            gap_jitter: GAP_JITTER,
            scroll_secs_per_unit: SCROLL_SECS_PER_UNIT,
            offscreen_margin: OFFSCREEN_MARGIN,

            restart_size: Vec2::new(RESTART_WIDTH, RESTART_HEIGHT),
            restart_reveal_secs: RESTART_REVEAL_SECS,

            seed: 0,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("character_mass", self.character_mass),
            ("character_radius", self.character_radius),
            ("wall_size.x", self.wall_size.x),
            ("wall_size.y", self.wall_size.y),
            ("score_zone_size", self.score_zone_size),
            ("spawn_interval_secs", self.spawn_interval_secs),
            ("spawn_retry_secs", self.spawn_retry_secs),
            ("scroll_secs_per_unit", self.scroll_secs_per_unit),
            ("restart_reveal_secs", self.restart_reveal_secs),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("gravity", self.gravity),
            ("flap_impulse", self.flap_impulse),
            ("ground_height", self.ground_height),
            ("gap_jitter", self.gap_jitter),
            ("offscreen_margin", self.offscreen_margin),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SettingsError::Invalid(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }

        if self.ground_height >= self.screen_height {
            return Err(SettingsError::Invalid(format!(
                "ground_height {} leaves no room on a {} tall screen",
                self.ground_height, self.screen_height
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    #[inline]
    pub fn screen_center(&self) -> Vec2 {
        self.screen_size() / 2.0
    }

    /// Gravity as a vector (pointing down)
    #[inline]
    pub fn gravity_vec(&self) -> Vec2 {
        Vec2::new(0.0, -self.gravity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.spawn_interval_secs, 3.0);
        assert_eq!(settings.spawn_retry_secs, 1.0);
        assert_eq!(settings.flap_impulse, 90.0);
        assert_eq!(settings.gap_jitter, 200.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 42, "screen_width": 500.0 }"#).unwrap();
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.screen_width, 500.0);
        assert_eq!(settings.screen_height, SCREEN_HEIGHT);
        assert_eq!(settings.wall_size, Vec2::new(WALL_WIDTH, WALL_HEIGHT));
    }

    #[test]
    fn test_parse_error() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Settings::from_json(r#"{ "spawn_interval_secs": 0.0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        assert!(err.to_string().contains("spawn_interval_secs"));

        let err = Settings::from_json(r#"{ "gravity": -5.0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));

        let err = Settings::from_json(r#"{ "ground_height": 2000.0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load("/definitely/not/here/settings.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
