//! Game settings and tuning
//!
//! Loaded from a JSON file when one is given; every field falls back to its
//! default so partial files work.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::WorldConfig;

/// Audio preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed; `None` picks one from the clock
    pub seed: Option<u64>,
    pub world: WorldConfig,
    pub audio: AudioSettings,
}

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "settings file unreadable: {}", e),
            Self::Parse(e) => write!(f, "settings file malformed: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn read_from(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        match Self::read_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_defaults_match_constants() {
        let settings = Settings::default();
        assert_eq!(settings.world.spawn.target, TARGET_POPULATION);
        assert_eq!(settings.world.spawn.margin, SPAWN_MARGIN);
        assert_eq!(settings.world.spawn.bounds.half_width, BACKGROUND_WIDTH / 2.0);
        assert_eq!(settings.world.player_speed, PLAYER_SPEED);
        assert_eq!(settings.world.overlay_duration, OVERLAY_DURATION);
        assert!(settings.seed.is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(
            r#"{ "seed": 9, "world": { "spawn": { "target": 5 } }, "audio": { "muted": true } }"#,
        )
        .unwrap();
        assert_eq!(settings.seed, Some(9));
        assert_eq!(settings.world.spawn.target, 5);
        assert_eq!(settings.world.spawn.margin, SPAWN_MARGIN);
        assert_eq!(settings.world.reveal_radius, REVEAL_RADIUS);
        assert!(settings.audio.muted);
        assert_eq!(settings.audio.master_volume, 0.8);

        // A bounds block naming one axis keeps the other and the rest of the file
        let settings = Settings::from_json(
            r#"{ "seed": 4, "world": { "spawn": { "target": 2, "bounds": { "half_width": 600.0 } } } }"#,
        )
        .unwrap();
        assert_eq!(settings.seed, Some(4));
        assert_eq!(settings.world.spawn.target, 2);
        assert_eq!(settings.world.spawn.bounds.half_width, 600.0);
        assert_eq!(settings.world.spawn.bounds.half_height, BACKGROUND_HEIGHT / 2.0);
    }

    #[test]
    fn test_malformed_json_is_error() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = std::env::temp_dir().join("critter-catch-does-not-exist.json");
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "critter-catch-settings-{}.json",
            std::process::id()
        ));
        let mut settings = Settings::default();
        settings.world.reveal_radius = 321.0;
        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path);
        let _ = fs::remove_file(&path);
        assert_eq!(loaded.world.reveal_radius, 321.0);
    }
}
