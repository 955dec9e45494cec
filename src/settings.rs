//! Engine settings loaded from TOML
//!
//! Stored in ~/.config/blockfall/settings.toml (or platform equivalent).
//! A missing file means defaults; a file that exists but cannot be read or
//! parsed is an error, as are values the engine cannot run with.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Largest preview the queue can always serve (one full bag)
pub const MAX_PREVIEW: usize = 7;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("invalid gravity: {0}")]
    InvalidGravity(String),
    #[error("preview must be between 1 and {max}, got {0}", max = MAX_PREVIEW)]
    InvalidPreview(usize),
}

/// Engine settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Gravity timing
    pub gravity: GravitySettings,
    /// Piece queue
    pub queue: QueueSettings,
}

/// Gravity timing in milliseconds
///
/// Drop interval = max(min_interval_ms, base_interval_ms - (level - 1) * level_step_ms)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravitySettings {
    /// Interval at level 1
    pub base_interval_ms: u64,
    /// Reduction per level above 1
    pub level_step_ms: u64,
    /// Floor the interval never goes below
    pub min_interval_ms: u64,
}

/// Piece queue settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueSettings {
    /// Number of upcoming pieces exposed to the renderer
    pub preview: usize,
    /// Fixed randomizer seed; random when absent
    pub seed: Option<u64>,
}

impl Default for GravitySettings {
    fn default() -> Self {
        Self {
            base_interval_ms: 1000,
            level_step_ms: 75,
            min_interval_ms: 100,
        }
    }
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            preview: 5,
            seed: None,
        }
    }
}

impl GravitySettings {
    /// Drop interval for a level (levels start at 1)
    pub fn interval_for_level(&self, level: u32) -> Duration {
        let reduction = u64::from(level.saturating_sub(1)).saturating_mul(self.level_step_ms);
        let ms = self
            .base_interval_ms
            .saturating_sub(reduction)
            .max(self.min_interval_ms);
        Duration::from_millis(ms)
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("org", "blockfall", "blockfall")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the default settings file path
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from the default location, or defaults if there is none
    pub fn load() -> Result<Self, SettingsError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load and validate settings from a specific file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml(&contents)?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a file, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<PathBuf, SettingsError> {
        let path = Self::default_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let gravity = &self.gravity;
        if gravity.min_interval_ms == 0 {
            return Err(SettingsError::InvalidGravity(
                "min_interval_ms must be positive".to_string(),
            ));
        }
        if gravity.base_interval_ms < gravity.min_interval_ms {
            return Err(SettingsError::InvalidGravity(format!(
                "base_interval_ms ({}) is below min_interval_ms ({})",
                gravity.base_interval_ms, gravity.min_interval_ms
            )));
        }
        if !(1..=MAX_PREVIEW).contains(&self.queue.preview) {
            return Err(SettingsError::InvalidPreview(self.queue.preview));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_interval_decreases_to_floor() {
        let gravity = GravitySettings::default();
        assert_eq!(gravity.interval_for_level(1), Duration::from_millis(1000));
        assert_eq!(gravity.interval_for_level(2), Duration::from_millis(925));
        assert_eq!(gravity.interval_for_level(13), Duration::from_millis(100));
        assert_eq!(gravity.interval_for_level(500), Duration::from_millis(100));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings = Settings::from_toml("[gravity]\nlevel_step_ms = 50\n").unwrap();
        assert_eq!(settings.gravity.level_step_ms, 50);
        assert_eq!(settings.gravity.base_interval_ms, 1000);
        assert_eq!(settings.queue, QueueSettings::default());
    }

    #[test]
    fn test_seed_is_read() {
        let settings = Settings::from_toml("[queue]\nseed = 1234\n").unwrap();
        assert_eq!(settings.queue.seed, Some(1234));
    }

    #[test]
    fn test_malformed_toml_is_error() {
        let err = Settings::from_toml("[gravity\n").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_zero_floor_rejected() {
        let err = Settings::from_toml("[gravity]\nmin_interval_ms = 0\n").unwrap_err();
        assert!(matches!(err, SettingsError::InvalidGravity(_)));
    }

    #[test]
    fn test_base_below_floor_rejected() {
        let toml = "[gravity]\nbase_interval_ms = 50\nmin_interval_ms = 100\n";
        assert!(matches!(
            Settings::from_toml(toml),
            Err(SettingsError::InvalidGravity(_))
        ));
    }

    #[test]
    fn test_preview_bounds() {
        assert!(matches!(
            Settings::from_toml("[queue]\npreview = 0\n"),
            Err(SettingsError::InvalidPreview(0))
        ));
        assert!(matches!(
            Settings::from_toml("[queue]\npreview = 8\n"),
            Err(SettingsError::InvalidPreview(8))
        ));
        assert!(Settings::from_toml("[queue]\npreview = 7\n").is_ok());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!("blockfall-settings-{}", std::process::id()));
        let path = dir.join("settings.toml");
        let mut settings = Settings::default();
        settings.queue.seed = Some(77);
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("blockfall-does-not-exist/settings.toml");
        assert!(matches!(
            Settings::load_from(&path),
            Err(SettingsError::Io { .. })
        ));
    }
}
