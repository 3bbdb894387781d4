//! Application configuration management.
//!
//! Handles loading, saving, and validating the tag configuration including:
//! - The shared secret the peer must present to authenticate
//! - RSSI threshold and weak-signal debounce limit for the leash alarm
//! - Sampler and indicator cadences
//! - Default profile field contents

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LeashError, Result};
use crate::profile::MAX_FIELD_LEN;

/// Maximum length of the shared secret in bytes.
pub const MAX_SECRET_LEN: usize = 20;

/// Main tag configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TagConfig {
    /// Device name used in advertising and logs.
    pub device_name: String,

    /// Shared secret the peer writes to the credential attribute.
    pub secret: String,

    /// RSSI threshold for the leash alarm in dBm.
    /// Samples at or below this value count toward the weak-signal streak.
    pub rssi_threshold: i8,

    /// Consecutive weak samples tolerated before the alarm triggers.
    /// The alarm latches on the first sample that pushes the streak past this.
    pub weak_signal_limit: u8,

    /// Signal-strength sampling interval in seconds.
    pub sample_interval_secs: u64,

    /// Indicator refresh interval in milliseconds.
    pub indicator_interval_ms: u64,

    /// Initial profile field contents.
    pub profile: ProfileDefaults,
}

/// Default contents for the four profile fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDefaults {
    /// Pet name field.
    pub pet_name: String,
    /// Owner name field.
    pub owner_name: String,
    /// Owner address field.
    pub owner_address: String,
    /// Owner phone field.
    pub owner_phone: String,
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            pet_name: "pet name".to_string(),
            owner_name: "owner name".to_string(),
            owner_address: "owner address".to_string(),
            owner_phone: "owner phone".to_string(),
        }
    }
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            device_name: "leash-tag".to_string(),
            secret: "hello".to_string(),
            rssi_threshold: -70,
            weak_signal_limit: 5,
            sample_interval_secs: 1,
            indicator_interval_ms: 250,
            profile: ProfileDefaults::default(),
        }
    }
}

impl TagConfig {
    /// Load configuration from the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed, or
    /// validated.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    ///
    /// On the device: `/etc/leash/config.toml`
    /// For development: `~/.config/leash/config.toml`
    #[must_use]
    pub fn default_path() -> PathBuf {
        #[cfg(target_os = "linux")]
        {
            PathBuf::from("/etc/leash/config.toml")
        }
        #[cfg(not(target_os = "linux"))]
        {
            directories::ProjectDirs::from("", "", "leash").map_or_else(
                || PathBuf::from("leash-config.toml"),
                |dirs| dirs.config_dir().join("config.toml"),
            )
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValidation` for the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.secret.is_empty() {
            return Err(LeashError::ConfigValidation {
                field: "secret",
                message: "must not be empty".to_string(),
            });
        }
        if self.secret.len() > MAX_SECRET_LEN {
            return Err(LeashError::ConfigValidation {
                field: "secret",
                message: format!(
                    "exceeds maximum length of {MAX_SECRET_LEN} bytes (got {})",
                    self.secret.len()
                ),
            });
        }
        if self.weak_signal_limit == 0 {
            return Err(LeashError::ConfigValidation {
                field: "weak_signal_limit",
                message: "must be at least 1".to_string(),
            });
        }
        if self.sample_interval_secs == 0 {
            return Err(LeashError::ConfigValidation {
                field: "sample_interval_secs",
                message: "must be at least 1".to_string(),
            });
        }
        if self.indicator_interval_ms == 0 {
            return Err(LeashError::ConfigValidation {
                field: "indicator_interval_ms",
                message: "must be at least 1".to_string(),
            });
        }
        for (field, value) in [
            ("profile.pet_name", &self.profile.pet_name),
            ("profile.owner_name", &self.profile.owner_name),
            ("profile.owner_address", &self.profile.owner_address),
            ("profile.owner_phone", &self.profile.owner_phone),
        ] {
            if value.len() > MAX_FIELD_LEN {
                return Err(LeashError::ConfigValidation {
                    field,
                    message: format!(
                        "exceeds maximum length of {MAX_FIELD_LEN} bytes (got {})",
                        value.len()
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_device() {
        let config = TagConfig::default();
        assert_eq!(config.secret, "hello");
        assert_eq!(config.rssi_threshold, -70);
        assert_eq!(config.weak_signal_limit, 5);
        assert_eq!(config.sample_interval_secs, 1);
        assert_eq!(config.indicator_interval_ms, 250);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_or_default_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = TagConfig::load_or_default(&path).unwrap();
        assert_eq!(config.secret, "hello");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leash").join("config.toml");

        let mut config = TagConfig::default();
        config.secret = "sesame".to_string();
        config.rssi_threshold = -60;
        config.save(&path).unwrap();

        let loaded = TagConfig::load(&path).unwrap();
        assert_eq!(loaded.secret, "sesame");
        assert_eq!(loaded.rssi_threshold, -60);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "rssi_threshold = -55\n").unwrap();

        let config = TagConfig::load(&path).unwrap();
        assert_eq!(config.rssi_threshold, -55);
        assert_eq!(config.weak_signal_limit, 5);
        assert_eq!(config.secret, "hello");
    }

    #[test]
    fn test_validation_rejects_empty_secret() {
        let config = TagConfig {
            secret: String::new(),
            ..TagConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_validation_rejects_oversized_secret() {
        let config = TagConfig {
            secret: "x".repeat(MAX_SECRET_LEN + 1),
            ..TagConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_oversized_profile_default() {
        let mut config = TagConfig::default();
        config.profile.pet_name = "x".repeat(MAX_FIELD_LEN + 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_debounce_limit() {
        let config = TagConfig {
            weak_signal_limit: 0,
            ..TagConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "rssi_threshold = \"loud\"\n").unwrap();
        assert!(TagConfig::load(&path).is_err());
    }
}
