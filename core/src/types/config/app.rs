use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

use super::Retention;

/// User-facing application configuration, persisted as config.toml.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub recovery: RecoveryConfig,
}

impl AppConfig {
    /// Returns the config file path within the given data directory.
    pub fn path(data_dir: &Path) -> std::path::PathBuf {
        data_dir.join("config.toml")
    }

    /// Loads config from a TOML file. Returns default config if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, AppConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), AppConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates config values and returns list of validation errors.
    /// Returns empty vec if config is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.general.prefix.trim().is_empty() {
            errors.push("prefix must not be empty".to_string());
        } else if self.general.prefix.chars().any(char::is_whitespace) {
            errors.push("prefix must not contain whitespace".to_string());
        }

        if self.recovery.timer_expire_days == 0 {
            errors.push("timer_expire_days must be at least 1".to_string());
        }

        errors
    }

    /// Returns a validated config, replacing invalid values with defaults.
    pub fn with_defaults_for_invalid(&self) -> Self {
        let defaults = Self::default();
        let prefix = self.general.prefix.trim();
        Self {
            general: GeneralConfig {
                prefix: if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
                    defaults.general.prefix
                } else {
                    prefix.to_string()
                },
            },
            recovery: RecoveryConfig {
                timer_expire_days: if self.recovery.timer_expire_days == 0 {
                    defaults.recovery.timer_expire_days
                } else {
                    self.recovery.timer_expire_days
                },
                backend: self.recovery.backend,
            },
        }
    }
}

/// General application settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Project prefix prepended to bare issue numbers.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

fn default_prefix() -> String {
    "UE".to_string()
}

/// Where saved timers live.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Single redb file.
    #[default]
    Database,
    /// One JSON file per issue.
    Files,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Database => write!(f, "database"),
            BackendKind::Files => write!(f, "files"),
        }
    }
}

/// Timer recovery settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecoveryConfig {
    #[serde(default = "default_timer_expire_days")]
    pub timer_expire_days: u32,
    #[serde(default)]
    pub backend: BackendKind,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            timer_expire_days: default_timer_expire_days(),
            backend: BackendKind::default(),
        }
    }
}

fn default_timer_expire_days() -> u32 {
    Retention::DEFAULT_DAYS
}

/// Errors that can occur when loading or saving config.
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
