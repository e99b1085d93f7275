//! Realm configuration
//!
//! # Configuration hierarchy
//!
//! ```text
//! Priority (high → low):
//! 1. Environment variables (ES_BUILTINS_*)
//! 2. TOML file passed to `load_config`
//! 3. Default values
//! ```
//!
//! # Usage
//!
//! ```rust
//! use es_builtins::util::config::RealmConfig;
//!
//! let config = RealmConfig::from_toml_str("max_jobs_per_checkpoint = 64").unwrap();
//! assert_eq!(config.max_jobs_per_checkpoint, Some(64));
//! ```


use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::logger::LogLevel;

/// Environment variable overriding `max_jobs_per_checkpoint` (`none` clears it)
pub const ENV_MAX_JOBS: &str = "ES_BUILTINS_MAX_JOBS";
/// Environment variable overriding `track_unhandled_rejections`
pub const ENV_TRACK_REJECTIONS: &str = "ES_BUILTINS_TRACK_REJECTIONS";
/// Environment variable overriding `log_level`
pub const ENV_LOG: &str = "ES_BUILTINS_LOG";

/// Settings of one realm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealmConfig {
    /// Jobs one checkpoint may run before giving up. `None` drains until empty.
    #[serde(default)]
    pub max_jobs_per_checkpoint: Option<usize>,
    /// Record promises that reject with no reaction attached
    #[serde(default = "default_track_rejections")]
    pub track_unhandled_rejections: bool,
    /// Level used by `logger::init_with_level` when the host asks for it
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_track_rejections() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RealmConfig {
    fn default() -> Self {
        Self {
            max_jobs_per_checkpoint: None,
            track_unhandled_rejections: true,
            log_level: default_log_level(),
        }
    }
}

impl RealmConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Parsed `log_level`
    pub fn log_level(&self) -> Result<LogLevel, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }

    /// Apply `ES_BUILTINS_*` overrides from the process environment.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any variable source.
    pub fn apply_overrides<F>(
        mut self,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_MAX_JOBS) {
            let raw = raw.trim();
            self.max_jobs_per_checkpoint = if raw.eq_ignore_ascii_case("none") || raw.is_empty() {
                None
            } else {
                Some(raw.parse().map_err(|_| ConfigError::InvalidEnv {
                    var: ENV_MAX_JOBS,
                    value: raw.to_string(),
                })?)
            };
        }

        if let Some(raw) = lookup(ENV_TRACK_REJECTIONS) {
            self.track_unhandled_rejections = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: ENV_TRACK_REJECTIONS,
                        value: raw,
                    })
                }
            };
        }

        if let Some(raw) = lookup(ENV_LOG) {
            if raw.parse::<LogLevel>().is_err() {
                return Err(ConfigError::InvalidLogLevel(raw));
            }
            self.log_level = raw.trim().to_ascii_lowercase();
        }

        Ok(self)
    }
}

/// Load a realm configuration file.
///
/// A missing file yields the defaults.
pub fn load_config(path: &Path) -> anyhow::Result<RealmConfig> {
    if !path.exists() {
        return Ok(RealmConfig::default());
    }
    let content = fs::read_to_string(path)
        .map_err(ConfigError::Io)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = RealmConfig::from_toml_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    config
        .log_level()
        .with_context(|| format!("invalid log level in {}", path.display()))?;
    Ok(config)
}

/// Write a realm configuration file
pub fn save_config(
    path: &Path,
    config: &RealmConfig,
) -> anyhow::Result<()> {
    let content = config.to_toml_string()?;
    fs::write(path, content)
        .map_err(ConfigError::Io)
        .with_context(|| format!("failed to write config file {}", path.display()))
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(toml::de::Error),

    #[error("Config serialize error: {0}")]
    Serialize(toml::ser::Error),

    #[error("Invalid value `{value}` for {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Unknown log level `{0}`")]
    InvalidLogLevel(String),
}
