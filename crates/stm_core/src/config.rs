//! Core configuration.
//!
//! Every field has a default, so an empty JSON object is a valid
//! configuration.

use crate::logging::default_log_level;
use crate::ports::Destination;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    InvalidDestination(String),
    UnsupportedLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "invalid configuration: {message}"),
            Self::InvalidDestination(value) => {
                write!(f, "destination must be an absolute route, got `{value}`")
            }
            Self::UnsupportedLogLevel(value) => write!(f, "unsupported log level `{value}`"),
        }
    }
}

impl Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value.to_string())
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `trace|debug|info|warn|error`, case-insensitive.
    pub level: String,
    /// Absolute directory for rolling log files. `None` disables file logging.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

/// Settings of one client session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoreConfig {
    /// Where a project view navigates after an eviction.
    pub eviction_destination: Destination,
    pub logging: LoggingConfig,
}

impl CoreConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.eviction_destination.as_str().starts_with('/') {
            return Err(ConfigError::InvalidDestination(
                self.eviction_destination.to_string(),
            ));
        }
        if normalize_level(&self.logging.level).is_none() {
            return Err(ConfigError::UnsupportedLogLevel(self.logging.level.clone()));
        }
        Ok(())
    }
}

/// Maps a user-supplied level onto the canonical level names.
pub(crate) fn normalize_level(level: &str) -> Option<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}
