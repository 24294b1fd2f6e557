//! Event bus configuration.
//!
//! Configuration can be built in code or loaded from a `.json` / `.toml`
//! file. It is validated on load and on save.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// What `publish` does when a listener returns an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Abort delivery at the first failing listener and return the error.
    #[default]
    FailFast,
    /// Log the error, record it in the report and keep delivering.
    Isolate,
}

impl std::fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorPolicy::FailFast => write!(f, "fail_fast"),
            ErrorPolicy::Isolate => write!(f, "isolate"),
        }
    }
}

/// Configuration for the event bus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventBusConfig {
    /// Listener failure handling during publish.
    pub error_policy: ErrorPolicy,
    /// Warn once an event accumulates this many listeners. 0 disables the warning.
    pub listener_warning_threshold: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicy::FailFast,
            listener_warning_threshold: 64,
        }
    }
}

impl EventBusConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the listener failure policy
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Set the per-event listener warning threshold
    pub fn with_listener_warning_threshold(mut self, threshold: usize) -> Self {
        self.listener_warning_threshold = threshold;
        self
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded event bus config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        // A threshold of 1 would warn on every first registration
        if self.listener_warning_threshold == 1 {
            return Err(ConfigError::InvalidSetting {
                key: "listener_warning_threshold".to_string(),
                reason: "must be 0 (disabled) or greater than 1".to_string(),
            });
        }

        Ok(())
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
