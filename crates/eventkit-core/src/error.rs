//! Error handling for eventkit
//!
//! Provides the error types surfaced by the event bus:
//! - Event bus errors (naming, listener failures during publish)
//! - Configuration errors (loading, saving, validation)
//!
//! All error types use `thiserror` for ergonomic error handling.
//! Listener callbacks report their own failures as `anyhow::Error`.

use thiserror::Error;

/// Event bus error type
#[derive(Error, Debug)]
pub enum EventBusError {
    /// An event name was empty or contained only whitespace
    #[error("Event name must not be empty")]
    EmptyEventName,

    /// A listener failed and delivery was aborted
    #[error("Listener #{position} for event {event} failed: {source}")]
    ListenerFailed {
        /// Debug rendering of the event key being published, so string keys keep their quotes.
        event: String,
        /// Zero-based position of the failing listener in registration order.
        position: usize,
        /// The error returned by the listener.
        #[source]
        source: anyhow::Error,
    },

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl EventBusError {
    /// Check whether this error came from a listener callback
    pub fn is_listener_failure(&self) -> bool {
        matches!(self, EventBusError::ListenerFailed { .. })
    }
}

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file format is not supported
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// A configuration value is invalid
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting {
        /// Name of the offending field.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Result type alias using the event bus error
pub type Result<T> = std::result::Result<T, EventBusError>;
