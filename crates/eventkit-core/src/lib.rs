//! # eventkit Core
//!
//! Core types for eventkit: the synchronous in-process event bus, its
//! listener handles and configuration, and the error types they share.

pub mod error;
pub mod event_bus;

pub use error::{ConfigError, EventBusError, Result};

// Re-export event bus for convenience
pub use event_bus::{
    ErrorPolicy, EventBus, EventBusConfig, EventName, Listener, ListenerFailure, Payload,
    PublishReport, SharedEventBus,
};
