//! # eventkit
//!
//! A synchronous, in-process publish/subscribe bus.
//!
//! ## Architecture
//!
//! eventkit is organized as a workspace:
//!
//! 1. **eventkit-core** - Event bus, listener handles, event names, config, errors
//! 2. **eventkit** - This facade crate, logging setup and a demo binary
//!
//! ## Features
//!
//! - **Ordered delivery**: listeners run in registration order on the publishing thread
//! - **Identity-based removal**: unregistering a listener removes every registration of it
//! - **Typed keys and payloads**: validated `EventName` strings or caller-defined enums
//! - **Failure policy**: fail fast on the first listener error, or isolate and report
//! - **File config**: JSON or TOML bus configuration

pub use eventkit_core::event_bus;
pub use eventkit_core::{
    ConfigError, ErrorPolicy, EventBus, EventBusConfig, EventBusError, EventName, Listener,
    ListenerFailure, Payload, PublishReport, Result, SharedEventBus,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Build the log filter from RUST_LOG, falling back to `info` when unset or invalid
pub fn env_filter() -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let env_filter = env_filter();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
