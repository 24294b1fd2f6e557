//! # Event Bus Module
//!
//! Provides an in-process publish/subscribe bus for decoupled communication
//! between components of one program.
//!
//! ## Overview
//!
//! - Listeners are registered against an event name, in order
//! - Publishing an event synchronously invokes its listeners in that order
//! - A listener is identified by its handle: clones of one [`Listener`]
//!   unregister together, separately created listeners never match
//! - Event keys default to the validated [`EventName`]; any
//!   `Eq + Hash + Clone + Debug` type, such as a closed enum, works too
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use eventkit_core::event_bus::{EventBus, EventName, Listener, SharedEventBus};
//! use serde_json::json;
//!
//! // Build one bus at the composition root and hand it out
//! let bus: SharedEventBus = Arc::new(EventBus::new());
//!
//! let greeter = Listener::new(|data: Option<&serde_json::Value>| {
//!     if let Some(user) = data.and_then(|d| d.get("user")) {
//!         println!("Welcome back, {}", user);
//!     }
//! });
//! bus.register(EventName::new("login")?, &greeter);
//!
//! bus.publish("login", Some(&json!({ "user": "a" })))?;
//!
//! // Unregister when done
//! bus.unregister("login", &greeter);
//! # Ok::<(), eventkit_core::EventBusError>(())
//! ```

mod bus;
mod config;
mod listener;
mod name;

pub use bus::*;
pub use config::*;
pub use listener::*;
pub use name::*;
