//! Event Bus implementation.
//!
//! Provides the core EventBus struct: a registry of event names, each mapped
//! to the listeners registered for it in registration order.

use parking_lot::RwLock;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::path::Path;
use std::sync::Arc;

use super::config::{ErrorPolicy, EventBusConfig};
use super::listener::Listener;
use super::name::EventName;
use crate::error::{EventBusError, Result};

/// Default payload type for buses whose events carry open-ended data
pub type Payload = serde_json::Value;

/// Handle for passing one bus to every component that needs it
pub type SharedEventBus<P = Payload, K = EventName> = Arc<EventBus<P, K>>;

/// A listener error collected while publishing under [`ErrorPolicy::Isolate`]
#[derive(Debug)]
pub struct ListenerFailure {
    /// Zero-based position of the listener in registration order.
    pub position: usize,
    /// The error returned by the listener.
    pub error: anyhow::Error,
}

/// Outcome of a single publish
#[derive(Debug, Default)]
pub struct PublishReport {
    /// Number of listeners that were invoked.
    pub invoked: usize,
    /// Listener errors that were isolated instead of aborting delivery.
    pub failures: Vec<ListenerFailure>,
}

impl PublishReport {
    /// Number of listeners that returned successfully
    pub fn delivered(&self) -> usize {
        self.invoked - self.failures.len()
    }

    /// True when no listener failed
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Central event bus for in-process publish/subscribe
///
/// Delivery is synchronous: `publish` runs every listener on the calling
/// thread, in registration order, before returning. The registry is locked
/// only while it is read or mutated, never while listeners run, so a
/// listener may register or unregister on the same bus.
pub struct EventBus<P = Payload, K = EventName> {
    /// Registered listeners by event, in registration order
    registry: RwLock<HashMap<K, Vec<Listener<P>>>>,
    /// Configuration
    config: EventBusConfig,
}

impl<P, K> EventBus<P, K>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    /// Create a new event bus with default configuration
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// Create a new event bus with custom configuration
    pub fn with_config(config: EventBusConfig) -> Self {
        Self {
            registry: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Create a new event bus from a `.json` or `.toml` config file
    pub fn from_config_file(path: &Path) -> Result<Self> {
        let config = EventBusConfig::load_from_file(path)?;
        Ok(Self::with_config(config))
    }

    /// Register a listener for an event
    ///
    /// Registering the same listener twice adds it twice; it will then be
    /// invoked twice per publish.
    pub fn register(&self, event: K, listener: &Listener<P>) {
        let mut registry = self.registry.write();
        let listeners = registry.entry(event.clone()).or_default();
        listeners.push(listener.clone());
        let count = listeners.len();
        drop(registry);

        tracing::debug!("Listener registered for {:?} ({} total)", event, count);

        let threshold = self.config.listener_warning_threshold;
        if threshold > 0 && count == threshold {
            tracing::warn!(
                "Event {:?} has {} listeners, possible listener leak",
                event,
                count
            );
        }
    }

    /// Wrap a callback in a listener, register it, and return the handle
    ///
    /// Keep the returned handle to unregister the callback later.
    pub fn subscribe<F>(&self, event: K, callback: F) -> Listener<P>
    where
        F: Fn(Option<&P>) + Send + Sync + 'static,
    {
        let listener = Listener::new(callback);
        self.register(event, &listener);
        listener
    }

    /// Remove every registration of `listener` under `event`
    ///
    /// Returns the number of registrations removed. Unknown events and
    /// listeners that were never registered are a no-op.
    pub fn unregister<Q>(&self, event: &Q, listener: &Listener<P>) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let mut registry = self.registry.write();
        let Some(listeners) = registry.get_mut(event) else {
            return 0;
        };

        let before = listeners.len();
        listeners.retain(|registered| !registered.same_as(listener));
        let removed = before - listeners.len();

        if listeners.is_empty() {
            registry.remove(event);
        }
        drop(registry);

        if removed > 0 {
            tracing::debug!("Listener removed from {:?} ({} registrations)", event, removed);
        }
        removed
    }

    /// Publish an event to every listener registered for it
    ///
    /// Listeners are invoked in registration order with `data`. Publishing
    /// an event nobody listens to does nothing. A listener error aborts
    /// delivery under [`ErrorPolicy::FailFast`] and is collected into the
    /// report under [`ErrorPolicy::Isolate`].
    pub fn publish<Q>(&self, event: &Q, data: Option<&P>) -> Result<PublishReport>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        // Snapshot so listeners run without the lock held
        let snapshot = match self.registry.read().get(event) {
            Some(listeners) => listeners.clone(),
            None => {
                tracing::trace!("No listeners for {:?}", event);
                return Ok(PublishReport::default());
            }
        };

        tracing::trace!("Publishing {:?} to {} listeners", event, snapshot.len());

        let mut report = PublishReport::default();
        for (position, listener) in snapshot.iter().enumerate() {
            report.invoked += 1;
            if let Err(error) = listener.call(data) {
                match self.config.error_policy {
                    ErrorPolicy::FailFast => {
                        return Err(EventBusError::ListenerFailed {
                            event: format!("{:?}", event),
                            position,
                            source: error,
                        });
                    }
                    ErrorPolicy::Isolate => {
                        tracing::warn!(
                            "Listener #{} for {:?} failed: {:#}",
                            position,
                            event,
                            error
                        );
                        report.failures.push(ListenerFailure { position, error });
                    }
                }
            }
        }

        Ok(report)
    }

    /// Get the number of registrations for an event
    pub fn listener_count<Q>(&self, event: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.registry.read().get(event).map_or(0, Vec::len)
    }

    /// Check whether an event has at least one listener
    pub fn has_listeners<Q>(&self, event: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.listener_count(event) > 0
    }

    /// Get the number of registrations across all events
    pub fn total_listeners(&self) -> usize {
        self.registry.read().values().map(Vec::len).sum()
    }

    /// Get the events that currently have listeners, in no particular order
    pub fn event_names(&self) -> Vec<K> {
        self.registry.read().keys().cloned().collect()
    }

    /// Remove every listener of one event
    ///
    /// Returns the number of registrations removed.
    pub fn clear<Q>(&self, event: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let removed = self.registry.write().remove(event).map_or(0, |l| l.len());
        if removed > 0 {
            tracing::debug!("Cleared {} listeners from {:?}", removed, event);
        }
        removed
    }

    /// Remove every listener of every event
    pub fn clear_all(&self) {
        self.registry.write().clear();
        tracing::debug!("Event bus registry cleared");
    }

    /// Get the current configuration
    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }
}

impl<P, K> Default for EventBus<P, K>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P, K> fmt::Debug for EventBus<P, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.read();
        f.debug_struct("EventBus")
            .field("events", &registry.len())
            .field("listeners", &registry.values().map(Vec::len).sum::<usize>())
            .field("config", &self.config)
            .finish()
    }
}
