//! Composition root demo: builds one bus and wires two components through it.

use std::path::Path;
use std::sync::Arc;

use eventkit::{init_logging, EventBus, EventBusConfig, EventName, Listener, SharedEventBus};
use serde_json::{json, Value};

/// Publishes session events; knows nothing about who listens
struct SessionService {
    bus: SharedEventBus,
}

impl SessionService {
    fn new(bus: SharedEventBus) -> Self {
        Self { bus }
    }

    fn login(&self, user: &str) -> anyhow::Result<()> {
        self.announce("login", user)
    }

    fn logout(&self, user: &str) -> anyhow::Result<()> {
        self.announce("logout", user)
    }

    /// A failing listener must not fail the session itself
    fn announce(&self, event: &str, user: &str) -> anyhow::Result<()> {
        match self.bus.publish(event, Some(&json!({ "user": user }))) {
            Ok(_) => Ok(()),
            Err(err) if err.is_listener_failure() => {
                tracing::warn!("{}", err);
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Records session activity; subscribes itself on construction
struct AuditLog {
    login: Listener<Value>,
}

impl AuditLog {
    fn attach(bus: &SharedEventBus) -> anyhow::Result<Self> {
        let login = Listener::new(|data: Option<&Value>| {
            let user = data.and_then(|d| d.get("user")).and_then(Value::as_str);
            tracing::info!("audit: login by {}", user.unwrap_or("<unknown>"));
        });
        bus.register(EventName::new("login")?, &login);
        bus.subscribe(EventName::new("logout")?, |data| {
            let user = data.and_then(|d| d.get("user")).and_then(Value::as_str);
            tracing::info!("audit: logout by {}", user.unwrap_or("<unknown>"));
        });
        Ok(Self { login })
    }

    fn detach_login(&self, bus: &SharedEventBus) {
        bus.unregister("login", &self.login);
    }
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!("eventkit {} (built {})", eventkit::VERSION, eventkit::BUILD_DATE);

    let bus: EventBus = match std::env::args().nth(1) {
        Some(path) => EventBus::from_config_file(Path::new(&path))?,
        None => EventBus::with_config(EventBusConfig::default()),
    };
    tracing::info!("Error policy: {}", bus.config().error_policy);

    let bus: SharedEventBus = Arc::new(bus);

    let audit = AuditLog::attach(&bus)?;
    bus.subscribe(EventName::new("login")?, |_| {
        tracing::info!("greeter: welcome back");
    });

    let sessions = SessionService::new(bus.clone());
    sessions.login("a")?;

    audit.detach_login(&bus);
    sessions.login("b")?;
    sessions.logout("b")?;

    tracing::debug!("{:?}", bus);
    Ok(())
}
