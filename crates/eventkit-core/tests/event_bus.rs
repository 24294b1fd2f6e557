use eventkit_core::event_bus::*;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::thread;

type Log = Arc<Mutex<Vec<(&'static str, Option<Value>)>>>;

fn recorder(log: &Log, tag: &'static str) -> Listener<Value> {
    let log = log.clone();
    Listener::new(move |data: Option<&Value>| log.lock().push((tag, data.cloned())))
}

fn name(s: &str) -> EventName {
    EventName::new(s).unwrap()
}

#[test]
fn test_login_scenario() {
    let bus: EventBus = EventBus::new();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let f = recorder(&log, "f");
    let g = recorder(&log, "g");

    bus.register(name("login"), &f);
    bus.register(name("login"), &g);

    bus.publish("login", Some(&json!({ "user": "a" }))).unwrap();
    assert_eq!(
        *log.lock(),
        vec![
            ("f", Some(json!({ "user": "a" }))),
            ("g", Some(json!({ "user": "a" }))),
        ]
    );

    log.lock().clear();
    bus.unregister("login", &f);
    bus.publish("login", Some(&json!({ "user": "b" }))).unwrap();
    assert_eq!(*log.lock(), vec![("g", Some(json!({ "user": "b" })))]);
}

#[test]
fn test_unregister_never_registered_is_noop() {
    let bus: EventBus = EventBus::new();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let f = recorder(&log, "f");
    let stranger = recorder(&log, "stranger");

    bus.register(name("login"), &f);

    assert_eq!(bus.unregister("login", &stranger), 0);
    assert_eq!(bus.unregister("logout", &f), 0);
    assert_eq!(bus.listener_count("login"), 1);
    assert_eq!(bus.total_listeners(), 1);
}

#[test]
fn test_events_are_independent() {
    let bus: EventBus = EventBus::new();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let shared = recorder(&log, "shared");
    let only_logout = recorder(&log, "only_logout");

    bus.register(name("login"), &shared);
    bus.register(name("logout"), &shared);
    bus.register(name("logout"), &only_logout);

    bus.publish("login", None).unwrap();
    assert_eq!(*log.lock(), vec![("shared", None)]);

    // Removing from one event leaves the other untouched
    bus.unregister("login", &shared);
    log.lock().clear();
    bus.publish("logout", None).unwrap();
    assert_eq!(*log.lock(), vec![("shared", None), ("only_logout", None)]);
}

#[test]
fn test_closed_enum_keys() {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum SessionEvent {
        Login,
        Logout,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum SessionPayload {
        User(String),
    }

    let bus: EventBus<SessionPayload, SessionEvent> = EventBus::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = seen.clone();

    bus.subscribe(SessionEvent::Login, move |data| {
        s.lock().push(data.cloned());
    });

    bus.publish(&SessionEvent::Login, Some(&SessionPayload::User("a".into())))
        .unwrap();
    bus.publish(&SessionEvent::Logout, None).unwrap();

    assert_eq!(*seen.lock(), vec![Some(SessionPayload::User("a".into()))]);
    assert!(!bus.has_listeners(&SessionEvent::Logout));
}

#[test]
fn test_reentrant_registration() {
    let bus: SharedEventBus = Arc::new(EventBus::new());
    let late_calls = Arc::new(AtomicUsize::new(0));

    let weak: Weak<EventBus> = Arc::downgrade(&bus);
    let calls = late_calls.clone();
    let late = Listener::new(move |_| {
        calls.fetch_add(1, Ordering::SeqCst);
    });
    let to_add = late.clone();

    bus.subscribe(name("boot"), move |_| {
        if let Some(bus) = weak.upgrade() {
            bus.register(name("boot"), &to_add);
        }
    });

    // The listener added during delivery only sees the next publish
    let report = bus.publish("boot", None).unwrap();
    assert_eq!(report.invoked, 1);
    assert_eq!(late_calls.load(Ordering::SeqCst), 0);

    bus.publish("boot", None).unwrap();
    assert_eq!(late_calls.load(Ordering::SeqCst), 1);
    assert_eq!(bus.listener_count("boot"), 3);
}

#[test]
fn test_listener_unregisters_itself() {
    let bus: SharedEventBus = Arc::new(EventBus::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let slot: Arc<Mutex<Option<Listener<Value>>>> = Arc::new(Mutex::new(None));

    let weak = Arc::downgrade(&bus);
    let c = calls.clone();
    let s = slot.clone();
    let once = Listener::new(move |_| {
        c.fetch_add(1, Ordering::SeqCst);
        if let (Some(bus), Some(me)) = (weak.upgrade(), s.lock().take()) {
            bus.unregister("tick", &me);
        }
    });
    *slot.lock() = Some(once.clone());
    bus.register(name("tick"), &once);

    bus.publish("tick", None).unwrap();
    bus.publish("tick", None).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!bus.has_listeners("tick"));
}

#[test]
fn test_concurrent_publish() {
    let bus: SharedEventBus = Arc::new(EventBus::new());
    let counter = Arc::new(AtomicUsize::new(0));

    for _ in 0..4 {
        let c = counter.clone();
        bus.subscribe(name("sample"), move |data| {
            let n = data.and_then(Value::as_u64).unwrap_or(0) as usize;
            c.fetch_add(n, Ordering::SeqCst);
        });
    }

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let bus = bus.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    bus.publish("sample", Some(&json!(1))).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("publisher thread panicked");
    }

    assert_eq!(counter.load(Ordering::SeqCst), 8 * 100 * 4);
}

#[test]
fn test_isolated_failures_are_reported_in_order() {
    let bus: EventBus =
        EventBus::with_config(EventBusConfig::new().with_error_policy(ErrorPolicy::Isolate));

    bus.register(name("sync"), &Listener::fallible(|_| anyhow::bail!("first")));
    bus.subscribe(name("sync"), |_| {});
    bus.register(name("sync"), &Listener::fallible(|_| anyhow::bail!("second")));

    let report = bus.publish("sync", None).unwrap();
    let failures: Vec<(usize, String)> = report
        .failures
        .iter()
        .map(|f| (f.position, f.error.to_string()))
        .collect();
    assert_eq!(
        failures,
        vec![(0, "first".to_string()), (2, "second".to_string())]
    );
    assert_eq!(report.delivered(), 1);
}
