//! Listener registry with identity-deduplicated, insertion-ordered fan-out
//!
//! Listener identity is an explicit caller-supplied token rather than
//! callback reference identity: registering a second listener under an
//! already-present token is a silent no-op, so a broadcast invokes it exactly
//! once. A listener that fails must not prevent the remaining listeners from
//! running; failures are logged and skipped.

use std::collections::HashMap;
use std::str::FromStr;

use crate::events::{AdEvent, EventName};

/// Type for listener callbacks
pub type ListenerCallback = Box<dyn Fn(&AdEvent) -> Result<(), String> + Send + Sync>;

/// A creative-registered event listener with its identity token
pub struct Listener {
    id: String,
    callback: ListenerCallback,
}

impl Listener {
    /// Create a listener. `id` is the stable identity token used for
    /// deduplication and removal.
    pub fn new<F>(id: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&AdEvent) -> Result<(), String> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            callback: Box::new(callback),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("callback", &"[ListenerCallback]")
            .finish()
    }
}

/// Ordered set of unique listeners for one event name
#[derive(Debug, Default)]
struct ListenerSet {
    entries: Vec<Listener>,
}

impl ListenerSet {
    /// Insert unless a listener with the same identity token is present.
    fn add(&mut self, listener: Listener) {
        if self.entries.iter().any(|e| e.id == listener.id) {
            return;
        }
        self.entries.push(listener);
    }

    /// Remove the listener with the given token. Returns whether it existed.
    fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn broadcast(&self, event: &AdEvent) {
        for entry in &self.entries {
            if let Err(e) = (entry.callback)(event) {
                log::warn!("listener {} failed for {}: {e}", entry.id, event.name());
            }
        }
    }
}

/// Maps event names to their listener sets
#[derive(Debug, Default)]
pub struct EventRegistry {
    listeners: HashMap<EventName, ListenerSet>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }

    /// Register a listener for an event name.
    ///
    /// An empty event name or listener token, or a name outside the
    /// recognized set, is rejected with an `error` event tagged
    /// `addEventListener`. Re-registering a present token is a silent no-op.
    pub fn subscribe(&mut self, event: &str, listener: Listener) {
        log::info!("addEventListener for event: {event}");

        if event.is_empty() || listener.id.is_empty() {
            self.fail("Both event and listener are required.", "addEventListener");
            return;
        }

        let name = match EventName::from_str(event) {
            Ok(name) => name,
            Err(e) => {
                self.fail(e.to_string(), "addEventListener");
                return;
            }
        };

        self.listeners.entry(name).or_default().add(listener);
    }

    /// Remove one listener by token, or every listener for the event when no
    /// token is given. The event's entry is dropped once its set is empty.
    pub fn unsubscribe(&mut self, event: &str, listener_id: Option<&str>) {
        log::info!("removeEventListener for event: {event}");

        if event.is_empty() {
            self.fail("Event is required.", "removeEventListener");
            return;
        }

        let name = match EventName::from_str(event) {
            Ok(name) => name,
            Err(e) => {
                self.fail(e.to_string(), "removeEventListener");
                return;
            }
        };

        match listener_id {
            None => {
                self.listeners.remove(&name);
                return;
            }
            Some(id) => {
                let not_found = match self.listeners.get_mut(&name) {
                    Some(set) => !set.remove(id),
                    // no set registered at all: silently nothing to do
                    None => false,
                };
                if not_found {
                    self.fail(
                        "Listener not currently registered for event.",
                        "removeEventListener",
                    );
                }
            }
        }

        if self.listeners.get(&name).is_some_and(|set| set.len() == 0) {
            self.listeners.remove(&name);
        }
    }

    /// Invoke every listener registered for the event's name, in insertion
    /// order. No-op when none are registered.
    pub fn broadcast(&self, event: &AdEvent) {
        if let Some(set) = self.listeners.get(&event.name()) {
            set.broadcast(event);
        }
    }

    /// Number of listeners currently registered for an event name
    pub fn listener_count(&self, name: EventName) -> usize {
        self.listeners.get(&name).map_or(0, ListenerSet::len)
    }

    fn fail(&self, message: impl Into<String>, action: &str) {
        let message = message.into();
        log::error!("{message}");
        self.broadcast(&AdEvent::error(message, action));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn counting_listener(id: &str, counter: Arc<AtomicUsize>) -> Listener {
        Listener::new(id, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    #[test]
    fn duplicate_identity_registers_once() {
        let mut registry = EventRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));

        registry.subscribe("ready", counting_listener("onReady", count.clone()));
        registry.subscribe("ready", counting_listener("onReady", count.clone()));
        assert_eq!(registry.listener_count(EventName::Ready), 1);

        registry.broadcast(&AdEvent::Ready);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unknown_event_name_is_rejected_with_error_event() {
        let mut registry = EventRegistry::new();
        let errors = Arc::new(Mutex::new(Vec::new()));
        let sink = errors.clone();
        registry.subscribe(
            "error",
            Listener::new("errSink", move |event| {
                if let AdEvent::Error { message, action } = event {
                    sink.lock().unwrap().push((message.clone(), action.clone()));
                }
                Ok(())
            }),
        );

        registry.subscribe("bogusEvent", counting_listener("x", Arc::new(AtomicUsize::new(0))));
        registry.unsubscribe("bogusEvent", None);

        let errors = errors.lock().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].0, "Unknown MRAID event: bogusEvent");
        assert_eq!(errors[0].1, "addEventListener");
        assert_eq!(errors[1].1, "removeEventListener");
    }

    #[test]
    fn removing_unregistered_listener_raises_error() {
        let mut registry = EventRegistry::new();
        let errors = Arc::new(AtomicUsize::new(0));
        let sink = errors.clone();
        registry.subscribe(
            "error",
            Listener::new("errSink", move |_| {
                sink.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        registry.subscribe("ready", counting_listener("a", Arc::new(AtomicUsize::new(0))));
        registry.unsubscribe("ready", Some("notThere"));
        assert_eq!(errors.load(Ordering::SeqCst), 1);
        assert_eq!(registry.listener_count(EventName::Ready), 1);
    }

    #[test]
    fn unsubscribe_without_listener_removes_all() {
        let mut registry = EventRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));

        registry.subscribe("stateChange", counting_listener("a", count.clone()));
        registry.subscribe("stateChange", counting_listener("b", count.clone()));
        assert_eq!(registry.listener_count(EventName::StateChange), 2);

        registry.unsubscribe("stateChange", None);
        assert_eq!(registry.listener_count(EventName::StateChange), 0);

        registry.broadcast(&AdEvent::StateChange(crate::properties::AdState::Default));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_set_entry_is_dropped_after_last_removal() {
        let mut registry = EventRegistry::new();
        registry.subscribe("ready", counting_listener("only", Arc::new(AtomicUsize::new(0))));
        registry.unsubscribe("ready", Some("only"));
        assert!(!registry.listeners.contains_key(&EventName::Ready));
    }

    #[test]
    fn failing_listener_does_not_stop_fanout() {
        let mut registry = EventRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));

        registry.subscribe("ready", Listener::new("bad", |_| Err("boom".to_string())));
        registry.subscribe("ready", counting_listener("good", count.clone()));

        registry.broadcast(&AdEvent::Ready);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn broadcast_runs_in_insertion_order() {
        let mut registry = EventRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for id in ["first", "second", "third"] {
            let order = order.clone();
            registry.subscribe(
                "ready",
                Listener::new(id, move |_| {
                    order.lock().unwrap().push(id);
                    Ok(())
                }),
            );
        }

        registry.broadcast(&AdEvent::Ready);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }
}
