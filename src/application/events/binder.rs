//! Event binder - subscribes plugin event handlers to the client emitter

use std::sync::Arc;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error};

use crate::application::errors::EventError;
use crate::domain::entities::Event;
use crate::domain::traits::{Emitter, Listener};

/// Record of one subscription made by the binder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub plugin: String,
    pub event: String,
    pub once: bool,
}

/// Attaches events to an emitter, wrapping each handler so its failures stay
/// contained
#[derive(Debug, Default)]
pub struct EventBinder {
    bindings: Vec<Binding>,
}

impl EventBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `event` on `emitter` under its name, once or persistently
    pub fn bind(&mut self, event: Arc<Event>, plugin: &str, emitter: &dyn Emitter) {
        let once = event.once;
        let name = event.name.clone();
        let listener = Arc::new(GuardedListener {
            plugin: plugin.to_string(),
            event,
        });

        if once {
            emitter.once(&name, listener);
        } else {
            emitter.on(&name, listener);
        }

        debug!("Bound event {}{} for plugin {}", name, if once { " (once)" } else { "" }, plugin);
        self.bindings.push(Binding {
            plugin: plugin.to_string(),
            event: name,
            once,
        });
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

/// Runs the handler on its own task so that neither an `Err` nor a panic
/// reaches the emitter or the next listener
struct GuardedListener {
    plugin: String,
    event: Arc<Event>,
}

#[async_trait]
impl Listener for GuardedListener {
    async fn call(&self, payload: Arc<Value>) {
        let event = self.event.clone();
        let task = tokio::spawn(async move { event.handler.handle(&payload).await });

        let reason = match task.await {
            Ok(Ok(())) => return,
            Ok(Err(e)) => e.to_string(),
            Err(join) if join.is_panic() => "handler panicked".to_string(),
            Err(join) => join.to_string(),
        };

        let err = EventError::HandlerThrew {
            event: self.event.name.clone(),
            plugin: self.plugin.clone(),
            reason,
        };
        error!("{}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use crate::infrastructure::events::EventBus;
    use crate::test_support::{Journal, JournalEvent};

    #[tokio::test]
    async fn test_same_event_fires_in_bind_order_despite_failure() {
        let bus = EventBus::new();
        let journal = Journal::new();
        let mut binder = EventBinder::new();

        binder.bind(Arc::new(Event::new("messageCreate", JournalEvent::failing(&journal, "a"))), "A", &bus);
        binder.bind(Arc::new(Event::new("messageCreate", JournalEvent::ok(&journal, "b"))), "B", &bus);

        bus.emit("messageCreate", json!({"content": "hi"})).await;

        assert_eq!(journal.entries(), vec!["a", "b"]);
        assert_eq!(binder.bindings().len(), 2);
    }

    #[tokio::test]
    async fn test_panicking_handler_is_contained() {
        let bus = EventBus::new();
        let journal = Journal::new();
        let mut binder = EventBinder::new();

        binder.bind(Arc::new(Event::new("guildCreate", JournalEvent::panicking(&journal, "boom"))), "A", &bus);
        binder.bind(Arc::new(Event::new("guildCreate", JournalEvent::ok(&journal, "after"))), "B", &bus);

        bus.emit("guildCreate", json!({})).await;

        assert_eq!(journal.entries(), vec!["boom", "after"]);
    }

    #[tokio::test]
    async fn test_once_fires_at_most_once() {
        let bus = EventBus::new();
        let journal = Journal::new();
        let mut binder = EventBinder::new();

        binder.bind(Arc::new(Event::new("ready", JournalEvent::ok(&journal, "once")).once(true)), "Bot", &bus);
        binder.bind(Arc::new(Event::new("ready", JournalEvent::ok(&journal, "every"))), "Bot", &bus);

        for _ in 0..3 {
            bus.emit("ready", json!(null)).await;
        }

        assert_eq!(journal.entries(), vec!["once", "every", "every", "every"]);
        assert!(binder.bindings()[0].once);
    }
}
