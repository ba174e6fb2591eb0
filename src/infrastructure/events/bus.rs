//! In-process event bus - the emitter the console adapter drives

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use serde_json::Value;

use crate::domain::traits::{Emitter, Listener};

struct Subscription {
    listener: Arc<dyn Listener>,
    once: bool,
}

/// Emitter keeping listeners per event name in subscription order
#[derive(Default)]
pub struct EventBus {
    listeners: RwLock<HashMap<String, Vec<Subscription>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn subscribe(&self, event: &str, listener: Arc<dyn Listener>, once: bool) {
        let mut listeners = self.listeners.write().unwrap_or_else(|e| e.into_inner());
        listeners
            .entry(event.to_string())
            .or_default()
            .push(Subscription { listener, once });
    }

    /// Deliver one occurrence of `event` to its listeners, in order.
    ///
    /// `once` subscriptions are detached before any listener runs, so a
    /// concurrent emit can never deliver them a second time. Returns the
    /// number of listeners invoked.
    pub async fn emit(&self, event: &str, payload: Value) -> usize {
        let snapshot: Vec<Arc<dyn Listener>> = {
            let mut listeners = self.listeners.write().unwrap_or_else(|e| e.into_inner());
            let Some(subs) = listeners.get_mut(event) else {
                return 0;
            };
            let snapshot = subs.iter().map(|s| s.listener.clone()).collect();
            subs.retain(|s| !s.once);
            snapshot
        };

        let payload = Arc::new(payload);
        for listener in &snapshot {
            listener.call(payload.clone()).await;
        }
        snapshot.len()
    }
}

impl Emitter for EventBus {
    fn on(&self, event: &str, listener: Arc<dyn Listener>) {
        self.subscribe(event, listener, false);
    }

    fn once(&self, event: &str, listener: Arc<dyn Listener>) {
        self.subscribe(event, listener, true);
    }
}
