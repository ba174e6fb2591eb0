use std::sync::Arc;
use crate::domain::traits::EventHandler;

/// Binding of a handler to a named external event.
///
/// Names are not unique: several plugins may bind the same event.
#[derive(Clone)]
pub struct Event {
    pub name: String,
    pub once: bool,
    pub handler: Arc<dyn EventHandler>,
}

impl Event {
    pub fn new(name: impl Into<String>, handler: Arc<dyn EventHandler>) -> Self {
        Self {
            name: name.into(),
            once: false,
            handler,
        }
    }

    pub fn once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("once", &self.once)
            .finish_non_exhaustive()
    }
}
