use std::sync::Arc;
use async_trait::async_trait;
use serde_json::Value;

/// Callback subscribed to an emitter. Listeners are infallible from the
/// emitter's point of view; failures are contained by the caller that wraps
/// the user handler.
#[async_trait]
pub trait Listener: Send + Sync {
    async fn call(&self, payload: Arc<Value>);
}

/// Event-emitting client surface consumed by the event binder
pub trait Emitter: Send + Sync {
    /// Subscribe for every occurrence of `event`
    fn on(&self, event: &str, listener: Arc<dyn Listener>);

    /// Subscribe for the next occurrence of `event` only
    fn once(&self, event: &str, listener: Arc<dyn Listener>);
}
