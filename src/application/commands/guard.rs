//! Panic containment for command handlers

use std::any::Any;
use std::panic::AssertUnwindSafe;
use futures::FutureExt;

use crate::application::errors::CommandError;
use crate::domain::traits::{CommandHandler, Interaction};

/// Run `handler`, reporting a panic as `ExecutionFailed` instead of unwinding
/// through the caller
pub async fn execute_guarded(handler: &dyn CommandHandler, interaction: &dyn Interaction) -> Result<(), CommandError> {
    match AssertUnwindSafe(handler.execute(interaction)).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(CommandError::ExecutionFailed(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned());
    match detail {
        Some(detail) => format!("handler panicked: {}", detail),
        None => "handler panicked".to_string(),
    }
}
