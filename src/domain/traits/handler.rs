use async_trait::async_trait;
use serde_json::Value;
use crate::application::errors::{BotError, CommandError};
use super::interaction::Interaction;

/// Executes a command (or sub-command) against one inbound invocation
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(&self, interaction: &dyn Interaction) -> Result<(), CommandError>;
}

/// Handles one occurrence of an external event.
///
/// `payload` carries the arguments the client emitted for the occurrence.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, payload: &Value) -> Result<(), BotError>;
}
