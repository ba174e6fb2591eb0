//! Inbound command routing through the frozen registry

use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::application::errors::CommandError;
use crate::domain::entities::CommandRegistry;
use crate::domain::traits::{Interaction, Reply};
use super::guard::execute_guarded;

/// Sent when a top-level command fails before responding
pub const COMMAND_FAILED_MESSAGE: &str = "There was an error while executing this command!";

/// Resolves invocations to registered commands and contains their failures
#[derive(Clone)]
pub struct CommandRouter {
    registry: Arc<CommandRegistry>,
}

impl CommandRouter {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Run the command named by `interaction`.
    ///
    /// Returns `NotFound` for unregistered names. Handler failures, panics
    /// included, are logged and, if nothing was sent yet, answered with a generic message; they are
    /// still returned so adapters can count them.
    pub async fn route(&self, interaction: &dyn Interaction) -> Result<(), CommandError> {
        let name = interaction.command_name();
        let Some(command) = self.registry.resolve(name) else {
            warn!("Command {} not found", name);
            return Err(CommandError::NotFound(name.to_string()));
        };

        debug!("Routing /{} for {}", name, interaction.user());
        let result = execute_guarded(command.handler.as_ref(), interaction).await;

        if let Err(e) = &result {
            error!("Error in command /{}: {}", name, e);
            if !interaction.has_responded() {
                if let Err(reply_err) = interaction.reply(Reply::ephemeral(COMMAND_FAILED_MESSAGE)).await {
                    warn!("Failed to report error for /{}: {}", name, reply_err);
                }
            }
        }

        result
    }
}
