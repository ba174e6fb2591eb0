//! Sub-command dispatch - one composite command routing to named branches

use async_trait::async_trait;
use tracing::{error, warn};

use crate::application::errors::{BotError, CommandError};
use crate::domain::entities::{CommandSchema, OptionKind, OptionSpec, SubcommandSet};
use crate::domain::traits::{CommandHandler, Interaction, Reply};
use super::guard::execute_guarded;

/// Sent when a sub-command handler fails before responding
pub const EXECUTION_FAILED_MESSAGE: &str = "There was an error executing that command.";

/// Build the composite schema for `command_name`.
///
/// Each sub-command becomes a top-level option named by its set key, in set
/// order. Options of a kind a sub-command cannot carry are left out.
pub fn build_schema(command_name: &str, description: &str, subcommands: &SubcommandSet) -> CommandSchema {
    let mut schema = CommandSchema::new(command_name, description);

    for (key, sub) in subcommands.iter() {
        let mut entry = OptionSpec::new(key, OptionKind::Subcommand)
            .with_description(sub.description.clone());

        for option in &sub.options {
            if !option.kind.is_subcommand_option() {
                warn!(
                    "Dropping option '{}' of type '{}' from /{} {}: unsupported option type",
                    option.name,
                    option.kind.as_str(),
                    command_name,
                    key
                );
                continue;
            }
            let mut option = option.clone();
            if option.kind != OptionKind::Integer {
                option.min_value = None;
                option.max_value = None;
            }
            option.options.clear();
            entry.options.push(option);
        }

        schema.options.push(entry);
    }

    schema
}

/// Route `interaction` to the sub-command it names.
///
/// Unknown names get one ephemeral notice and no handler runs. A failing
/// handler is logged and answered with a generic message, unless the
/// invocation was already replied to or deferred.
pub async fn dispatch(interaction: &dyn Interaction, subcommands: &SubcommandSet) -> Result<(), BotError> {
    let name = interaction.subcommand().unwrap_or_default();

    let Some(sub) = subcommands.get(name) else {
        let err = CommandError::UnknownSubcommand(name.to_string());
        warn!("/{}: {}", interaction.command_name(), err);
        return interaction.reply(Reply::ephemeral(err.to_string())).await;
    };

    if let Err(e) = execute_guarded(sub.handler.as_ref(), interaction).await {
        error!("Error executing {} subcommand of /{}: {}", name, interaction.command_name(), e);
        if !interaction.has_responded() {
            interaction.reply(Reply::ephemeral(EXECUTION_FAILED_MESSAGE)).await?;
        }
    }

    Ok(())
}

/// Command handler that dispatches over a fixed sub-command set
pub struct SubcommandDispatcher {
    subcommands: SubcommandSet,
}

impl SubcommandDispatcher {
    pub fn new(subcommands: SubcommandSet) -> Self {
        Self { subcommands }
    }
}

#[async_trait]
impl CommandHandler for SubcommandDispatcher {
    async fn execute(&self, interaction: &dyn Interaction) -> Result<(), CommandError> {
        dispatch(interaction, &self.subcommands)
            .await
            .map_err(|e| CommandError::Response(e.to_string()))
    }
}
