//! Prefix sub-commands: view and set

use std::sync::Arc;
use async_trait::async_trait;
use serde_json::Value;

use crate::application::errors::CommandError;
use crate::domain::traits::{prefix_key, CommandHandler, ConfigStore, Interaction, Reply};

pub const MAX_PREFIX_LEN: usize = 5;
const MANAGE_GUILD: &str = "ManageGuild";

async fn respond(interaction: &dyn Interaction, reply: Reply) -> Result<(), CommandError> {
    interaction
        .reply(reply)
        .await
        .map_err(|e| CommandError::Response(e.to_string()))
}

/// Shows the guild's prefix, falling back to the configured default
pub struct PrefixView {
    store: Arc<dyn ConfigStore>,
    default_prefix: String,
}

impl PrefixView {
    pub fn new(store: Arc<dyn ConfigStore>, default_prefix: impl Into<String>) -> Self {
        Self {
            store,
            default_prefix: default_prefix.into(),
        }
    }
}

#[async_trait]
impl CommandHandler for PrefixView {
    async fn execute(&self, interaction: &dyn Interaction) -> Result<(), CommandError> {
        let Some(guild_id) = interaction.guild_id() else {
            return respond(interaction, Reply::ephemeral("❌ This command can only be used in a server!")).await;
        };

        let stored = self.store.get(&prefix_key(guild_id)).await?;
        let prefix = stored
            .as_ref()
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
            .unwrap_or(self.default_prefix.as_str());

        let msg = format!(
            "📝 Current prefix for this server: `{}`\n\nTo change it, use the `/prefix set` command.",
            prefix
        );
        respond(interaction, Reply::ephemeral(msg)).await
    }
}

/// Stores a new prefix for the guild
pub struct PrefixSet {
    store: Arc<dyn ConfigStore>,
}

impl PrefixSet {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommandHandler for PrefixSet {
    async fn execute(&self, interaction: &dyn Interaction) -> Result<(), CommandError> {
        let Some(guild_id) = interaction.guild_id() else {
            return respond(interaction, Reply::ephemeral("❌ This command can only be used in a server!")).await;
        };
        if !interaction.has_permission(MANAGE_GUILD) {
            return respond(
                interaction,
                Reply::ephemeral("❌ You need the \"Manage Server\" permission to change the prefix!"),
            )
            .await;
        }

        let new_prefix = interaction.option_str("new_prefix").unwrap_or_default().trim();
        if new_prefix.is_empty() {
            return respond(interaction, Reply::ephemeral("❌ Prefix cannot be empty!")).await;
        }
        if new_prefix.chars().count() > MAX_PREFIX_LEN {
            return respond(
                interaction,
                Reply::ephemeral(format!("❌ Prefix cannot be longer than {} characters!", MAX_PREFIX_LEN)),
            )
            .await;
        }

        self.store
            .upsert(&prefix_key(guild_id), Value::String(new_prefix.to_string()))
            .await?;
        respond(
            interaction,
            Reply::public(format!("✅ Successfully updated the server prefix to: `{}`", new_prefix)),
        )
        .await
    }
}
