//! Bot core handlers: ping, guild lifecycle and prefixed-message listeners

use std::sync::Arc;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::application::errors::{BotError, CommandError};
use crate::domain::traits::{prefix_key, starboard_key, CommandHandler, ConfigStore, EventHandler, Interaction, Reply};

pub struct Ping;

#[async_trait]
impl CommandHandler for Ping {
    async fn execute(&self, interaction: &dyn Interaction) -> Result<(), CommandError> {
        interaction
            .reply(Reply::public("Pong!"))
            .await
            .map_err(|e| CommandError::Response(e.to_string()))
    }
}

pub struct Ready;

#[async_trait]
impl EventHandler for Ready {
    async fn handle(&self, payload: &Value) -> Result<(), BotError> {
        let user = payload.get("user").and_then(Value::as_str).unwrap_or("bot");
        info!("Ready! Logged in as {}", user);
        Ok(())
    }
}

/// Drops a guild's stored records when the bot leaves it
pub struct GuildDelete {
    store: Arc<dyn ConfigStore>,
}

impl GuildDelete {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EventHandler for GuildDelete {
    async fn handle(&self, payload: &Value) -> Result<(), BotError> {
        let guild_id = payload
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| BotError::Internal("guildDelete payload has no id".to_string()))?;

        let prefix = self.store.delete(&prefix_key(guild_id)).await?;
        let starboard = self.store.delete(&starboard_key(guild_id)).await?;
        if prefix || starboard {
            info!("Bot left guild {}, removed its stored settings", guild_id);
        }
        Ok(())
    }
}

/// Makes sure a guild that sends prefixed messages has a stored prefix
pub struct PrefixedMessage {
    store: Arc<dyn ConfigStore>,
}

impl PrefixedMessage {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EventHandler for PrefixedMessage {
    async fn handle(&self, payload: &Value) -> Result<(), BotError> {
        let Some(guild_id) = payload.get("guild_id").and_then(Value::as_str) else {
            return Ok(());
        };
        let prefix = payload
            .get("prefix")
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| BotError::Internal("prefixedMessage payload has no prefix".to_string()))?;

        let key = prefix_key(guild_id);
        if self.store.get(&key).await?.is_none() {
            self.store.upsert(&key, Value::String(prefix.to_string())).await?;
            debug!("Recorded prefix {} for guild {}", prefix, guild_id);
        }
        Ok(())
    }
}
