//! Starboard sub-commands (set, remove) and the reaction listener that posts
//! starred messages

use std::sync::Arc;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::application::errors::{BotError, CommandError};
use crate::domain::traits::{
    starboard_key, starboard_post_key, ChannelSender, CommandHandler, ConfigStore, EventHandler, Interaction, Reply,
};

const MANAGE_CHANNELS: &str = "ManageChannels";
pub const MIN_REACTIONS: i64 = 1;
pub const MAX_REACTIONS: i64 = 1000;

/// Stored starboard settings for one guild
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StarboardConfig {
    pub channel_id: String,
    pub emoji: String,
    pub reactions_to_star: i64,
    pub configured_at: DateTime<Utc>,
}

async fn respond(interaction: &dyn Interaction, content: impl Into<String>) -> Result<(), CommandError> {
    interaction
        .reply(Reply::ephemeral(content))
        .await
        .map_err(|e| CommandError::Response(e.to_string()))
}

/// Custom server emoji (`<:name:id>`, `<a:name:id>`) or a bare non-ASCII emoji
fn is_valid_emoji(custom: &Regex, emoji: &str) -> bool {
    if custom.is_match(emoji) {
        return true;
    }
    !emoji.is_empty() && !emoji.is_ascii() && !emoji.chars().any(char::is_whitespace) && emoji.chars().count() <= 8
}

pub struct StarboardSet {
    store: Arc<dyn ConfigStore>,
    custom_emoji: Regex,
}

impl StarboardSet {
    pub fn new(store: Arc<dyn ConfigStore>) -> Result<Self, regex_lite::Error> {
        Ok(Self {
            store,
            custom_emoji: Regex::new(r"^<a?:\w+:\d+>$")?,
        })
    }
}

#[async_trait]
impl CommandHandler for StarboardSet {
    async fn execute(&self, interaction: &dyn Interaction) -> Result<(), CommandError> {
        let Some(guild_id) = interaction.guild_id() else {
            return respond(interaction, "This command can only be used in a server.").await;
        };
        if !interaction.has_permission(MANAGE_CHANNELS) {
            return respond(interaction, "You need \"Manage Channels\" permission to set up the starboard.").await;
        }

        let channel = interaction
            .option_str("channel")
            .ok_or_else(|| CommandError::InvalidArgs("channel is required".to_string()))?;
        let emoji = interaction
            .option_str("emoji")
            .ok_or_else(|| CommandError::InvalidArgs("emoji is required".to_string()))?;
        let reactions = interaction
            .option_i64("reactions")
            .ok_or_else(|| CommandError::InvalidArgs("reactions is required".to_string()))?;

        if !(MIN_REACTIONS..=MAX_REACTIONS).contains(&reactions) {
            return respond(
                interaction,
                format!("The number of reactions must be between {} and {}.", MIN_REACTIONS, MAX_REACTIONS),
            )
            .await;
        }
        if !is_valid_emoji(&self.custom_emoji, emoji) {
            return respond(
                interaction,
                "Please provide a valid emoji. You can use a standard emoji (like ⭐) or a custom server emoji (<:name:id>).",
            )
            .await;
        }

        let config = StarboardConfig {
            channel_id: channel.to_string(),
            emoji: emoji.to_string(),
            reactions_to_star: reactions,
            configured_at: Utc::now(),
        };
        let value = serde_json::to_value(&config).map_err(|e| CommandError::ExecutionFailed(e.to_string()))?;
        self.store.upsert(&starboard_key(guild_id), value).await?;

        respond(
            interaction,
            format!(
                "Starboard channel has been set to #{}. Required reactions: {}. Reaction emoji: {}",
                config.channel_id, config.reactions_to_star, config.emoji
            ),
        )
        .await
    }
}

pub struct StarboardRemove {
    store: Arc<dyn ConfigStore>,
}

impl StarboardRemove {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommandHandler for StarboardRemove {
    async fn execute(&self, interaction: &dyn Interaction) -> Result<(), CommandError> {
        let Some(guild_id) = interaction.guild_id() else {
            return respond(interaction, "This command can only be used in a server.").await;
        };
        if !interaction.has_permission(MANAGE_CHANNELS) {
            return respond(interaction, "You need \"Manage Channels\" permission to remove the starboard.").await;
        }

        if self.store.delete(&starboard_key(guild_id)).await? {
            respond(interaction, "Starboard configuration has been removed.").await
        } else {
            respond(interaction, "No starboard configuration found for this server.").await
        }
    }
}

/// `messageReactionAdd` payload
#[derive(Debug, Deserialize)]
struct ReactionAdd {
    guild_id: Option<String>,
    channel_id: String,
    message_id: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    content: String,
    emoji: String,
    /// Reactions with `emoji` on the message, this one included
    count: i64,
    #[serde(default)]
    user_bot: bool,
}

/// Reposts a message to the starboard channel once it collects enough of
/// the configured reaction. Each message is posted at most once.
pub struct StarboardReact {
    store: Arc<dyn ConfigStore>,
    sender: Arc<dyn ChannelSender>,
}

impl StarboardReact {
    pub fn new(store: Arc<dyn ConfigStore>, sender: Arc<dyn ChannelSender>) -> Self {
        Self { store, sender }
    }
}

#[async_trait]
impl EventHandler for StarboardReact {
    async fn handle(&self, payload: &Value) -> Result<(), BotError> {
        let reaction: ReactionAdd = serde_json::from_value(payload.clone())
            .map_err(|e| BotError::Internal(format!("Invalid messageReactionAdd payload: {}", e)))?;

        if reaction.user_bot {
            return Ok(());
        }
        let Some(guild_id) = reaction.guild_id.as_deref() else {
            return Ok(());
        };
        let Some(stored) = self.store.get(&starboard_key(guild_id)).await? else {
            return Ok(());
        };
        let config: StarboardConfig = serde_json::from_value(stored)
            .map_err(|e| BotError::Internal(format!("Corrupt starboard config for guild {}: {}", guild_id, e)))?;

        if reaction.emoji != config.emoji || reaction.count < config.reactions_to_star {
            return Ok(());
        }

        let post_key = starboard_post_key(guild_id, &reaction.message_id);
        if self.store.get(&post_key).await?.is_some() {
            return Ok(());
        }

        let mut text = format!("{} **{}** | <#{}>", config.emoji, reaction.count, reaction.channel_id);
        text.push_str(&format!("\n**{}**", reaction.author.as_deref().unwrap_or("Unknown User")));
        if !reaction.content.is_empty() {
            text.push_str(&format!("\n{}", reaction.content));
        }
        text.push_str(&format!("\nID: {}", reaction.message_id));

        let posted = match self.sender.send_message(&config.channel_id, &text).await {
            Ok(id) => id,
            Err(e) => {
                error!("Error posting to starboard in guild {}: {}", guild_id, e);
                return Ok(());
            }
        };
        self.store
            .upsert(
                &post_key,
                json!({ "original_message_id": reaction.message_id, "starboard_message_id": posted }),
            )
            .await?;
        info!("Message {} starred in guild {}", reaction.message_id, guild_id);
        Ok(())
    }
}
