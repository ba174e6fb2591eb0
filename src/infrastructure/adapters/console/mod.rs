//! Console adapter for development/testing
//!
//! Lines starting with the console guild's prefix (or `/`) become
//! invocations: `/starboard set channel=general emoji=⭐ reactions=3`. Lines
//! starting with `!` emit an event: `!guildDelete {"id": "console"}`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use async_trait::async_trait;
use serde_json::Value;

use crate::application::errors::BotError;
use crate::domain::entities::{OptionValue, User};
use crate::domain::traits::{prefix_key, ChannelSender, ConfigStore, Interaction, Reply};

pub const CONSOLE_GUILD: &str = "console";

/// One parsed console line
pub enum ConsoleInput {
    /// `prefixed` is set when the line used the guild prefix rather than `/`
    Command { interaction: ConsoleInteraction, prefixed: bool },
    Event { name: String, payload: Value },
}

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    default_prefix: String,
}

impl ConsoleAdapter {
    pub fn new(default_prefix: impl Into<String>) -> Self {
        Self {
            default_prefix: default_prefix.into(),
        }
    }

    /// Prefix stored for the console guild, or the configured default
    pub async fn current_prefix(&self, store: &dyn ConfigStore) -> String {
        match store.get(&prefix_key(CONSOLE_GUILD)).await {
            Ok(Some(Value::String(prefix))) if !prefix.is_empty() => prefix,
            Ok(_) => self.default_prefix.clone(),
            Err(e) => {
                tracing::warn!("Failed to read console prefix: {}", e);
                self.default_prefix.clone()
            }
        }
    }

    pub fn parse(&self, line: &str, prefix: &str) -> Result<Option<ConsoleInput>, BotError> {
        let line = line.trim();

        if let Some(rest) = line.strip_prefix('!') {
            let (name, payload) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            if name.is_empty() {
                return Ok(None);
            }
            let payload = if payload.trim().is_empty() {
                Value::Null
            } else {
                serde_json::from_str(payload.trim())
                    .map_err(|e| BotError::Internal(format!("Invalid event payload: {}", e)))?
            };
            return Ok(Some(ConsoleInput::Event { name: name.to_string(), payload }));
        }

        let (body, prefixed) = match line.strip_prefix(prefix) {
            Some(body) if !prefix.is_empty() => (body, true),
            _ => match line.strip_prefix('/') {
                Some(body) => (body, false),
                None => return Ok(None),
            },
        };

        let mut tokens = body.split_whitespace().peekable();
        let Some(command) = tokens.next() else {
            return Ok(None);
        };

        let mut interaction = ConsoleInteraction::new(command);
        if let Some(sub) = tokens.next_if(|t| !t.contains('=')) {
            interaction.subcommand = Some(sub.to_string());
        }
        for token in tokens {
            let (key, value) = token
                .split_once('=')
                .ok_or_else(|| BotError::Internal(format!("Expected key=value, got '{}'", token)))?;
            interaction.options.insert(key.to_string(), parse_value(value));
        }

        Ok(Some(ConsoleInput::Command { interaction, prefixed }))
    }
}

fn parse_value(raw: &str) -> OptionValue {
    if let Ok(n) = raw.parse::<i64>() {
        return OptionValue::Integer(n);
    }
    match raw {
        "true" => OptionValue::Boolean(true),
        "false" => OptionValue::Boolean(false),
        _ => OptionValue::String(raw.to_string()),
    }
}

/// Invocation typed at the console; the operator holds every permission
pub struct ConsoleInteraction {
    id: String,
    command: String,
    subcommand: Option<String>,
    options: HashMap<String, OptionValue>,
    user: User,
    replied: AtomicBool,
    deferred: AtomicBool,
}

impl ConsoleInteraction {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            command: command.into(),
            subcommand: None,
            options: HashMap::new(),
            user: User::new("console", "operator").with_global_name("Console Operator"),
            replied: AtomicBool::new(false),
            deferred: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

#[async_trait]
impl Interaction for ConsoleInteraction {
    fn command_name(&self) -> &str {
        &self.command
    }

    fn subcommand(&self) -> Option<&str> {
        self.subcommand.as_deref()
    }

    fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    fn guild_id(&self) -> Option<&str> {
        Some(CONSOLE_GUILD)
    }

    fn user(&self) -> &User {
        &self.user
    }

    fn has_permission(&self, _permission: &str) -> bool {
        true
    }

    fn replied(&self) -> bool {
        self.replied.load(Ordering::SeqCst)
    }

    fn deferred(&self) -> bool {
        self.deferred.load(Ordering::SeqCst)
    }

    async fn reply(&self, reply: Reply) -> Result<(), BotError> {
        let marker = if reply.ephemeral { " (only you)" } else { "" };
        println!("[BOT]{} {}", marker, reply.content);
        self.replied.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn defer(&self) -> Result<(), BotError> {
        println!("[BOT] is thinking...");
        self.deferred.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Prints outbound channel messages to stdout
pub struct ConsoleSender;

#[async_trait]
impl ChannelSender for ConsoleSender {
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<String, BotError> {
        let id = uuid::Uuid::new_v4().to_string();
        println!("[#{}] {}", channel_id, text);
        Ok(id)
    }
}
