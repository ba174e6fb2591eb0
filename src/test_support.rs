//! In-memory doubles shared by unit tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use serde_json::Value;

use crate::application::errors::{BotError, CommandError};
use crate::domain::entities::{OptionValue, User};
use crate::domain::traits::{ChannelSender, CommandHandler, EventHandler, Interaction, Reply};

pub struct FakeInteraction {
    command: String,
    subcommand: Option<String>,
    options: HashMap<String, OptionValue>,
    guild_id: Option<String>,
    permissions: HashSet<String>,
    user: User,
    resolved: Vec<User>,
    replies: Mutex<Vec<Reply>>,
    deferred: AtomicBool,
}

impl FakeInteraction {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            subcommand: None,
            options: HashMap::new(),
            guild_id: Some("guild-1".to_string()),
            permissions: HashSet::new(),
            user: User::new("42", "tester"),
            resolved: Vec::new(),
            replies: Mutex::new(Vec::new()),
            deferred: AtomicBool::new(false),
        }
    }

    pub fn with_subcommand(mut self, name: &str) -> Self {
        self.subcommand = Some(name.to_string());
        self
    }

    pub fn with_option(mut self, name: &str, value: OptionValue) -> Self {
        self.options.insert(name.to_string(), value);
        self
    }

    pub fn with_permission(mut self, permission: &str) -> Self {
        self.permissions.insert(permission.to_string());
        self
    }

    pub fn with_resolved_user(mut self, user: User) -> Self {
        self.resolved.push(user);
        self
    }

    pub fn without_guild(mut self) -> Self {
        self.guild_id = None;
        self
    }

    pub fn replies(&self) -> Vec<Reply> {
        self.replies.lock().unwrap().clone()
    }
}

#[async_trait]
impl Interaction for FakeInteraction {
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
        self.guild_id.as_deref()
    }

    fn user(&self) -> &User {
        &self.user
    }

    fn resolved_user(&self, id: &str) -> Option<&User> {
        self.resolved.iter().find(|u| u.id == id)
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    fn replied(&self) -> bool {
        !self.replies.lock().unwrap().is_empty()
    }

    fn deferred(&self) -> bool {
        self.deferred.load(Ordering::SeqCst)
    }

    async fn reply(&self, reply: Reply) -> Result<(), BotError> {
        self.replies.lock().unwrap().push(reply);
        Ok(())
    }

    async fn defer(&self) -> Result<(), BotError> {
        self.deferred.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Counts invocations
#[derive(Default)]
pub struct Recorder {
    calls: AtomicUsize,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandHandler for Recorder {
    async fn execute(&self, _interaction: &dyn Interaction) -> Result<(), CommandError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl EventHandler for Recorder {
    async fn handle(&self, _payload: &Value) -> Result<(), BotError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Command handler that fails after an optional acknowledgement
pub enum Scripted {
    Fail,
    ReplyThenFail,
    DeferThenFail,
    Panic,
}

impl Scripted {
    pub fn fail() -> Arc<Self> {
        Arc::new(Scripted::Fail)
    }

    pub fn reply_then_fail() -> Arc<Self> {
        Arc::new(Scripted::ReplyThenFail)
    }

    pub fn defer_then_fail() -> Arc<Self> {
        Arc::new(Scripted::DeferThenFail)
    }

    pub fn panicking() -> Arc<Self> {
        Arc::new(Scripted::Panic)
    }
}

#[async_trait]
impl CommandHandler for Scripted {
    async fn execute(&self, interaction: &dyn Interaction) -> Result<(), CommandError> {
        match self {
            Scripted::Fail => {}
            Scripted::ReplyThenFail => {
                let _ = interaction.reply(Reply::public("partial")).await;
            }
            Scripted::DeferThenFail => {
                let _ = interaction.defer().await;
            }
            Scripted::Panic => panic!("scripted panic"),
        }
        Err(CommandError::ExecutionFailed("scripted failure".to_string()))
    }
}

/// Shared, ordered log of handler invocations
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: &str) {
        self.0.lock().unwrap().push(entry.to_string());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

enum Outcome {
    Ok,
    Fail,
    Panic,
}

/// Event handler writing its label to a journal before finishing as scripted
pub struct JournalEvent {
    journal: Journal,
    label: String,
    outcome: Outcome,
}

impl JournalEvent {
    fn build(journal: &Journal, label: &str, outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            journal: journal.clone(),
            label: label.to_string(),
            outcome,
        })
    }

    pub fn ok(journal: &Journal, label: &str) -> Arc<Self> {
        Self::build(journal, label, Outcome::Ok)
    }

    pub fn failing(journal: &Journal, label: &str) -> Arc<Self> {
        Self::build(journal, label, Outcome::Fail)
    }

    pub fn panicking(journal: &Journal, label: &str) -> Arc<Self> {
        Self::build(journal, label, Outcome::Panic)
    }
}

#[async_trait]
impl EventHandler for JournalEvent {
    async fn handle(&self, _payload: &Value) -> Result<(), BotError> {
        self.journal.push(&self.label);
        match self.outcome {
            Outcome::Ok => Ok(()),
            Outcome::Fail => Err(BotError::Internal(format!("{} failed", self.label))),
            Outcome::Panic => panic!("{} panicked", self.label),
        }
    }
}

/// Channel sender keeping every message it was asked to post
#[derive(Default)]
pub struct SentMessages {
    sent: Mutex<Vec<(String, String)>>,
}

impl SentMessages {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// `(channel_id, text)` pairs in send order
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChannelSender for SentMessages {
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<String, BotError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push((channel_id.to_string(), text.to_string()));
        Ok(format!("sent-{}", sent.len()))
    }
}
