use async_trait::async_trait;
use crate::application::errors::BotError;
use crate::domain::entities::{OptionValue, User};

/// Outbound response to an invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    pub ephemeral: bool,
}

impl Reply {
    pub fn public(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: false,
        }
    }

    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
        }
    }
}

/// Inbound invocation context, supplied by the platform adapter.
///
/// Implementations track whether a response was already produced so the
/// dispatch layer never acknowledges the same invocation twice.
#[async_trait]
pub trait Interaction: Send + Sync {
    /// Name of the invoked top-level command
    fn command_name(&self) -> &str;

    /// Sub-command the invocation declares, if any
    fn subcommand(&self) -> Option<&str>;

    fn option(&self, name: &str) -> Option<&OptionValue>;

    fn guild_id(&self) -> Option<&str>;

    fn user(&self) -> &User;

    /// Full record of a user referenced by a user option, when the platform
    /// delivered one with the invocation
    fn resolved_user(&self, _id: &str) -> Option<&User> {
        None
    }

    fn has_permission(&self, permission: &str) -> bool;

    fn replied(&self) -> bool;

    fn deferred(&self) -> bool;

    async fn reply(&self, reply: Reply) -> Result<(), BotError>;

    async fn defer(&self) -> Result<(), BotError>;

    /// True once any acknowledgement (reply or defer) was sent
    fn has_responded(&self) -> bool {
        self.replied() || self.deferred()
    }

    fn option_str(&self, name: &str) -> Option<&str> {
        self.option(name).and_then(|v| v.as_str())
    }

    fn option_i64(&self, name: &str) -> Option<i64> {
        self.option(name).and_then(|v| v.as_i64())
    }
}
