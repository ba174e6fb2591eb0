use async_trait::async_trait;
use crate::application::errors::BotError;

/// Outbound messaging - posts outside the context of an invocation
#[async_trait]
pub trait ChannelSender: Send + Sync {
    /// Send a message to a channel, returning the new message id
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<String, BotError>;
}
