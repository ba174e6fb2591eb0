use async_trait::async_trait;
use serde_json::Value;
use crate::application::errors::StorageError;

/// Store trait - key/value persistence for guild configuration records
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Insert or replace `key`, returning the stored value
    async fn upsert(&self, key: &str, value: Value) -> Result<Value, StorageError>;

    /// Remove `key`, returning whether a record existed
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;
}

/// Store key holding a guild's command prefix
pub fn prefix_key(guild_id: &str) -> String {
    format!("guild:{}:prefix", guild_id)
}

/// Store key holding a guild's starboard configuration
pub fn starboard_key(guild_id: &str) -> String {
    format!("guild:{}:starboard", guild_id)
}

/// Store key recording that a message was already posted to the starboard
pub fn starboard_post_key(guild_id: &str, message_id: &str) -> String {
    format!("guild:{}:starboard:{}", guild_id, message_id)
}
