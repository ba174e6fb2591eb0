//! Configuration store implementations

pub mod sqlite;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::errors::StorageError;
use crate::domain::traits::ConfigStore;

pub use sqlite::SqliteStore;

/// Process-local store, for development and tests
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let records = self.records.read().await;
        Ok(records.get(key).cloned())
    }

    async fn upsert(&self, key: &str, value: Value) -> Result<Value, StorageError> {
        let mut records = self.records.write().await;
        records.insert(key.to_string(), value.clone());
        Ok(value)
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let mut records = self.records.write().await;
        Ok(records.remove(key).is_some())
    }
}
