use super::LocalStorage;
use crate::core::Result;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local storage. Contents vanish with the process.
#[derive(Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<String, JsonValue>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.values.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl LocalStorage for MemoryStorage {
    async fn load_value(&self, key: &str) -> Result<Option<JsonValue>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn save_value(&self, key: &str, value: JsonValue) -> Result<()> {
        self.values.write().await.insert(key.to_string(), value);
        Ok(())
    }
}
