//! Local key-value persistence used to mirror collections between runs.

pub mod file;
pub mod memory;

pub use file::JsonFileStorage;
pub use memory::MemoryStorage;

use crate::core::Result;
use async_trait::async_trait;
use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

#[async_trait]
pub trait LocalStorage: Send + Sync {
    /// Returns the stored value, or `None` when the key was never written.
    async fn load_value(&self, key: &str) -> Result<Option<JsonValue>>;

    async fn save_value(&self, key: &str, value: JsonValue) -> Result<()>;
}

/// Loads the array stored under `key`, falling back to `default` when the key
/// is missing, unreadable or holds something that does not decode.
pub async fn load_list<T: DeserializeOwned>(
    storage: &dyn LocalStorage,
    key: &str,
    default: Vec<T>,
) -> Vec<T> {
    match storage.load_value(key).await {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(items) => items,
            Err(err) => {
                warn!("stored list '{}' is malformed, using default: {}", key, err);
                default
            }
        },
        Ok(None) => default,
        Err(err) => {
            warn!("failed to load '{}' from local storage: {}", key, err);
            default
        }
    }
}

pub async fn save_list<T: Serialize>(
    storage: &dyn LocalStorage,
    key: &str,
    items: &[T],
) -> Result<()> {
    let value = serde_json::to_value(items)?;
    storage.save_value(key, value).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_load_list_defaults() {
        let storage = MemoryStorage::new();
        let loaded: Vec<String> = load_list(&storage, "names", vec!["seed".to_string()]).await;
        assert_eq!(loaded, vec!["seed".to_string()]);

        storage.save_value("names", json!({"not": "a list"})).await.unwrap();
        let loaded: Vec<String> = load_list(&storage, "names", Vec::new()).await;
        assert!(loaded.is_empty());

        save_list(&storage, "names", &["a", "b"]).await.unwrap();
        let loaded: Vec<String> = load_list(&storage, "names", Vec::new()).await;
        assert_eq!(loaded, vec!["a".to_string(), "b".to_string()]);
    }
}
