use super::LocalStorage;
use crate::core::{DeskError, Result};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Stores each key as `<dir>/<key>.json`, written atomically.
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn check_key(key: &str) -> Result<()> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.contains("..");
        if valid {
            Ok(())
        } else {
            Err(DeskError::Storage(format!("invalid storage key '{}'", key)))
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        Self::check_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }

    /// Writes `<key>.json.tmp`, then renames it over `<key>.json`, so a
    /// reader only ever sees a complete file.
    async fn replace_file(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let target = self.path_for(key)?;
        let staging = self.dir.join(format!("{}.json.tmp", key));

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|err| DeskError::io(&self.dir, err))?;
        fs::write(&staging, bytes)
            .await
            .map_err(|err| DeskError::io(&staging, err))?;
        if let Err(err) = fs::rename(&staging, &target).await {
            // Best effort; the rename error is the one worth reporting.
            let _ = fs::remove_file(&staging).await;
            return Err(DeskError::io(&target, err));
        }
        Ok(())
    }
}

#[async_trait]
impl LocalStorage for JsonFileStorage {
    async fn load_value(&self, key: &str) -> Result<Option<JsonValue>> {
        let path = self.path_for(key)?;
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(DeskError::io(&path, err)),
        };
        let value = serde_json::from_slice(&bytes).map_err(|err| {
            DeskError::Serialization(format!("{}: {}", path.display(), err))
        })?;
        Ok(Some(value))
    }

    async fn save_value(&self, key: &str, value: JsonValue) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&value)?;
        self.replace_file(key, &bytes).await
    }
}
