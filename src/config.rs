use crate::core::{DeskError, Result};
use crate::remote::{HttpRemote, OfflineRemote, RemoteApi, RemoteConfig};
use crate::storage::{JsonFileStorage, LocalStorage, MemoryStorage};
use log::warn;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const ENV_API_URL: &str = "ASSETDESK_API_URL";
pub const ENV_API_KEY: &str = "ASSETDESK_API_KEY";
pub const ENV_DATA_DIR: &str = "ASSETDESK_DATA_DIR";
pub const ENV_OFFLINE: &str = "ASSETDESK_OFFLINE";

/// Desk configuration
#[derive(Debug, Clone)]
pub struct DeskConfig {
    /// Base URL of the asset backend. No URL means offline operation.
    pub api_url: Option<String>,

    /// Bearer token sent with every request
    pub api_key: Option<String>,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Directory for the JSON mirror; `None` keeps everything in memory
    pub data_dir: Option<PathBuf>,

    /// Install sample data when nothing is stored
    pub seed_samples: bool,

    /// Delay before a started integration sync is marked finished
    pub sync_settle: Option<Duration>,

    /// Never contact the backend, even when a URL is set
    pub offline: bool,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            request_timeout: Duration::from_secs(30),
            data_dir: None,
            seed_samples: true,
            sync_settle: Some(Duration::from_secs(3)),
            offline: false,
        }
    }
}

impl DeskConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn seed_samples(mut self, seed: bool) -> Self {
        self.seed_samples = seed;
        self
    }

    /// `None` leaves integrations in `Syncing` until `finish_sync` is called.
    pub fn sync_settle(mut self, settle: Option<Duration>) -> Self {
        self.sync_settle = settle;
        self
    }

    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Reads `ASSETDESK_*` variables on top of the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        config.api_url = value(ENV_API_URL);
        config.api_key = value(ENV_API_KEY);
        config.data_dir = value(ENV_DATA_DIR).map(PathBuf::from);
        if let Some(raw) = value(ENV_OFFLINE) {
            config.offline = parse_flag(&raw).ok_or_else(|| {
                DeskError::Config(format!("{} must be a boolean, got '{}'", ENV_OFFLINE, raw))
            })?;
        }

        if config.api_url.is_none() && !config.offline {
            warn!("{} is not set, running offline", ENV_API_URL);
        }
        Ok(config)
    }

    pub fn is_offline(&self) -> bool {
        self.offline || self.api_url.is_none()
    }

    pub fn remote(&self) -> Result<Arc<dyn RemoteApi>> {
        let url = match &self.api_url {
            Some(url) if !self.offline => url,
            _ => return Ok(Arc::new(OfflineRemote)),
        };
        let remote = HttpRemote::new(RemoteConfig {
            base_url: url.clone(),
            api_key: self.api_key.clone(),
            timeout: self.request_timeout,
        })?;
        Ok(Arc::new(remote))
    }

    pub fn storage(&self) -> Result<Arc<dyn LocalStorage>> {
        match &self.data_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir).map_err(|err| DeskError::io(dir, err))?;
                Ok(Arc::new(JsonFileStorage::new(dir)))
            }
            None => Ok(Arc::new(MemoryStorage::new())),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DeskConfig::default();
        assert!(config.is_offline());
        assert!(config.seed_samples);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.sync_settle, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_from_lookup() {
        let config = DeskConfig::from_lookup(lookup(&[
            (ENV_API_URL, "https://assets.example.com/api"),
            (ENV_API_KEY, "secret"),
            (ENV_DATA_DIR, "/var/lib/assetdesk"),
        ]))
        .unwrap();

        assert_eq!(config.api_url.as_deref(), Some("https://assets.example.com/api"));
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/assetdesk")));
        assert!(!config.is_offline());

        let config = DeskConfig::from_lookup(lookup(&[
            (ENV_API_URL, "https://assets.example.com/api"),
            (ENV_OFFLINE, "yes"),
        ]))
        .unwrap();
        assert!(config.is_offline());
    }

    #[test]
    fn test_rejects_bad_offline_flag() {
        let result = DeskConfig::from_lookup(lookup(&[(ENV_OFFLINE, "maybe")]));
        assert!(matches!(result, Err(DeskError::Config(_))));
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let config = DeskConfig::from_lookup(lookup(&[(ENV_API_URL, "  ")])).unwrap();
        assert!(config.api_url.is_none());
    }
}
