//! In-process remotes: an always-offline stub and a scriptable mock.

use super::{ApiResponse, Method, RemoteApi, RemoteError, RemoteResult, RequestOptions};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Remote used when no backend is configured. Every call fails, so every
/// write takes the local fallback path.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineRemote;

#[async_trait]
impl RemoteApi for OfflineRemote {
    async fn request(&self, _path: &str, _options: RequestOptions) -> RemoteResult<ApiResponse> {
        Err(RemoteError::Offline)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockMode {
    /// Creates get a server id, updates echo their body, GETs return fixtures.
    Online,
    /// Every call fails as if the network were down.
    Unreachable,
    /// Every call succeeds with an empty body.
    EmptyResponses,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<JsonValue>,
}

struct MockState {
    mode: MockMode,
    requests: Vec<RecordedRequest>,
    fixtures: HashMap<String, JsonValue>,
}

/// Scriptable remote backend kept entirely in memory.
///
/// Server-assigned ids have the form `srv-<uuid>` so they can be told apart
/// from locally generated ones.
pub struct MockRemote {
    state: Mutex<MockState>,
}

impl MockRemote {
    pub fn new(mode: MockMode) -> Self {
        Self {
            state: Mutex::new(MockState {
                mode,
                requests: Vec::new(),
                fixtures: HashMap::new(),
            }),
        }
    }

    pub fn online() -> Self {
        Self::new(MockMode::Online)
    }

    pub fn unreachable() -> Self {
        Self::new(MockMode::Unreachable)
    }

    /// Response body returned for GET requests to `path` while online.
    pub fn with_fixture(self, path: impl Into<String>, body: JsonValue) -> Self {
        self.set_fixture(path, body);
        self
    }

    pub fn set_fixture(&self, path: impl Into<String>, body: JsonValue) {
        self.lock().fixtures.insert(path.into(), body);
    }

    pub fn set_mode(&self, mode: MockMode) {
        self.lock().mode = mode;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    pub fn requests_to(&self, method: Method, path: &str) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|request| request.method == method && request.path == path)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl RemoteApi for MockRemote {
    async fn request(&self, path: &str, options: RequestOptions) -> RemoteResult<ApiResponse> {
        let mut state = self.lock();
        state.requests.push(RecordedRequest {
            method: options.method,
            path: path.to_string(),
            body: options.body.clone(),
        });

        match state.mode {
            MockMode::Unreachable => {
                return Err(RemoteError::Unreachable(format!("{} {}", options.method, path)));
            }
            MockMode::EmptyResponses => return Ok(ApiResponse::default()),
            MockMode::Online => {}
        }

        if options.method == Method::Get {
            let data = state.fixtures.get(path).cloned();
            return Ok(ApiResponse { data });
        }

        let data = match (options.method, options.body) {
            (Method::Post, Some(JsonValue::Object(mut fields))) => {
                let id = format!("srv-{}", Uuid::new_v4().simple());
                fields.insert("id".to_string(), JsonValue::String(id));
                Some(JsonValue::Object(fields))
            }
            (Method::Put, body) => body,
            _ => None,
        };
        Ok(ApiResponse { data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_online_mock_assigns_server_ids() {
        let remote = MockRemote::online();
        let response = remote
            .request("/assets", RequestOptions::post(json!({"name": "Laptop"})))
            .await
            .unwrap();
        let data = response.data.unwrap();
        assert!(data["id"].as_str().unwrap().starts_with("srv-"));
        assert_eq!(data["name"], json!("Laptop"));
        assert_eq!(remote.requests_to(Method::Post, "/assets"), 1);
    }

    #[tokio::test]
    async fn test_unreachable_mock_records_and_fails() {
        let remote = MockRemote::unreachable();
        assert!(remote.fetch("/alerts/settings").await.is_err());
        assert_eq!(remote.requests().len(), 1);

        remote.set_mode(MockMode::Online);
        let response = remote.fetch("/alerts/settings").await.unwrap();
        assert_eq!(response.data, None);
    }

    #[tokio::test]
    async fn test_offline_remote_always_fails() {
        let result = OfflineRemote.fetch("/assets").await;
        assert!(matches!(result, Err(RemoteError::Offline)));
    }
}
