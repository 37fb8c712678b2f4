//! reqwest-backed remote API client

use super::{ApiResponse, Method, RemoteApi, RemoteError, RemoteResult, RequestOptions};
use async_trait::async_trait;
use reqwest::{Client, header};
use std::time::Duration;
use tracing::{Instrument, Level, event, info_span};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the asset backend.
///
/// Request bodies and responses are plain JSON; a successful empty body maps
/// to `ApiResponse { data: None }`.
pub struct HttpRemote {
    config: RemoteConfig,
    client: Client,
}

impl HttpRemote {
    pub fn new(config: RemoteConfig) -> RemoteResult<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref api_key) = config.api_key {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|err| RemoteError::InvalidResponse(format!("invalid API key: {}", err)))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { config, client })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn send(
        &self,
        path: &str,
        options: RequestOptions,
        request_id: Uuid,
    ) -> RemoteResult<ApiResponse> {
        let url = self.url(path);
        let builder = match options.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        let mut builder = builder.header("x-request-id", request_id.to_string());
        if let Some(body) = options.body.as_ref() {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            event!(Level::DEBUG, status = status.as_u16(), "remote request rejected");
            return Err(RemoteError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(ApiResponse::default());
        }
        let data: serde_json::Value = serde_json::from_str(&body)
            .map_err(|err| RemoteError::InvalidResponse(err.to_string()))?;
        event!(Level::DEBUG, "remote request succeeded");
        Ok(ApiResponse {
            data: (!data.is_null()).then_some(data),
        })
    }
}

#[async_trait]
impl RemoteApi for HttpRemote {
    async fn request(&self, path: &str, options: RequestOptions) -> RemoteResult<ApiResponse> {
        let request_id = Uuid::new_v4();
        let span = info_span!(
            "remote.request",
            method = %options.method,
            path = %path,
            request_id = %request_id
        );
        self.send(path, options, request_id).instrument(span).await
    }
}
