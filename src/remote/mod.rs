//! Remote API surface.
//!
//! The store only relies on one generic call, [`RemoteApi::request`]; the
//! per-kind helpers are thin wrappers that build the path and body.

pub mod error;
pub mod http;
pub mod mock;

pub use error::{RemoteError, RemoteResult};
pub use http::{HttpRemote, RemoteConfig};
pub use mock::{MockMode, MockRemote, OfflineRemote, RecordedRequest};

use crate::core::{EntityData, EntityKind, Record};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<JsonValue>,
}

impl RequestOptions {
    /// Request without a body.
    pub fn new(method: Method) -> Self {
        Self { method, body: None }
    }

    pub fn get() -> Self {
        Self {
            method: Method::Get,
            body: None,
        }
    }

    pub fn post(body: JsonValue) -> Self {
        Self {
            method: Method::Post,
            body: Some(body),
        }
    }

    pub fn put(body: Option<JsonValue>) -> Self {
        Self {
            method: Method::Put,
            body,
        }
    }

    pub fn delete() -> Self {
        Self {
            method: Method::Delete,
            body: None,
        }
    }
}

/// Successful remote answer. `data` is `None` when the server replied with an
/// empty body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiResponse {
    pub data: Option<JsonValue>,
}

impl ApiResponse {
    pub fn with_data(data: JsonValue) -> Self {
        Self { data: Some(data) }
    }

    /// Decodes the payload as a record of kind `D`. Payloads that are missing,
    /// malformed, or carry an empty id are not usable.
    pub fn record<D: EntityData>(&self) -> Option<Record<D>> {
        let data = self.data.as_ref()?;
        let record: Record<D> = serde_json::from_value(data.clone()).ok()?;
        (!record.id.trim().is_empty()).then_some(record)
    }

    /// Decodes the payload as a list of records of kind `D`.
    pub fn records<D: EntityData>(&self) -> RemoteResult<Vec<Record<D>>> {
        let data = self
            .data
            .as_ref()
            .ok_or_else(|| RemoteError::InvalidResponse("empty list response".to_string()))?;
        serde_json::from_value(data.clone())
            .map_err(|err| RemoteError::InvalidResponse(format!("{} list: {}", D::KIND, err)))
    }
}

#[async_trait]
pub trait RemoteApi: Send + Sync {
    async fn request(&self, path: &str, options: RequestOptions) -> RemoteResult<ApiResponse>;

    async fn create(&self, kind: EntityKind, body: JsonValue) -> RemoteResult<ApiResponse> {
        self.request(kind.remote_path(), RequestOptions::post(body)).await
    }

    async fn update(
        &self,
        kind: EntityKind,
        id: &str,
        body: JsonValue,
    ) -> RemoteResult<ApiResponse> {
        let path = format!("{}/{}", kind.remote_path(), id);
        self.request(&path, RequestOptions::put(Some(body))).await
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> RemoteResult<ApiResponse> {
        let path = format!("{}/{}", kind.remote_path(), id);
        self.request(&path, RequestOptions::delete()).await
    }

    async fn fetch(&self, path: &str) -> RemoteResult<ApiResponse> {
        self.request(path, RequestOptions::get()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LicenseData;
    use serde_json::json;

    #[test]
    fn test_record_requires_non_empty_id() {
        let response = ApiResponse::with_data(json!({"id": "", "name": "Office"}));
        assert!(response.record::<LicenseData>().is_none());

        let response = ApiResponse::with_data(json!({"name": "Office"}));
        assert!(response.record::<LicenseData>().is_none());

        let response = ApiResponse::with_data(json!({"id": "42", "name": "Office"}));
        let record = response.record::<LicenseData>().unwrap();
        assert_eq!(record.id, "42");
        assert_eq!(record.data.name, "Office");
    }

    #[test]
    fn test_records_rejects_empty_body() {
        let response = ApiResponse::default();
        assert!(response.records::<LicenseData>().is_err());
    }
}
