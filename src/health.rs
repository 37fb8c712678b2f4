use crate::remote::RemoteApi;
use serde::Serialize;

pub const HEALTH_PATH: &str = "/_health_check";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Probes the backend. Any successful answer counts as connected.
pub async fn check_connection(remote: &dyn RemoteApi) -> ConnectionStatus {
    match remote.fetch(HEALTH_PATH).await {
        Ok(_) => ConnectionStatus {
            connected: true,
            error: None,
        },
        Err(err) => ConnectionStatus {
            connected: false,
            error: Some(err.to_string()),
        },
    }
}
