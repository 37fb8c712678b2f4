use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IntegrationType {
    #[default]
    #[serde(rename = "Discovery Tool")]
    DiscoveryTool,
    #[serde(rename = "ITSM")]
    Itsm,
    #[serde(rename = "CMDB")]
    Cmdb,
    #[serde(rename = "HR System")]
    HrSystem,
    Financial,
    Procurement,
}

impl IntegrationType {
    /// HR, finance and procurement feeds.
    pub fn is_business_system(&self) -> bool {
        matches!(
            self,
            IntegrationType::HrSystem | IntegrationType::Financial | IntegrationType::Procurement
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SyncFrequency {
    #[serde(rename = "Real-time")]
    RealTime,
    Hourly,
    #[default]
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntegrationStatus {
    Active,
    #[default]
    Inactive,
    Error,
    Syncing,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    pub source_field: String,
    pub target_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationErrorEntry {
    pub timestamp: DateTime<Utc>,
    pub error: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub resolved: bool,
}

/// Connection to an external discovery, ITSM or business system. The desk
/// only records its configuration and sync state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntegrationData {
    pub name: String,
    #[serde(rename = "type")]
    pub integration_type: IntegrationType,
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<DateTime<Utc>>,
    pub sync_frequency: SyncFrequency,
    pub status: IntegrationStatus,
    pub mappings: Vec<FieldMapping>,
    pub error_log: Vec<IntegrationErrorEntry>,
}

impl IntegrationData {
    pub fn unresolved_errors(&self) -> usize {
        self.error_log.iter().filter(|entry| !entry.resolved).count()
    }
}
