use crate::core::EntityKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AlertType {
    #[default]
    #[serde(rename = "Warranty Expiry")]
    WarrantyExpiry,
    #[serde(rename = "License Expiry")]
    LicenseExpiry,
    #[serde(rename = "Maintenance Due")]
    MaintenanceDue,
    #[serde(rename = "Compliance Warning")]
    ComplianceWarning,
    #[serde(rename = "Security Alert")]
    SecurityAlert,
    #[serde(rename = "Cost Threshold")]
    CostThreshold,
}

impl AlertType {
    pub const ALL: [AlertType; 6] = [
        AlertType::WarrantyExpiry,
        AlertType::LicenseExpiry,
        AlertType::MaintenanceDue,
        AlertType::ComplianceWarning,
        AlertType::SecurityAlert,
        AlertType::CostThreshold,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum AlertSeverity {
    Critical,
    Error,
    Warning,
    #[default]
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AlertStatus {
    #[default]
    Active,
    Acknowledged,
    Resolved,
    Dismissed,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Active => "Active",
            AlertStatus::Acknowledged => "Acknowledged",
            AlertStatus::Resolved => "Resolved",
            AlertStatus::Dismissed => "Dismissed",
        }
    }

    /// Active -> Acknowledged -> Resolved | Dismissed. Resolving or
    /// dismissing straight from Active is allowed; closed alerts stay closed.
    pub fn can_transition_to(&self, next: AlertStatus) -> bool {
        matches!(
            (self, next),
            (AlertStatus::Active, AlertStatus::Acknowledged)
                | (
                    AlertStatus::Active | AlertStatus::Acknowledged,
                    AlertStatus::Resolved | AlertStatus::Dismissed
                )
        )
    }

    pub fn is_open(&self) -> bool {
        matches!(self, AlertStatus::Active | AlertStatus::Acknowledged)
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Points an alert at the record it is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertData {
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub status: AlertStatus,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_entity: Option<EntityRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acknowledged_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl AlertData {
    pub fn new(
        alert_type: AlertType,
        severity: AlertSeverity,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            alert_type,
            severity,
            title: title.into(),
            message: message.into(),
            created_at: Utc::now(),
            ..Default::default()
        }
    }

    pub fn is_critical_active(&self) -> bool {
        self.severity == AlertSeverity::Critical && self.status == AlertStatus::Active
    }
}

/// Thresholds driving expiry counts and alert delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertSettings {
    pub warranty_days: i64,
    pub license_days: i64,
    pub maintenance_days: i64,
    pub email_notifications: bool,
    pub auto_resolve: bool,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            warranty_days: 30,
            license_days: 60,
            maintenance_days: 7,
            email_notifications: true,
            auto_resolve: false,
        }
    }
}
