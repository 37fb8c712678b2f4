use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ComplianceType {
    #[default]
    #[serde(rename = "License Compliance")]
    License,
    #[serde(rename = "Security Compliance")]
    Security,
    #[serde(rename = "Regulatory Compliance")]
    Regulatory,
    #[serde(rename = "Policy Compliance")]
    Policy,
}

impl ComplianceType {
    pub const ALL: [ComplianceType; 4] = [
        ComplianceType::License,
        ComplianceType::Security,
        ComplianceType::Regulatory,
        ComplianceType::Policy,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ComplianceStatus {
    Compliant,
    #[serde(rename = "Non-Compliant")]
    NonCompliant,
    #[default]
    #[serde(rename = "Pending Review")]
    PendingReview,
    Exempt,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComplianceCheckData {
    #[serde(rename = "type")]
    pub check_type: ComplianceType,
    pub status: ComplianceStatus,
    pub last_checked: DateTime<Utc>,
    pub next_check: DateTime<Utc>,
    /// Ids of the policy violations found by this check.
    pub violations: Vec<String>,
    pub auditor: String,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum ViolationSeverity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViolationStatus {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyViolationData {
    /// Free-form category such as "License Overuse".
    #[serde(rename = "type")]
    pub violation_type: String,
    pub severity: ViolationSeverity,
    pub description: String,
    pub detected_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub status: ViolationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_date: Option<DateTime<Utc>>,
}

impl PolicyViolationData {
    pub fn is_open(&self) -> bool {
        self.status == ViolationStatus::Open
    }

    pub fn is_critical_open(&self) -> bool {
        self.severity == ViolationSeverity::Critical && self.is_open()
    }
}
