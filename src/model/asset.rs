use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    Deployed,
    #[default]
    Ready,
    Pending,
    Maintenance,
    Broken,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LifecycleStage {
    Planning,
    Procurement,
    #[default]
    Active,
    Maintenance,
    Retired,
    Disposed,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lifecycle {
    pub stage: LifecycleStage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DepreciationMethod {
    #[default]
    #[serde(rename = "Straight Line")]
    StraightLine,
    #[serde(rename = "Declining Balance")]
    DecliningBalance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepreciationSchedule {
    pub method: DepreciationMethod,
    pub useful_life_years: u32,
    pub salvage_value: f64,
}

impl Default for DepreciationSchedule {
    fn default() -> Self {
        Self {
            method: DepreciationMethod::StraightLine,
            useful_life_years: 3,
            salvage_value: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    pub date: NaiveDate,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performed_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRecord {
    pub assigned_to: String,
    pub assigned_at: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned_at: Option<NaiveDate>,
}

/// Hardware asset attributes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetData {
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub status: AssetStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub location: String,
    pub serial_number: String,
    pub model: String,
    pub manufacturer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warranty_expiry: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_maintenance: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle: Option<Lifecycle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depreciation: Option<DepreciationSchedule>,
    pub maintenance_history: Vec<MaintenanceRecord>,
    pub assignment_history: Vec<AssignmentRecord>,
}

impl AssetData {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Fills the nested structures a locally created asset is expected to
    /// carry: an Active lifecycle starting `today` and the default schedule.
    /// Values already present in the draft are kept.
    pub fn apply_local_defaults(&mut self, today: NaiveDate) {
        self.lifecycle.get_or_insert(Lifecycle {
            stage: LifecycleStage::Active,
            since: Some(today),
        });
        self.depreciation.get_or_insert_with(DepreciationSchedule::default);
    }

    /// Warranty ends within `days` from `today`; already expired warranties
    /// do not count.
    pub fn warranty_expires_within(&self, today: NaiveDate, days: i64) -> bool {
        self.warranty_expiry
            .map(|expiry| within_window(today, expiry, days))
            .unwrap_or(false)
    }

    /// Maintenance is scheduled within `days`, or overdue.
    pub fn maintenance_due_within(&self, today: NaiveDate, days: i64) -> bool {
        self.next_maintenance
            .map(|date| (date - today).num_days() <= days)
            .unwrap_or(false)
    }
}

pub(crate) fn within_window(today: NaiveDate, date: NaiveDate, days: i64) -> bool {
    let remaining = (date - today).num_days();
    (0..=days).contains(&remaining)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_local_defaults_keep_existing_values() {
        let today = date(2024, 5, 1);
        let mut draft = AssetData::named("Laptop");
        draft.lifecycle = Some(Lifecycle {
            stage: LifecycleStage::Maintenance,
            since: None,
        });

        draft.apply_local_defaults(today);

        assert_eq!(draft.lifecycle.unwrap().stage, LifecycleStage::Maintenance);
        assert_eq!(draft.depreciation, Some(DepreciationSchedule::default()));
        assert!(draft.maintenance_history.is_empty());
    }

    #[test]
    fn test_warranty_window() {
        let today = date(2024, 5, 1);
        let mut asset = AssetData::named("Laptop");
        assert!(!asset.warranty_expires_within(today, 30));

        asset.warranty_expiry = Some(date(2024, 5, 20));
        assert!(asset.warranty_expires_within(today, 30));

        asset.warranty_expiry = Some(date(2024, 4, 20));
        assert!(!asset.warranty_expires_within(today, 30));

        asset.warranty_expiry = Some(date(2024, 8, 20));
        assert!(!asset.warranty_expires_within(today, 30));
    }

    #[test]
    fn test_decodes_partial_payload_with_defaults() {
        let asset: AssetData =
            serde_json::from_str(r#"{"name":"Dock","purchaseCost":199.5,"type":"dock"}"#).unwrap();
        assert_eq!(asset.purchase_cost, Some(199.5));
        assert_eq!(asset.asset_type, "dock");
        assert_eq!(asset.status, AssetStatus::Ready);
    }
}
