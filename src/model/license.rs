use crate::model::asset::within_window;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Software license attributes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LicenseData {
    pub name: String,
    #[serde(rename = "type")]
    pub license_type: String,
    pub total_seats: u32,
    pub used_seats: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    pub vendor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_key: Option<String>,
}

impl LicenseData {
    pub fn available_seats(&self) -> u32 {
        self.total_seats.saturating_sub(self.used_seats)
    }

    pub fn is_over_allocated(&self) -> bool {
        self.used_seats > self.total_seats
    }

    pub fn expires_within(&self, today: NaiveDate, days: i64) -> bool {
        self.expiry_date
            .map(|expiry| within_window(today, expiry, days))
            .unwrap_or(false)
    }
}
