//! Stock-tracked items: accessories, consumables and components.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessoryData {
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub location: String,
    /// Older payloads call this field `cost`.
    #[serde(alias = "cost", skip_serializing_if = "Option::is_none")]
    pub purchase_cost: Option<f64>,
    pub supplier: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsumableData {
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub min_quantity: u32,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    pub supplier: String,
}

impl ConsumableData {
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_quantity
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentData {
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub location: String,
    #[serde(alias = "cost", skip_serializing_if = "Option::is_none")]
    pub purchase_cost: Option<f64>,
    pub supplier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_cost_alias() {
        let accessory: AccessoryData =
            serde_json::from_str(r#"{"name":"Mouse","quantity":25,"cost":29.99}"#).unwrap();
        assert_eq!(accessory.purchase_cost, Some(29.99));

        let encoded = serde_json::to_value(&accessory).unwrap();
        assert_eq!(encoded["purchaseCost"], serde_json::json!(29.99));
    }

    #[test]
    fn test_low_stock_threshold() {
        let mut paper = ConsumableData {
            quantity: 50,
            min_quantity: 10,
            ..Default::default()
        };
        assert!(!paper.is_low_stock());
        paper.quantity = 10;
        assert!(paper.is_low_stock());
    }
}
