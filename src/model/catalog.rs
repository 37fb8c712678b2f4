//! Predefined kits and the self-service request catalog.

use crate::core::EntityKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KitItemType {
    #[default]
    Asset,
    License,
    Accessory,
    Consumable,
    Component,
}

impl KitItemType {
    pub fn kind(&self) -> EntityKind {
        match self {
            KitItemType::Asset => EntityKind::Asset,
            KitItemType::License => EntityKind::License,
            KitItemType::Accessory => EntityKind::Accessory,
            KitItemType::Consumable => EntityKind::Consumable,
            KitItemType::Component => EntityKind::Component,
        }
    }
}

/// One line of a kit. `id` refers into the collection named by `item_type`;
/// the reference is not kept consistent if that record is deleted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitItem {
    #[serde(rename = "type")]
    pub item_type: KitItemType,
    pub id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KitData {
    pub name: String,
    pub description: String,
    pub items: Vec<KitItem>,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestableItemData {
    pub name: String,
    pub category: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    pub supplier: String,
    pub requestable: bool,
}
