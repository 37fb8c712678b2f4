use crate::core::{DeskError, Result};
use crate::model::AnyRecord;
use crate::store::{DeskState, KindSlot};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The twelve record kinds tracked by the desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Asset,
    License,
    Accessory,
    Consumable,
    Component,
    Kit,
    RequestableItem,
    User,
    Alert,
    Integration,
    ComplianceCheck,
    PolicyViolation,
}

impl EntityKind {
    pub const ALL: [EntityKind; 12] = [
        EntityKind::Asset,
        EntityKind::License,
        EntityKind::Accessory,
        EntityKind::Consumable,
        EntityKind::Component,
        EntityKind::Kit,
        EntityKind::RequestableItem,
        EntityKind::User,
        EntityKind::Alert,
        EntityKind::Integration,
        EntityKind::ComplianceCheck,
        EntityKind::PolicyViolation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Asset => "asset",
            EntityKind::License => "license",
            EntityKind::Accessory => "accessory",
            EntityKind::Consumable => "consumable",
            EntityKind::Component => "component",
            EntityKind::Kit => "kit",
            EntityKind::RequestableItem => "requestable_item",
            EntityKind::User => "user",
            EntityKind::Alert => "alert",
            EntityKind::Integration => "integration",
            EntityKind::ComplianceCheck => "compliance_check",
            EntityKind::PolicyViolation => "policy_violation",
        }
    }

    /// Key under which the collection is mirrored in local storage.
    pub fn storage_key(&self) -> &'static str {
        match self {
            EntityKind::Asset => "assets",
            EntityKind::License => "licenses",
            EntityKind::Accessory => "accessories",
            EntityKind::Consumable => "consumables",
            EntityKind::Component => "components",
            EntityKind::Kit => "kits",
            EntityKind::RequestableItem => "requestable_items",
            EntityKind::User => "users",
            EntityKind::Alert => "alerts",
            EntityKind::Integration => "integrations",
            EntityKind::ComplianceCheck => "compliance_checks",
            EntityKind::PolicyViolation => "policy_violations",
        }
    }

    /// Collection path on the remote API.
    pub fn remote_path(&self) -> &'static str {
        match self {
            EntityKind::Asset => "/assets",
            EntityKind::License => "/licenses",
            EntityKind::Accessory => "/accessories",
            EntityKind::Consumable => "/consumables",
            EntityKind::Component => "/components",
            EntityKind::Kit => "/kits",
            EntityKind::RequestableItem => "/requestable-items",
            EntityKind::User => "/users",
            EntityKind::Alert => "/alerts",
            EntityKind::Integration => "/integrations",
            EntityKind::ComplianceCheck => "/compliance/checks",
            EntityKind::PolicyViolation => "/compliance/violations",
        }
    }

    pub fn pending_key(&self) -> String {
        format!("{}.pending", self.storage_key())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = DeskError;

    /// Accepts both the singular name and the storage key (`asset`, `assets`,
    /// `requestable-item`, ...).
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized || kind.storage_key() == normalized)
            .or(match normalized.as_str() {
                "people" | "person" => Some(EntityKind::User),
                "predefined_kit" | "predefined_kits" => Some(EntityKind::Kit),
                _ => None,
            })
            .ok_or_else(|| DeskError::UnknownKind(s.to_string()))
    }
}

/// Kind-specific attributes of a record; everything except the `id`.
///
/// A form submission carries exactly one of these as its draft. Implementors
/// are generated by `entity_kind!` in the model module.
pub trait EntityData:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: EntityKind;

    /// Populates nested structures a locally synthesized record needs when the
    /// remote did not assign them. Called only on the fallback path.
    fn fill_local_defaults(&mut self) {}

    fn wrap(record: Record<Self>) -> AnyRecord;

    #[doc(hidden)]
    fn slot(state: &DeskState) -> &KindSlot<Self>;

    #[doc(hidden)]
    fn slot_mut(state: &mut DeskState) -> &mut KindSlot<Self>;
}

/// A stored entity: its identifier plus the kind's attributes.
///
/// Serialized flat, so `Record<AssetData>` reads and writes
/// `{"id": "...", "name": "...", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<D> {
    pub id: String,
    #[serde(flatten)]
    pub data: D,
}

impl<D> Record<D> {
    pub fn new(id: impl Into<String>, data: D) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

impl<D: EntityData> Record<D> {
    pub fn kind(&self) -> EntityKind {
        D::KIND
    }

    /// The attributes after laying `draft` over this record. Every field the
    /// draft serializes wins; fields it omits (unset optionals) keep their
    /// current value.
    pub fn merged_with(&self, draft: &D) -> Result<D> {
        let mut merged = serde_json::to_value(&self.data)?;
        let overlay = serde_json::to_value(draft)?;
        match (merged.as_object_mut(), overlay) {
            (Some(fields), serde_json::Value::Object(changes)) => fields.extend(changes),
            (_, overlay) => merged = overlay,
        }
        Ok(serde_json::from_value(merged)?)
    }

    pub fn into_any(self) -> AnyRecord {
        D::wrap(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing_accepts_aliases() {
        assert_eq!("assets".parse::<EntityKind>().unwrap(), EntityKind::Asset);
        assert_eq!("Asset".parse::<EntityKind>().unwrap(), EntityKind::Asset);
        assert_eq!(
            "requestable-items".parse::<EntityKind>().unwrap(),
            EntityKind::RequestableItem
        );
        assert_eq!("people".parse::<EntityKind>().unwrap(), EntityKind::User);
        assert!("gadgets".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_merge_keeps_fields_the_draft_omits() {
        use crate::model::{AssetData, Lifecycle, LifecycleStage};

        let mut data = AssetData::named("Laptop X");
        data.purchase_cost = Some(1000.0);
        data.lifecycle = Some(Lifecycle {
            stage: LifecycleStage::Active,
            since: None,
        });
        let record = Record::new("1", data);

        let merged = record.merged_with(&AssetData::named("Laptop Y")).unwrap();
        assert_eq!(merged.name, "Laptop Y");
        assert_eq!(merged.purchase_cost, Some(1000.0));
        assert_eq!(merged.lifecycle.unwrap().stage, LifecycleStage::Active);
    }

    #[test]
    fn test_storage_keys_are_unique() {
        let mut keys: Vec<_> = EntityKind::ALL.iter().map(|k| k.storage_key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), EntityKind::ALL.len());
    }
}
