//! Kind-specific attribute types.
//!
//! Each kind is an attribute struct (`AssetData`, `LicenseData`, ...) wrapped
//! in [`Record`] to form the stored entity (`Asset`, `License`, ...).
//! [`AnyRecord`] carries an explicit `kind` tag so generic code never has to
//! guess a record's kind from which fields happen to be present.

pub mod alert;
pub mod asset;
pub mod catalog;
pub mod compliance;
pub mod integration;
pub mod inventory;
pub mod license;
pub mod people;

pub use alert::{AlertData, AlertSettings, AlertSeverity, AlertStatus, AlertType, EntityRef};
pub use asset::{
    AssetData, AssetStatus, AssignmentRecord, DepreciationMethod, DepreciationSchedule, Lifecycle,
    LifecycleStage, MaintenanceRecord,
};
pub use catalog::{KitData, KitItem, KitItemType, RequestableItemData};
pub use compliance::{
    ComplianceCheckData, ComplianceStatus, ComplianceType, PolicyViolationData, ViolationSeverity,
    ViolationStatus,
};
pub use integration::{
    FieldMapping, IntegrationData, IntegrationErrorEntry, IntegrationStatus, IntegrationType,
    SyncFrequency,
};
pub use inventory::{AccessoryData, ComponentData, ConsumableData};
pub use license::LicenseData;
pub use people::UserData;

use crate::core::{EntityData, EntityKind, Record};
use crate::store::{DeskState, KindSlot};
use serde::{Deserialize, Serialize};

macro_rules! entity_kind {
    ($data:ty => $alias:ident, $kind:ident, $field:ident { $($extra:tt)* }) => {
        pub type $alias = Record<$data>;

        impl EntityData for $data {
            const KIND: EntityKind = EntityKind::$kind;

            $($extra)*

            fn wrap(record: Record<Self>) -> AnyRecord {
                AnyRecord::$kind(record)
            }

            fn slot(state: &DeskState) -> &KindSlot<Self> {
                &state.$field
            }

            fn slot_mut(state: &mut DeskState) -> &mut KindSlot<Self> {
                &mut state.$field
            }
        }
    };
    ($data:ty => $alias:ident, $kind:ident, $field:ident) => {
        entity_kind!($data => $alias, $kind, $field {});
    };
}

entity_kind!(AssetData => Asset, Asset, assets {
    fn fill_local_defaults(&mut self) {
        self.apply_local_defaults(chrono::Utc::now().date_naive());
    }
});
entity_kind!(LicenseData => License, License, licenses);
entity_kind!(AccessoryData => Accessory, Accessory, accessories);
entity_kind!(ConsumableData => Consumable, Consumable, consumables);
entity_kind!(ComponentData => Component, Component, components);
entity_kind!(KitData => PredefinedKit, Kit, kits);
entity_kind!(RequestableItemData => RequestableItem, RequestableItem, requestable_items);
entity_kind!(UserData => User, User, users);
entity_kind!(AlertData => Alert, Alert, alerts);
entity_kind!(IntegrationData => Integration, Integration, integrations);
entity_kind!(ComplianceCheckData => ComplianceCheck, ComplianceCheck, compliance_checks);
entity_kind!(PolicyViolationData => PolicyViolation, PolicyViolation, policy_violations);

/// A record of any kind, tagged with its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnyRecord {
    Asset(Asset),
    License(License),
    Accessory(Accessory),
    Consumable(Consumable),
    Component(Component),
    Kit(PredefinedKit),
    RequestableItem(RequestableItem),
    User(User),
    Alert(Alert),
    Integration(Integration),
    ComplianceCheck(ComplianceCheck),
    PolicyViolation(PolicyViolation),
}

impl AnyRecord {
    pub fn kind(&self) -> EntityKind {
        match self {
            AnyRecord::Asset(_) => EntityKind::Asset,
            AnyRecord::License(_) => EntityKind::License,
            AnyRecord::Accessory(_) => EntityKind::Accessory,
            AnyRecord::Consumable(_) => EntityKind::Consumable,
            AnyRecord::Component(_) => EntityKind::Component,
            AnyRecord::Kit(_) => EntityKind::Kit,
            AnyRecord::RequestableItem(_) => EntityKind::RequestableItem,
            AnyRecord::User(_) => EntityKind::User,
            AnyRecord::Alert(_) => EntityKind::Alert,
            AnyRecord::Integration(_) => EntityKind::Integration,
            AnyRecord::ComplianceCheck(_) => EntityKind::ComplianceCheck,
            AnyRecord::PolicyViolation(_) => EntityKind::PolicyViolation,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            AnyRecord::Asset(r) => &r.id,
            AnyRecord::License(r) => &r.id,
            AnyRecord::Accessory(r) => &r.id,
            AnyRecord::Consumable(r) => &r.id,
            AnyRecord::Component(r) => &r.id,
            AnyRecord::Kit(r) => &r.id,
            AnyRecord::RequestableItem(r) => &r.id,
            AnyRecord::User(r) => &r.id,
            AnyRecord::Alert(r) => &r.id,
            AnyRecord::Integration(r) => &r.id,
            AnyRecord::ComplianceCheck(r) => &r.id,
            AnyRecord::PolicyViolation(r) => &r.id,
        }
    }
}
