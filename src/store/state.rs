use super::{EditingSession, EntityCollection};
use crate::core::{EntityData, EntityKind};
use crate::model::{
    AccessoryData, AlertData, AlertSettings, AssetData, ComplianceCheckData, ComponentData,
    ConsumableData, IntegrationData, KitData, KitItem, LicenseData, PolicyViolationData,
    RequestableItemData, UserData,
};

/// Collection and form state of one kind.
#[derive(Debug, Clone)]
pub struct KindSlot<D> {
    pub(crate) collection: EntityCollection<D>,
    pub(crate) session: EditingSession<D>,
}

impl<D> Default for KindSlot<D> {
    fn default() -> Self {
        Self {
            collection: EntityCollection::default(),
            session: EditingSession::Hidden,
        }
    }
}

/// Everything the desk owns. Only `AssetDesk` mutates it; everyone else gets
/// read access through `AssetDesk::read`.
#[derive(Debug, Clone, Default)]
pub struct DeskState {
    pub(crate) assets: KindSlot<AssetData>,
    pub(crate) licenses: KindSlot<LicenseData>,
    pub(crate) accessories: KindSlot<AccessoryData>,
    pub(crate) consumables: KindSlot<ConsumableData>,
    pub(crate) components: KindSlot<ComponentData>,
    pub(crate) kits: KindSlot<KitData>,
    pub(crate) requestable_items: KindSlot<RequestableItemData>,
    pub(crate) users: KindSlot<UserData>,
    pub(crate) alerts: KindSlot<AlertData>,
    pub(crate) integrations: KindSlot<IntegrationData>,
    pub(crate) compliance_checks: KindSlot<ComplianceCheckData>,
    pub(crate) policy_violations: KindSlot<PolicyViolationData>,
    pub(crate) alert_settings: AlertSettings,
}

impl DeskState {
    pub fn collection<D: EntityData>(&self) -> &EntityCollection<D> {
        &D::slot(self).collection
    }

    pub fn collection_mut<D: EntityData>(&mut self) -> &mut EntityCollection<D> {
        &mut D::slot_mut(self).collection
    }

    pub fn session<D: EntityData>(&self) -> &EditingSession<D> {
        &D::slot(self).session
    }

    pub(crate) fn session_mut<D: EntityData>(&mut self) -> &mut EditingSession<D> {
        &mut D::slot_mut(self).session
    }

    pub fn alert_settings(&self) -> &AlertSettings {
        &self.alert_settings
    }

    pub fn is_form_visible(&self, kind: EntityKind) -> bool {
        match kind {
            EntityKind::Asset => self.assets.session.is_visible(),
            EntityKind::License => self.licenses.session.is_visible(),
            EntityKind::Accessory => self.accessories.session.is_visible(),
            EntityKind::Consumable => self.consumables.session.is_visible(),
            EntityKind::Component => self.components.session.is_visible(),
            EntityKind::Kit => self.kits.session.is_visible(),
            EntityKind::RequestableItem => self.requestable_items.session.is_visible(),
            EntityKind::User => self.users.session.is_visible(),
            EntityKind::Alert => self.alerts.session.is_visible(),
            EntityKind::Integration => self.integrations.session.is_visible(),
            EntityKind::ComplianceCheck => self.compliance_checks.session.is_visible(),
            EntityKind::PolicyViolation => self.policy_violations.session.is_visible(),
        }
    }

    /// Number of records of `kind`.
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Asset => self.assets.collection.len(),
            EntityKind::License => self.licenses.collection.len(),
            EntityKind::Accessory => self.accessories.collection.len(),
            EntityKind::Consumable => self.consumables.collection.len(),
            EntityKind::Component => self.components.collection.len(),
            EntityKind::Kit => self.kits.collection.len(),
            EntityKind::RequestableItem => self.requestable_items.collection.len(),
            EntityKind::User => self.users.collection.len(),
            EntityKind::Alert => self.alerts.collection.len(),
            EntityKind::Integration => self.integrations.collection.len(),
            EntityKind::ComplianceCheck => self.compliance_checks.collection.len(),
            EntityKind::PolicyViolation => self.policy_violations.collection.len(),
        }
    }

    pub fn contains(&self, kind: EntityKind, id: &str) -> bool {
        match kind {
            EntityKind::Asset => self.assets.collection.contains(id),
            EntityKind::License => self.licenses.collection.contains(id),
            EntityKind::Accessory => self.accessories.collection.contains(id),
            EntityKind::Consumable => self.consumables.collection.contains(id),
            EntityKind::Component => self.components.collection.contains(id),
            EntityKind::Kit => self.kits.collection.contains(id),
            EntityKind::RequestableItem => self.requestable_items.collection.contains(id),
            EntityKind::User => self.users.collection.contains(id),
            EntityKind::Alert => self.alerts.collection.contains(id),
            EntityKind::Integration => self.integrations.collection.contains(id),
            EntityKind::ComplianceCheck => self.compliance_checks.collection.contains(id),
            EntityKind::PolicyViolation => self.policy_violations.collection.contains(id),
        }
    }

    pub fn is_empty(&self) -> bool {
        EntityKind::ALL.into_iter().all(|kind| self.count(kind) == 0)
    }

    /// Kit lines whose referenced record no longer exists. Deleting a record
    /// never rewrites the kits that point at it.
    pub fn dangling_kit_items<'a>(&self, kit: &'a KitData) -> Vec<&'a KitItem> {
        kit.items
            .iter()
            .filter(|item| !self.contains(item.item_type.kind(), &item.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Record;
    use crate::model::KitItemType;

    #[test]
    fn test_dangling_kit_items() {
        let mut state = DeskState::default();
        state
            .collection_mut::<AssetData>()
            .upsert(Record::new("a1", AssetData::named("Laptop")));

        let kit = KitData {
            name: "Starter".to_string(),
            items: vec![
                KitItem {
                    item_type: KitItemType::Asset,
                    id: "a1".to_string(),
                    quantity: 1,
                },
                KitItem {
                    item_type: KitItemType::License,
                    id: "a1".to_string(),
                    quantity: 1,
                },
            ],
            ..Default::default()
        };

        let dangling = state.dangling_kit_items(&kit);
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].item_type, KitItemType::License);
        assert!(state.contains(EntityKind::Asset, "a1"));
    }
}
