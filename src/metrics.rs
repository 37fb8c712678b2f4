//! Dashboard figures derived from the desk state.

use crate::core::EntityKind;
use crate::model::{AlertStatus, ComplianceStatus};
use crate::store::DeskState;
use chrono::NaiveDate;
use serde::Serialize;

/// Aggregates shown on the dashboard. Always recomputed from scratch; nothing
/// here is stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub assets: usize,
    pub licenses: usize,
    pub accessories: usize,
    pub consumables: usize,
    pub components: usize,
    pub people: usize,
    pub predefined_kits: usize,
    pub requestable_items: usize,
    pub integrations: usize,
    pub compliance_checks: usize,
    pub policy_violations: usize,
    pub total_value: f64,
    pub alerts: usize,
    pub critical_alerts: usize,
    pub expiring_warranties: usize,
    pub expiring_licenses: usize,
    pub maintenance_due: usize,
    pub compliance_issues: usize,
    pub low_stock_consumables: usize,
}

impl DashboardMetrics {
    pub fn compute(state: &DeskState, today: NaiveDate) -> Self {
        let settings = state.alert_settings();
        let assets = state.assets.collection.list();
        let licenses = state.licenses.collection.list();
        let alerts = state.alerts.collection.list();

        let total_value: f64 = assets
            .iter()
            .map(|asset| asset.data.purchase_cost.unwrap_or(0.0))
            .chain(licenses.iter().map(|license| license.data.cost.unwrap_or(0.0)))
            .chain(
                state
                    .accessories
                    .collection
                    .list()
                    .iter()
                    .map(|accessory| accessory.data.purchase_cost.unwrap_or(0.0)),
            )
            .chain(
                state
                    .components
                    .collection
                    .list()
                    .iter()
                    .map(|component| component.data.purchase_cost.unwrap_or(0.0)),
            )
            .sum();

        let non_compliant = state
            .compliance_checks
            .collection
            .list()
            .iter()
            .filter(|check| check.data.status == ComplianceStatus::NonCompliant)
            .count();
        let open_violations = state
            .policy_violations
            .collection
            .list()
            .iter()
            .filter(|violation| violation.data.is_open())
            .count();

        Self {
            assets: state.count(EntityKind::Asset),
            licenses: state.count(EntityKind::License),
            accessories: state.count(EntityKind::Accessory),
            consumables: state.count(EntityKind::Consumable),
            components: state.count(EntityKind::Component),
            people: state.count(EntityKind::User),
            predefined_kits: state.count(EntityKind::Kit),
            requestable_items: state.count(EntityKind::RequestableItem),
            integrations: state.count(EntityKind::Integration),
            compliance_checks: state.count(EntityKind::ComplianceCheck),
            policy_violations: state.count(EntityKind::PolicyViolation),
            total_value,
            alerts: alerts
                .iter()
                .filter(|alert| alert.data.status == AlertStatus::Active)
                .count(),
            critical_alerts: alerts
                .iter()
                .filter(|alert| alert.data.is_critical_active())
                .count(),
            expiring_warranties: assets
                .iter()
                .filter(|asset| {
                    asset
                        .data
                        .warranty_expires_within(today, settings.warranty_days)
                })
                .count(),
            expiring_licenses: licenses
                .iter()
                .filter(|license| license.data.expires_within(today, settings.license_days))
                .count(),
            maintenance_due: assets
                .iter()
                .filter(|asset| {
                    asset
                        .data
                        .maintenance_due_within(today, settings.maintenance_days)
                })
                .count(),
            compliance_issues: non_compliant + open_violations,
            low_stock_consumables: state
                .consumables
                .collection
                .list()
                .iter()
                .filter(|consumable| consumable.data.is_low_stock())
                .count(),
        }
    }
}
