//! Sample data installed into an empty desk.

use crate::core::{EntityData, EntityKind, Record};
use crate::model::{
    AccessoryData, Alert, AlertData, AlertSeverity, AlertType, AssetData, AssetStatus,
    ComplianceCheck, ComplianceCheckData, ComplianceStatus, ComplianceType, ComponentData,
    ConsumableData, DepreciationSchedule, EntityRef, FieldMapping, Integration, IntegrationData,
    IntegrationErrorEntry, IntegrationStatus, IntegrationType, KitData, KitItem, KitItemType,
    LicenseData, Lifecycle, LifecycleStage, PolicyViolation, PolicyViolationData,
    RequestableItemData, SyncFrequency, UserData, ViolationSeverity, ViolationStatus,
};
use crate::store::DeskState;
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Fills every collection of `state` with the sample set.
pub fn populate(state: &mut DeskState, today: NaiveDate) {
    let now = Utc::now();
    install(state, assets(today));
    install(state, vec![license()]);
    install(state, vec![user()]);
    install(state, vec![accessory()]);
    install(state, vec![consumable()]);
    install(state, vec![component()]);
    install(state, vec![kit()]);
    install(state, vec![requestable_item()]);
    install(state, alerts(now));
    install(state, integrations(now));
    install(state, compliance_checks(now));
    install(state, policy_violations(now));
}

fn install<D: EntityData>(state: &mut DeskState, records: Vec<Record<D>>) {
    state.collection_mut::<D>().replace_all(records);
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn assets(today: NaiveDate) -> Vec<Record<AssetData>> {
    vec![Record::new(
        "1",
        AssetData {
            name: "MacBook Pro 16\"".to_string(),
            asset_type: "laptop".to_string(),
            status: AssetStatus::Deployed,
            assigned_to: Some("John Doe".to_string()),
            location: "New York Office".to_string(),
            serial_number: "MBP2023001".to_string(),
            model: "MacBook Pro".to_string(),
            manufacturer: "Apple".to_string(),
            purchase_date: date(2023, 1, 15),
            warranty_expiry: date(2026, 1, 15),
            purchase_cost: Some(2499.99),
            next_maintenance: Some(today + Duration::days(90)),
            lifecycle: Some(Lifecycle {
                stage: LifecycleStage::Active,
                since: date(2023, 1, 15),
            }),
            depreciation: Some(DepreciationSchedule::default()),
            ..Default::default()
        },
    )]
}

fn license() -> Record<LicenseData> {
    Record::new(
        "1",
        LicenseData {
            name: "Microsoft Office 365".to_string(),
            license_type: "subscription".to_string(),
            total_seats: 100,
            used_seats: 85,
            expiry_date: date(2024, 12, 31),
            cost: Some(1200.0),
            vendor: "Microsoft".to_string(),
            product_key: None,
        },
    )
}

fn user() -> Record<UserData> {
    Record::new(
        "1",
        UserData {
            name: "John Doe".to_string(),
            email: "john.doe@company.com".to_string(),
            department: "Engineering".to_string(),
            role: "Senior Developer".to_string(),
            location: "New York Office".to_string(),
            manager: Some("Jane Smith".to_string()),
            employee_id: "EMP001".to_string(),
            start_date: date(2022, 3, 15),
            avatar: None,
        },
    )
}

fn accessory() -> Record<AccessoryData> {
    Record::new(
        "1",
        AccessoryData {
            name: "Wireless Mouse".to_string(),
            category: "peripherals".to_string(),
            quantity: 25,
            location: "Storage Room A".to_string(),
            purchase_cost: Some(29.99),
            supplier: "Logitech".to_string(),
        },
    )
}

fn consumable() -> Record<ConsumableData> {
    Record::new(
        "1",
        ConsumableData {
            name: "Printer Paper A4".to_string(),
            category: "office-supplies".to_string(),
            quantity: 50,
            min_quantity: 10,
            location: "Supply Closet".to_string(),
            cost: Some(8.99),
            supplier: "Office Depot".to_string(),
        },
    )
}

fn component() -> Record<ComponentData> {
    Record::new(
        "1",
        ComponentData {
            name: "16GB DDR4 RAM".to_string(),
            category: "memory".to_string(),
            quantity: 15,
            location: "IT Storage".to_string(),
            purchase_cost: Some(89.99),
            supplier: "Corsair".to_string(),
            compatibility: Some("DDR4-3200".to_string()),
        },
    )
}

fn kit() -> Record<KitData> {
    Record::new(
        "1",
        KitData {
            name: "Developer Workstation".to_string(),
            description: "Complete setup for software developers".to_string(),
            items: vec![
                KitItem {
                    item_type: KitItemType::Asset,
                    id: "1".to_string(),
                    quantity: 1,
                },
                KitItem {
                    item_type: KitItemType::Accessory,
                    id: "1".to_string(),
                    quantity: 1,
                },
            ],
            total_cost: 2529.98,
        },
    )
}

fn requestable_item() -> Record<RequestableItemData> {
    Record::new(
        "1",
        RequestableItemData {
            name: "Laptop Stand".to_string(),
            category: "ergonomics".to_string(),
            description: "Adjustable aluminum laptop stand".to_string(),
            cost: Some(49.99),
            supplier: "Ergotron".to_string(),
            requestable: true,
        },
    )
}

pub fn alerts(now: DateTime<Utc>) -> Vec<Alert> {
    let related = |kind: EntityKind| Some(EntityRef { kind, id: "1".to_string() });
    let mut warranty = AlertData::new(
        AlertType::WarrantyExpiry,
        AlertSeverity::Warning,
        "Warranty expiring soon",
        "MacBook Pro 16\" warranty ends within 30 days",
    );
    warranty.related_entity = related(EntityKind::Asset);

    let mut license = AlertData::new(
        AlertType::LicenseExpiry,
        AlertSeverity::Critical,
        "License renewal due",
        "Microsoft Office 365 subscription expires soon",
    );
    license.related_entity = related(EntityKind::License);

    let mut security = AlertData::new(
        AlertType::SecurityAlert,
        AlertSeverity::Error,
        "Unauthorized software detected",
        "Unapproved software found on 3 workstations",
    );
    security.related_entity = related(EntityKind::PolicyViolation);

    [warranty, license, security]
        .into_iter()
        .enumerate()
        .map(|(index, mut alert)| {
            alert.created_at = now - Duration::hours(index as i64);
            Record::new((index + 1).to_string(), alert)
        })
        .collect()
}

pub fn integrations(now: DateTime<Utc>) -> Vec<Integration> {
    let mapping = |source: &str, target: &str, transformation: Option<&str>| FieldMapping {
        source_field: source.to_string(),
        target_field: target.to_string(),
        transformation: transformation.map(str::to_string),
    };

    vec![
        Record::new(
            "1",
            IntegrationData {
                name: "Microsoft SCCM".to_string(),
                integration_type: IntegrationType::DiscoveryTool,
                endpoint: "https://sccm.company.com/api".to_string(),
                last_sync: Some(now),
                sync_frequency: SyncFrequency::Daily,
                status: IntegrationStatus::Active,
                mappings: vec![
                    mapping("ComputerName", "name", Some("uppercase")),
                    mapping("SerialNumber", "serialNumber", None),
                ],
                error_log: Vec::new(),
            },
        ),
        Record::new(
            "2",
            IntegrationData {
                name: "ServiceNow CMDB".to_string(),
                integration_type: IntegrationType::Cmdb,
                endpoint: "https://company.service-now.com/api".to_string(),
                last_sync: Some(now - Duration::hours(2)),
                sync_frequency: SyncFrequency::Hourly,
                status: IntegrationStatus::Active,
                mappings: vec![
                    mapping("ci_name", "name", None),
                    mapping("asset_tag", "tag", None),
                ],
                error_log: Vec::new(),
            },
        ),
        Record::new(
            "3",
            IntegrationData {
                name: "Lansweeper".to_string(),
                integration_type: IntegrationType::DiscoveryTool,
                endpoint: "https://lansweeper.company.com/api".to_string(),
                last_sync: Some(now - Duration::hours(24)),
                sync_frequency: SyncFrequency::Weekly,
                status: IntegrationStatus::Error,
                mappings: Vec::new(),
                error_log: vec![IntegrationErrorEntry {
                    timestamp: now,
                    error: "Connection timeout".to_string(),
                    details: "Failed to connect to Lansweeper API after 30 seconds".to_string(),
                    resolved: false,
                }],
            },
        ),
    ]
}

pub fn compliance_checks(now: DateTime<Utc>) -> Vec<ComplianceCheck> {
    vec![
        Record::new(
            "1",
            ComplianceCheckData {
                check_type: ComplianceType::License,
                status: ComplianceStatus::Compliant,
                last_checked: now,
                next_check: now + Duration::days(30),
                violations: Vec::new(),
                auditor: "System Administrator".to_string(),
                notes: "All software licenses are properly tracked and within limits".to_string(),
            },
        ),
        Record::new(
            "2",
            ComplianceCheckData {
                check_type: ComplianceType::Security,
                status: ComplianceStatus::NonCompliant,
                last_checked: now,
                next_check: now + Duration::days(7),
                violations: Vec::new(),
                auditor: "Security Team".to_string(),
                notes: "Some assets missing security patches".to_string(),
            },
        ),
    ]
}

pub fn policy_violations(now: DateTime<Utc>) -> Vec<PolicyViolation> {
    vec![
        Record::new(
            "1",
            PolicyViolationData {
                violation_type: "License Overuse".to_string(),
                severity: ViolationSeverity::Critical,
                description: "Microsoft Office licenses exceeded by 5 seats".to_string(),
                detected_date: now,
                assigned_to: Some("IT Manager".to_string()),
                status: ViolationStatus::Open,
                resolved_date: None,
            },
        ),
        Record::new(
            "2",
            PolicyViolationData {
                violation_type: "Unauthorized Software".to_string(),
                severity: ViolationSeverity::High,
                description: "Unauthorized software detected on 3 workstations".to_string(),
                detected_date: now - Duration::days(2),
                assigned_to: Some("Security Team".to_string()),
                status: ViolationStatus::InProgress,
                resolved_date: None,
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_populate_fills_every_kind() {
        let mut state = DeskState::default();
        populate(&mut state, Utc::now().date_naive());
        for kind in EntityKind::ALL {
            assert!(state.count(kind) > 0, "{} has no samples", kind);
        }
    }
}
