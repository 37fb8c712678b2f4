use assetdesk::model::{
    AlertData, AlertSeverity, AlertType, AssetData, ConsumableData, LicenseData, LifecycleStage,
    UserData,
};
use assetdesk::remote::{
    ApiResponse, Method, MockMode, MockRemote, RemoteApi, RemoteResult, RequestOptions,
};
use assetdesk::storage::MemoryStorage;
use assetdesk::{
    AssetDesk, DeskConfig, EditingSession, EntityData, EntityKind, Record, SaveOutcome,
    StoreChange,
};
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;

async fn desk_with(remote: Arc<MockRemote>) -> AssetDesk {
    AssetDesk::open(
        DeskConfig::default().seed_samples(false),
        remote,
        Arc::new(MemoryStorage::new()),
    )
    .await
    .unwrap()
}

async fn ids<D: EntityData>(desk: &AssetDesk) -> Vec<String> {
    desk.list::<D>()
        .await
        .into_iter()
        .map(|record| record.id)
        .collect()
}

async fn assert_create_appends_one<D: EntityData>(desk: &AssetDesk, draft: D) {
    let before: HashSet<String> = ids::<D>(desk).await.into_iter().collect();

    let outcome = desk.save(draft.clone(), None).await;
    let record = outcome.record().unwrap().clone();

    let after = desk.list::<D>().await;
    assert_eq!(after.len(), before.len() + 1);
    assert!(!record.id.is_empty());
    assert!(!before.contains(&record.id));
    assert_eq!(after.last().unwrap(), &record);
    assert_eq!(record.data, draft);
}

#[tokio::test]
async fn test_create_appends_exactly_one_record_per_kind() {
    for remote in [MockRemote::online(), MockRemote::unreachable()] {
        let desk = desk_with(Arc::new(remote)).await;

        assert_create_appends_one(
            &desk,
            LicenseData {
                name: "Office".to_string(),
                total_seats: 10,
                ..Default::default()
            },
        )
        .await;
        assert_create_appends_one(
            &desk,
            UserData {
                name: "Jane".to_string(),
                ..Default::default()
            },
        )
        .await;
        assert_create_appends_one(
            &desk,
            ConsumableData {
                name: "Toner".to_string(),
                quantity: 3,
                ..Default::default()
            },
        )
        .await;
        assert_create_appends_one(
            &desk,
            AlertData::new(AlertType::CostThreshold, AlertSeverity::Info, "Budget", "80%"),
        )
        .await;
        // Twice in a row, so local ids generated in the same millisecond are
        // still distinct.
        assert_create_appends_one(&desk, UserData::default()).await;
        assert_create_appends_one(&desk, UserData::default()).await;
    }
}

#[tokio::test]
async fn test_create_uses_server_record_when_online() {
    let remote = Arc::new(MockRemote::online());
    let desk = desk_with(remote.clone()).await;

    let outcome = desk.save(AssetData::named("Laptop"), None).await;

    assert!(outcome.is_synced());
    let record = outcome.record().unwrap();
    assert!(record.id.starts_with("srv-"));
    assert_eq!(remote.requests_to(Method::Post, "/assets"), 1);
    assert!(desk.pending_sync::<AssetData>().await.is_empty());
    // The server answer is used verbatim, so no local defaults are filled in.
    assert!(record.data.lifecycle.is_none());
}

#[tokio::test]
async fn test_create_falls_back_locally_on_remote_failure() {
    let remote = Arc::new(MockRemote::unreachable());
    let desk = desk_with(remote.clone()).await;

    let outcome = desk.save(LicenseData::default(), None).await;

    let SaveOutcome::Created { record, synced } = outcome else {
        panic!("expected a created record");
    };
    assert!(!synced);
    assert!(!record.id.starts_with("srv-"));
    assert!(record.id.parse::<i64>().is_ok());
    assert_eq!(remote.requests_to(Method::Post, "/licenses"), 1);
    assert_eq!(desk.pending_sync::<LicenseData>().await, vec![record.id]);
}

#[tokio::test]
async fn test_create_falls_back_when_remote_returns_nothing() {
    let desk = desk_with(Arc::new(MockRemote::new(MockMode::EmptyResponses))).await;

    let outcome = desk.save(AssetData::named("Dock"), None).await;

    assert!(!outcome.is_synced());
    assert_eq!(desk.len::<AssetData>().await, 1);
    assert_eq!(desk.pending_sync::<AssetData>().await.len(), 1);
}

#[tokio::test]
async fn test_update_replaces_fields_and_keeps_id() {
    for remote in [MockRemote::online(), MockRemote::unreachable()] {
        let desk = desk_with(Arc::new(remote)).await;
        let first = desk.save(UserData::default(), None).await;
        let first = first.record().unwrap().clone();
        desk.save(UserData::default(), None).await;

        let draft = UserData {
            name: "Jane Smith".to_string(),
            department: "Finance".to_string(),
            ..Default::default()
        };
        let outcome = desk.save(draft.clone(), Some(&first)).await;

        assert!(matches!(outcome, SaveOutcome::Updated { .. }));
        let users = desk.list::<UserData>().await;
        assert_eq!(users.len(), 2);
        let matching: Vec<_> = users.iter().filter(|user| user.id == first.id).collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].data, draft);
        assert_eq!(users[0].id, first.id);
    }
}

#[tokio::test]
async fn test_update_keeps_fields_the_draft_leaves_unset() {
    let desk = desk_with(Arc::new(MockRemote::unreachable())).await;
    let mut draft = AssetData::named("Laptop X");
    draft.purchase_cost = Some(1000.0);
    let created = desk.save(draft, None).await.record().unwrap().clone();
    assert!(created.data.lifecycle.is_some());

    let outcome = desk.save(AssetData::named("Laptop Y"), Some(&created)).await;

    let updated = outcome.record().unwrap();
    assert_eq!(updated.data.name, "Laptop Y");
    assert_eq!(updated.data.purchase_cost, Some(1000.0));
    assert_eq!(
        updated.data.lifecycle.as_ref().map(|lifecycle| lifecycle.stage),
        Some(LifecycleStage::Active)
    );
    assert!(updated.data.depreciation.is_some());
    assert_eq!(desk.get::<AssetData>(&created.id).await.as_ref(), Some(updated));
}

/// Backend that answers every create with the same id.
struct FixedIdRemote;

#[async_trait]
impl RemoteApi for FixedIdRemote {
    async fn request(&self, _path: &str, options: RequestOptions) -> RemoteResult<ApiResponse> {
        let mut body = options.body.unwrap_or_else(|| json!({}));
        body["id"] = json!("1");
        Ok(ApiResponse::with_data(body))
    }
}

#[tokio::test]
async fn test_create_never_overwrites_on_server_id_collision() {
    let desk = AssetDesk::open(
        DeskConfig::default().seed_samples(false),
        Arc::new(FixedIdRemote),
        Arc::new(MemoryStorage::new()),
    )
    .await
    .unwrap();

    let first = desk.save(AssetData::named("First"), None).await;
    assert!(first.is_synced());
    assert_eq!(first.record().unwrap().id, "1");

    let second = desk.save(AssetData::named("Second"), None).await;
    assert!(matches!(second, SaveOutcome::Created { synced: false, .. }));
    let second_id = second.record().unwrap().id.clone();
    assert_ne!(second_id, "1");

    let assets = desk.list::<AssetData>().await;
    assert_eq!(assets.len(), 2);
    assert_eq!(assets[0].data.name, "First");
    assert_eq!(assets[1].data.name, "Second");
    assert_eq!(desk.pending_sync::<AssetData>().await, vec![second_id]);
}

#[tokio::test]
async fn test_update_tracks_pending_sync() {
    let remote = Arc::new(MockRemote::online());
    let desk = desk_with(remote.clone()).await;
    let record = desk
        .save(AssetData::named("Laptop"), None)
        .await
        .record()
        .unwrap()
        .clone();

    remote.set_mode(MockMode::Unreachable);
    let outcome = desk.save(AssetData::named("Laptop v2"), Some(&record)).await;
    assert!(!outcome.is_synced());
    assert_eq!(desk.pending_sync::<AssetData>().await, vec![record.id.clone()]);

    remote.set_mode(MockMode::Online);
    let outcome = desk.save(AssetData::named("Laptop v3"), Some(&record)).await;
    assert!(outcome.is_synced());
    assert!(desk.pending_sync::<AssetData>().await.is_empty());
    assert_eq!(remote.requests_to(Method::Put, &format!("/assets/{}", record.id)), 2);
}

#[tokio::test]
async fn test_update_of_missing_record_is_a_noop() {
    let remote = Arc::new(MockRemote::online());
    let desk = desk_with(remote.clone()).await;
    desk.save(AssetData::named("Kept"), None).await;
    let ghost = Record::new("ghost", AssetData::named("Ghost"));

    desk.begin_edit(ghost.clone()).await;
    let outcome = desk.submit(AssetData::named("Changed")).await;

    assert_eq!(outcome, SaveOutcome::Skipped { id: "ghost".to_string() });
    assert_eq!(desk.len::<AssetData>().await, 1);
    assert_eq!(desk.list::<AssetData>().await[0].data.name, "Kept");
    assert_eq!(desk.session::<AssetData>().await, EditingSession::Hidden);
    assert_eq!(remote.requests_to(Method::Put, "/assets/ghost"), 0);
}

#[tokio::test]
async fn test_remove_is_idempotent_and_exact() {
    let desk = desk_with(Arc::new(MockRemote::unreachable())).await;
    for name in ["A", "B", "C"] {
        desk.save(AssetData::named(name), None).await;
    }
    let before = ids::<AssetData>(&desk).await;

    assert!(!desk.delete::<AssetData>("missing").await);
    assert_eq!(ids::<AssetData>(&desk).await, before);

    assert!(desk.delete::<AssetData>(&before[1]).await);
    assert_eq!(
        ids::<AssetData>(&desk).await,
        vec![before[0].clone(), before[2].clone()]
    );
}

#[tokio::test]
async fn test_sessions_close_on_every_path() {
    let desk = desk_with(Arc::new(MockRemote::unreachable())).await;

    desk.begin_create::<AssetData>().await;
    desk.begin_create::<LicenseData>().await;
    assert_eq!(
        desk.visible_forms().await,
        vec![EntityKind::Asset, EntityKind::License]
    );

    let created = desk.submit(AssetData::named("Laptop")).await;
    assert!(matches!(created, SaveOutcome::Created { .. }));
    assert!(!desk.session::<AssetData>().await.is_visible());
    // Forms of other kinds are independent.
    assert!(desk.session::<LicenseData>().await.is_visible());

    desk.cancel::<LicenseData>().await;
    assert!(desk.visible_forms().await.is_empty());

    let record = created.record().unwrap().clone();
    desk.begin_edit(record.clone()).await;
    assert_eq!(
        desk.session::<AssetData>().await.editing().map(|r| r.id.clone()),
        Some(record.id.clone())
    );
    let updated = desk.submit(AssetData::named("Laptop Y")).await;
    assert!(matches!(updated, SaveOutcome::Updated { .. }));
    assert!(!desk.session::<AssetData>().await.is_visible());
}

#[tokio::test]
async fn test_metrics_track_collections() {
    let remote = Arc::new(MockRemote::online());
    let desk = desk_with(remote.clone()).await;

    let mut laptop = AssetData::named("Laptop");
    laptop.purchase_cost = Some(1200.0);
    let laptop = desk.save(laptop, None).await.record().unwrap().clone();
    remote.set_mode(MockMode::Unreachable);
    let mut monitor = AssetData::named("Monitor");
    monitor.purchase_cost = Some(300.0);
    desk.save(monitor, None).await;
    desk.save(
        LicenseData {
            cost: Some(99.5),
            ..Default::default()
        },
        None,
    )
    .await;
    desk.save(UserData::default(), None).await;

    let metrics = desk.metrics();
    assert_eq!(metrics.assets, desk.len::<AssetData>().await);
    assert_eq!(metrics.licenses, 1);
    assert_eq!(metrics.people, 1);
    assert_eq!(metrics.total_value, 1599.5);

    let mut cheaper = laptop.data.clone();
    cheaper.purchase_cost = Some(1000.0);
    desk.save(cheaper, Some(&laptop)).await;
    assert_eq!(desk.metrics().total_value, 1399.5);

    desk.delete::<AssetData>(&laptop.id).await;
    let metrics = desk.metrics();
    assert_eq!(metrics.assets, 1);
    assert_eq!(metrics.total_value, 399.5);
}

#[tokio::test]
async fn test_watchers_and_subscribers_see_mutations() {
    let desk = desk_with(Arc::new(MockRemote::online())).await;
    let mut events = desk.subscribe();
    let mut metrics = desk.watch_metrics();

    let record = desk
        .save(AssetData::named("Laptop"), None)
        .await
        .record()
        .unwrap()
        .clone();

    let event = events.recv().await.unwrap();
    assert_eq!(event.kind, EntityKind::Asset);
    assert_eq!(event.change, StoreChange::Upserted { id: record.id.clone() });
    assert!(metrics.has_changed().unwrap());
    assert_eq!(metrics.borrow_and_update().assets, 1);

    desk.delete::<AssetData>(&record.id).await;
    let event = events.recv().await.unwrap();
    assert_eq!(event.change, StoreChange::Removed { id: record.id });
}

#[tokio::test]
async fn test_overlapping_saves_both_land() {
    let desk = desk_with(Arc::new(MockRemote::unreachable())).await;

    let first = desk.clone();
    let second = desk.clone();
    let (a, b) = tokio::join!(
        first.save(AssetData::named("A"), None),
        second.save(AssetData::named("B"), None)
    );

    assert_ne!(a.record().unwrap().id, b.record().unwrap().id);
    assert_eq!(desk.len::<AssetData>().await, 2);
}

#[tokio::test]
async fn test_edit_any_dispatches_on_kind_tag() {
    let desk = desk_with(Arc::new(MockRemote::online())).await;
    let license = desk
        .save(
            LicenseData {
                name: "Office".to_string(),
                product_key: Some("XXXX".to_string()),
                ..Default::default()
            },
            None,
        )
        .await
        .record()
        .unwrap()
        .clone();

    let any = desk.get_any(EntityKind::License, &license.id).await.unwrap();
    let kind = desk.begin_edit_any(any).await;

    assert_eq!(kind, EntityKind::License);
    assert_eq!(
        desk.session::<LicenseData>().await.editing(),
        Some(&license)
    );
    assert!(!desk.session::<AssetData>().await.is_visible());
}

// Scenario: offline create of an asset.
#[tokio::test]
async fn test_offline_asset_create_scenario() {
    let desk = desk_with(Arc::new(MockRemote::unreachable())).await;
    let mut draft = AssetData::named("Laptop X");
    draft.purchase_cost = Some(1000.0);

    desk.save(draft, None).await;

    let assets = desk.list::<AssetData>().await;
    assert_eq!(assets.len(), 1);
    assert!(!assets[0].id.is_empty());
    assert_eq!(
        assets[0].data.lifecycle.as_ref().map(|l| l.stage),
        Some(LifecycleStage::Active)
    );
    assert!(assets[0].data.depreciation.is_some());
    assert!(assets[0].data.maintenance_history.is_empty());
    assert_eq!(desk.metrics().total_value, 1000.0);
}

// Scenario: create then rename an asset.
#[tokio::test]
async fn test_rename_asset_scenario() {
    let desk = desk_with(Arc::new(MockRemote::online())).await;
    let created = desk
        .save(AssetData::named("Laptop X"), None)
        .await
        .record()
        .unwrap()
        .clone();

    desk.begin_edit(created.clone()).await;
    let mut draft = created.data.clone();
    draft.name = "Laptop Y".to_string();
    desk.submit(draft).await;

    let assets = desk.list::<AssetData>().await;
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].id, created.id);
    assert_eq!(assets[0].data.name, "Laptop Y");
}

// Scenario: create two assets, delete the first.
#[tokio::test]
async fn test_delete_first_of_two_scenario() {
    let desk = desk_with(Arc::new(MockRemote::online())).await;
    let first = desk.save(AssetData::named("First"), None).await;
    let second = desk.save(AssetData::named("Second"), None).await;

    desk.delete::<AssetData>(&first.record().unwrap().id).await;

    let assets = desk.list::<AssetData>().await;
    assert_eq!(assets.len(), 1);
    assert_eq!(&assets[0], second.record().unwrap());
}
