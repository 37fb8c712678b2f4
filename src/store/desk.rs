use super::{DeskState, EditingSession, StoreChange, StoreEvent};
use crate::config::DeskConfig;
use crate::core::{EntityData, EntityKind, Record, Result};
use crate::metrics::DashboardMetrics;
use crate::model::{
    AccessoryData, AlertData, AlertSettings, AnyRecord, AssetData, ComplianceCheckData,
    ComponentData, ConsumableData, IntegrationData, KitData, LicenseData, PolicyViolationData,
    RequestableItemData, UserData,
};
use crate::remote::{OfflineRemote, RemoteApi};
use crate::seed;
use crate::storage::{self, LocalStorage, MemoryStorage};
use chrono::Utc;
use log::warn;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, broadcast, watch};
use tracing::{Instrument, Level, event, info_span};

const EVENT_CAPACITY: usize = 256;

/// Expands `$body` once per kind with `$data` bound to that kind's attribute
/// type, selecting the arm for the runtime `$kind`.
macro_rules! with_kind {
    ($kind:expr, $data:ident => $body:expr) => {
        match $kind {
            EntityKind::Asset => {
                type $data = AssetData;
                $body
            }
            EntityKind::License => {
                type $data = LicenseData;
                $body
            }
            EntityKind::Accessory => {
                type $data = AccessoryData;
                $body
            }
            EntityKind::Consumable => {
                type $data = ConsumableData;
                $body
            }
            EntityKind::Component => {
                type $data = ComponentData;
                $body
            }
            EntityKind::Kit => {
                type $data = KitData;
                $body
            }
            EntityKind::RequestableItem => {
                type $data = RequestableItemData;
                $body
            }
            EntityKind::User => {
                type $data = UserData;
                $body
            }
            EntityKind::Alert => {
                type $data = AlertData;
                $body
            }
            EntityKind::Integration => {
                type $data = IntegrationData;
                $body
            }
            EntityKind::ComplianceCheck => {
                type $data = ComplianceCheckData;
                $body
            }
            EntityKind::PolicyViolation => {
                type $data = PolicyViolationData;
                $body
            }
        }
    };
}
pub(crate) const ALERT_SETTINGS_KEY: &str = "alert_settings";

/// Handle to the desk state.
///
/// Cloning is cheap; every clone talks to the same collections. All mutations
/// go through this type so that local storage, metrics and subscribers stay in
/// step with the collections.
#[derive(Clone)]
pub struct AssetDesk {
    inner: Arc<DeskInner>,
}

struct DeskInner {
    state: RwLock<DeskState>,
    remote: Arc<dyn RemoteApi>,
    storage: Arc<dyn LocalStorage>,
    events: broadcast::Sender<StoreEvent>,
    metrics: watch::Sender<DashboardMetrics>,
    config: DeskConfig,
}

impl AssetDesk {
    /// Loads every collection from `storage`. When nothing is stored and
    /// `seed_samples` is set, the sample data set is installed and persisted.
    pub async fn open(
        config: DeskConfig,
        remote: Arc<dyn RemoteApi>,
        storage: Arc<dyn LocalStorage>,
    ) -> Result<Self> {
        let span = info_span!("desk.open", seed_samples = config.seed_samples);
        let state = load_state(storage.as_ref(), config.seed_samples)
            .instrument(span)
            .await?;
        Ok(Self::from_parts(config, remote, storage, state))
    }

    /// Builds the remote and storage described by `config` and opens the desk.
    pub async fn from_config(config: DeskConfig) -> Result<Self> {
        let remote = config.remote()?;
        let storage = config.storage()?;
        Self::open(config, remote, storage).await
    }

    /// An empty desk with no remote and nothing persisted beyond the process.
    pub fn in_memory() -> Self {
        Self::from_parts(
            DeskConfig::default().seed_samples(false),
            Arc::new(OfflineRemote),
            Arc::new(MemoryStorage::new()),
            DeskState::default(),
        )
    }

    fn from_parts(
        config: DeskConfig,
        remote: Arc<dyn RemoteApi>,
        storage: Arc<dyn LocalStorage>,
        state: DeskState,
    ) -> Self {
        let metrics = DashboardMetrics::compute(&state, Utc::now().date_naive());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (metrics, _) = watch::channel(metrics);
        Self {
            inner: Arc::new(DeskInner {
                state: RwLock::new(state),
                remote,
                storage,
                events,
                metrics,
                config,
            }),
        }
    }

    pub fn config(&self) -> &DeskConfig {
        &self.inner.config
    }

    pub(crate) fn remote(&self) -> &dyn RemoteApi {
        self.inner.remote.as_ref()
    }

    pub(crate) fn storage(&self) -> &dyn LocalStorage {
        self.inner.storage.as_ref()
    }

    /// Read access to the whole state. Do not hold the guard across a call
    /// that mutates the desk.
    pub async fn read(&self) -> RwLockReadGuard<'_, DeskState> {
        self.inner.state.read().await
    }

    pub async fn list<D: EntityData>(&self) -> Vec<Record<D>> {
        self.read().await.collection::<D>().list().to_vec()
    }

    pub async fn get<D: EntityData>(&self, id: &str) -> Option<Record<D>> {
        self.read().await.collection::<D>().get(id).cloned()
    }

    pub async fn len<D: EntityData>(&self) -> usize {
        self.read().await.collection::<D>().len()
    }

    /// Ids of records of kind `D` that exist only locally.
    pub async fn pending_sync<D: EntityData>(&self) -> Vec<String> {
        self.read()
            .await
            .collection::<D>()
            .pending_sync()
            .iter()
            .cloned()
            .collect()
    }

    pub async fn session<D: EntityData>(&self) -> EditingSession<D> {
        self.read().await.session::<D>().clone()
    }

    pub async fn visible_forms(&self) -> Vec<EntityKind> {
        let state = self.read().await;
        EntityKind::ALL
            .into_iter()
            .filter(|kind| state.is_form_visible(*kind))
            .collect()
    }

    /// Records of a kind chosen at runtime, each carrying its kind tag.
    pub async fn list_any(&self, kind: EntityKind) -> Vec<AnyRecord> {
        with_kind!(kind, D => self
            .list::<D>()
            .await
            .into_iter()
            .map(Record::into_any)
            .collect())
    }

    pub async fn get_any(&self, kind: EntityKind, id: &str) -> Option<AnyRecord> {
        with_kind!(kind, D => self.get::<D>(id).await.map(Record::into_any))
    }

    pub async fn delete_any(&self, kind: EntityKind, id: &str) -> bool {
        with_kind!(kind, D => self.delete::<D>(id).await)
    }

    pub async fn pending_sync_any(&self, kind: EntityKind) -> Vec<String> {
        with_kind!(kind, D => self.pending_sync::<D>().await)
    }

    pub async fn begin_create<D: EntityData>(&self) {
        self.inner.state.write().await.session_mut::<D>().begin_create();
    }

    pub async fn begin_edit<D: EntityData>(&self, record: Record<D>) {
        self.inner
            .state
            .write()
            .await
            .session_mut::<D>()
            .begin_edit(record);
    }

    /// Opens the edit form matching the record's kind tag.
    pub async fn begin_edit_any(&self, record: AnyRecord) -> EntityKind {
        let kind = record.kind();
        match record {
            AnyRecord::Asset(r) => self.begin_edit(r).await,
            AnyRecord::License(r) => self.begin_edit(r).await,
            AnyRecord::Accessory(r) => self.begin_edit(r).await,
            AnyRecord::Consumable(r) => self.begin_edit(r).await,
            AnyRecord::Component(r) => self.begin_edit(r).await,
            AnyRecord::Kit(r) => self.begin_edit(r).await,
            AnyRecord::RequestableItem(r) => self.begin_edit(r).await,
            AnyRecord::User(r) => self.begin_edit(r).await,
            AnyRecord::Alert(r) => self.begin_edit(r).await,
            AnyRecord::Integration(r) => self.begin_edit(r).await,
            AnyRecord::ComplianceCheck(r) => self.begin_edit(r).await,
            AnyRecord::PolicyViolation(r) => self.begin_edit(r).await,
        }
        kind
    }

    pub async fn cancel<D: EntityData>(&self) {
        self.inner.state.write().await.session_mut::<D>().close();
    }

    /// Removes the record locally after a best-effort remote delete. Returns
    /// whether a record was removed.
    pub async fn delete<D: EntityData>(&self, id: &str) -> bool {
        let span = info_span!("desk.delete", kind = %D::KIND, id = %id);
        let remote_result = self.inner.remote.delete(D::KIND, id).instrument(span).await;
        if let Err(err) = remote_result {
            warn!(
                "remote delete failed, removing locally: kind='{}' id='{}' error='{}'",
                D::KIND,
                id,
                err
            );
        }

        self.commit::<D, _, _>(|state| {
            let removed = state.collection_mut::<D>().remove(id);
            let change = removed.then(|| StoreChange::Removed { id: id.to_string() });
            (removed, change)
        })
        .await
    }

    /// Reloads kind `D` from the remote. Records that only exist locally are
    /// kept, as are local copies of records whose update never reached the
    /// remote. Returns `false` and leaves the collection untouched when the
    /// remote cannot be read.
    pub async fn refresh<D: EntityData>(&self) -> bool {
        let fetched = match self.inner.remote.fetch(D::KIND.remote_path()).await {
            Ok(response) => response.records::<D>(),
            Err(err) => Err(err),
        };
        let server_records = match fetched {
            Ok(records) => records,
            Err(err) => {
                warn!("refresh failed, keeping local {}: {}", D::KIND.storage_key(), err);
                return false;
            }
        };

        self.commit::<D, _, _>(|state| {
            let collection = state.collection_mut::<D>();
            let local_only: Vec<Record<D>> = collection
                .list()
                .iter()
                .filter(|record| collection.is_pending(&record.id))
                .cloned()
                .collect();
            let pending_ids = local_only.iter().map(|record| record.id.clone()).collect();

            collection.replace_all(server_records);
            for record in local_only {
                collection.upsert(record);
            }
            collection.restore_pending(pending_ids);

            let count = collection.len();
            (true, Some(StoreChange::Replaced { count }))
        })
        .await
    }

    /// Applies `f` to the record with `id` locally. Absent ids are a no-op.
    pub async fn update_with<D, F>(&self, id: &str, f: F) -> Option<Record<D>>
    where
        D: EntityData,
        F: FnOnce(&mut Record<D>) + Send,
    {
        self.commit::<D, _, _>(|state| {
            let updated = state.collection_mut::<D>().update_with(id, f).cloned();
            let change = updated
                .as_ref()
                .map(|record| StoreChange::Upserted { id: record.id.clone() });
            (updated, change)
        })
        .await
    }

    /// Installs `records` as kind `D` when that collection is empty. Returns
    /// whether anything was installed.
    pub(crate) async fn seed_if_empty<D: EntityData>(&self, records: Vec<Record<D>>) -> bool {
        self.commit::<D, _, _>(|state| {
            let collection = state.collection_mut::<D>();
            if !collection.is_empty() || records.is_empty() {
                return (false, None);
            }
            collection.replace_all(records);
            let count = collection.len();
            (true, Some(StoreChange::Replaced { count }))
        })
        .await
    }

    pub async fn alert_settings(&self) -> AlertSettings {
        self.read().await.alert_settings.clone()
    }

    pub(crate) async fn set_alert_settings(&self, settings: AlertSettings) {
        let mut state = self.inner.state.write().await;
        state.alert_settings = settings;
        match serde_json::to_value(&state.alert_settings) {
            Ok(value) => {
                if let Err(err) = self.storage().save_value(ALERT_SETTINGS_KEY, value).await {
                    warn!("failed to persist alert settings: {}", err);
                }
            }
            Err(err) => warn!("failed to encode alert settings: {}", err),
        }
        self.publish_metrics(&state);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.inner.events.subscribe()
    }

    /// Metrics as of the last mutation.
    pub fn metrics(&self) -> DashboardMetrics {
        self.inner.metrics.borrow().clone()
    }

    pub fn watch_metrics(&self) -> watch::Receiver<DashboardMetrics> {
        self.inner.metrics.subscribe()
    }

    /// Runs `f` under the write lock. When it reports a change, kind `D` is
    /// mirrored to storage, metrics are recomputed and the change is
    /// published, all before the lock is released.
    pub(crate) async fn commit<D, R, F>(&self, f: F) -> R
    where
        D: EntityData,
        R: Send,
        F: FnOnce(&mut DeskState) -> (R, Option<StoreChange>) + Send,
    {
        let mut state = self.inner.state.write().await;
        let (result, change) = f(&mut state);

        if let Some(change) = change {
            persist_kind::<D>(&state, self.storage()).await;
            self.publish_metrics(&state);
            // No subscribers is fine.
            let _ = self.inner.events.send(StoreEvent {
                kind: D::KIND,
                change,
            });
        }
        result
    }

    fn publish_metrics(&self, state: &DeskState) {
        let metrics = DashboardMetrics::compute(state, Utc::now().date_naive());
        self.inner.metrics.send_replace(metrics);
    }
}

async fn load_state(store: &dyn LocalStorage, seed_samples: bool) -> Result<DeskState> {
    let mut state = DeskState::default();
    load_kind::<AssetData>(&mut state, store).await;
    load_kind::<LicenseData>(&mut state, store).await;
    load_kind::<AccessoryData>(&mut state, store).await;
    load_kind::<ConsumableData>(&mut state, store).await;
    load_kind::<ComponentData>(&mut state, store).await;
    load_kind::<KitData>(&mut state, store).await;
    load_kind::<RequestableItemData>(&mut state, store).await;
    load_kind::<UserData>(&mut state, store).await;
    load_kind::<AlertData>(&mut state, store).await;
    load_kind::<IntegrationData>(&mut state, store).await;
    load_kind::<ComplianceCheckData>(&mut state, store).await;
    load_kind::<PolicyViolationData>(&mut state, store).await;
    state.alert_settings = load_alert_settings(store).await;

    if state.is_empty() && seed_samples {
        seed::populate(&mut state, Utc::now().date_naive());
        persist_all(&state, store).await?;
        event!(Level::INFO, "seeded sample data");
    }

    event!(Level::DEBUG, "desk opened");
    Ok(state)
}

async fn load_kind<D: EntityData>(state: &mut DeskState, storage: &dyn LocalStorage) {
    let key = D::KIND.storage_key();
    let records: Vec<Record<D>> = storage::load_list(storage, key, Vec::new()).await;
    let pending: Vec<String> = storage::load_list(storage, &D::KIND.pending_key(), Vec::new()).await;

    let collection = state.collection_mut::<D>();
    collection.replace_all(records);
    collection.restore_pending(pending);
}

async fn load_alert_settings(storage: &dyn LocalStorage) -> AlertSettings {
    match storage.load_value(ALERT_SETTINGS_KEY).await {
        Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|err| {
            warn!("stored alert settings are malformed, using defaults: {}", err);
            AlertSettings::default()
        }),
        Ok(None) => AlertSettings::default(),
        Err(err) => {
            warn!("failed to load alert settings: {}", err);
            AlertSettings::default()
        }
    }
}

async fn save_kind<D: EntityData>(state: &DeskState, storage: &dyn LocalStorage) -> Result<()> {
    let collection = state.collection::<D>();
    storage::save_list(storage, D::KIND.storage_key(), collection.list()).await?;
    let pending: Vec<&String> = collection.pending_sync().iter().collect();
    storage::save_list(storage, &D::KIND.pending_key(), &pending).await
}

async fn persist_kind<D: EntityData>(state: &DeskState, storage: &dyn LocalStorage) {
    if let Err(err) = save_kind::<D>(state, storage).await {
        warn!(
            "failed to mirror {} to local storage: {}",
            D::KIND.storage_key(),
            err
        );
    }
}

async fn persist_all(state: &DeskState, storage: &dyn LocalStorage) -> Result<()> {
    save_kind::<AssetData>(state, storage).await?;
    save_kind::<LicenseData>(state, storage).await?;
    save_kind::<AccessoryData>(state, storage).await?;
    save_kind::<ConsumableData>(state, storage).await?;
    save_kind::<ComponentData>(state, storage).await?;
    save_kind::<KitData>(state, storage).await?;
    save_kind::<RequestableItemData>(state, storage).await?;
    save_kind::<UserData>(state, storage).await?;
    save_kind::<AlertData>(state, storage).await?;
    save_kind::<IntegrationData>(state, storage).await?;
    save_kind::<ComplianceCheckData>(state, storage).await?;
    save_kind::<PolicyViolationData>(state, storage).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MockRemote;
    use serde_json::json;

    #[tokio::test]
    async fn test_open_seeds_only_when_empty() {
        let storage = Arc::new(MemoryStorage::new());
        let desk = AssetDesk::open(
            DeskConfig::default(),
            Arc::new(OfflineRemote),
            storage.clone(),
        )
        .await
        .unwrap();
        assert!(desk.len::<AssetData>().await > 0);
        assert!(storage.keys().await.contains(&"assets".to_string()));

        let empty = AssetDesk::open(
            DeskConfig::default().seed_samples(false),
            Arc::new(OfflineRemote),
            Arc::new(MemoryStorage::new()),
        )
        .await
        .unwrap();
        assert_eq!(empty.len::<AssetData>().await, 0);
    }

    #[tokio::test]
    async fn test_refresh_keeps_local_only_records() {
        let remote = Arc::new(MockRemote::unreachable());
        let desk = AssetDesk::open(
            DeskConfig::default().seed_samples(false),
            remote.clone(),
            Arc::new(MemoryStorage::new()),
        )
        .await
        .unwrap();

        let outcome = desk.save(AssetData::named("Offline laptop"), None).await;
        let local_id = outcome.record().unwrap().id.clone();
        assert!(!desk.refresh::<AssetData>().await);

        remote.set_fixture("/assets", json!([{ "id": "srv-1", "name": "Server laptop" }]));
        remote.set_mode(crate::remote::MockMode::Online);
        assert!(desk.refresh::<AssetData>().await);

        let ids: Vec<String> = desk
            .list::<AssetData>()
            .await
            .into_iter()
            .map(|record| record.id)
            .collect();
        assert_eq!(ids, vec!["srv-1".to_string(), local_id.clone()]);
        assert_eq!(desk.pending_sync::<AssetData>().await, vec![local_id]);
    }

    #[tokio::test]
    async fn test_begin_edit_any_uses_kind_tag() {
        let desk = AssetDesk::in_memory();
        let record = Record::new("l1", LicenseData::default()).into_any();

        let kind = desk.begin_edit_any(record).await;

        assert_eq!(kind, EntityKind::License);
        assert_eq!(desk.visible_forms().await, vec![EntityKind::License]);
        assert!(!desk.session::<AssetData>().await.is_visible());
    }
}
