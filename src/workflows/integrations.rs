use crate::core::EntityKind;
use crate::model::{
    Integration, IntegrationData, IntegrationErrorEntry, IntegrationStatus, IntegrationType,
};
use crate::remote::{Method, RequestOptions};
use crate::seed;
use crate::store::AssetDesk;
use chrono::Utc;
use log::warn;
use serde::Serialize;
use tracing::{Instrument, Level, event, info_span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncResult {
    /// The remote accepted the request and the integration is syncing.
    Started,
    /// The remote refused; the integration is now in error.
    Failed,
    Missing,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationOverview {
    pub discovery_tools: usize,
    pub itsm: usize,
    pub business_systems: usize,
    pub errored: usize,
    pub total: usize,
}

impl IntegrationOverview {
    pub fn from_integrations(integrations: &[Integration]) -> Self {
        let of_type = |kind: IntegrationType| {
            integrations
                .iter()
                .filter(|integration| integration.data.integration_type == kind)
                .count()
        };
        Self {
            discovery_tools: of_type(IntegrationType::DiscoveryTool),
            itsm: of_type(IntegrationType::Itsm),
            business_systems: integrations
                .iter()
                .filter(|integration| integration.data.integration_type.is_business_system())
                .count(),
            errored: integrations
                .iter()
                .filter(|integration| integration.data.status == IntegrationStatus::Error)
                .count(),
            total: integrations.len(),
        }
    }
}

impl AssetDesk {
    /// Reloads integrations, falling back to the sample set when the remote
    /// has nothing and no integrations are stored locally.
    pub async fn load_integrations(&self) -> IntegrationOverview {
        if !self.refresh::<IntegrationData>().await {
            self.seed_if_empty(seed::integrations(Utc::now())).await;
        }
        self.integration_overview().await
    }

    pub async fn integration_overview(&self) -> IntegrationOverview {
        IntegrationOverview::from_integrations(
            self.read().await.collection::<IntegrationData>().list(),
        )
    }

    /// Asks the remote to sync integration `id`.
    ///
    /// On success the integration shows `Syncing` with a fresh `lastSync`, and
    /// when `sync_settle` is configured a background task flips it back to
    /// `Active` after that delay. On failure it moves to `Error` and the
    /// failure is appended to its error log.
    pub async fn sync_integration(&self, id: &str) -> SyncResult {
        if self.get::<IntegrationData>(id).await.is_none() {
            return SyncResult::Missing;
        }

        let span = info_span!("integration.sync", id = %id);
        let path = format!("{}/{}/sync", EntityKind::Integration.remote_path(), id);
        let result = self
            .remote()
            .request(&path, RequestOptions::new(Method::Post))
            .instrument(span)
            .await;

        let now = Utc::now();
        match result {
            Ok(_) => {
                let updated = self
                    .update_with::<IntegrationData, _>(id, |integration| {
                        integration.data.status = IntegrationStatus::Syncing;
                        integration.data.last_sync = Some(now);
                    })
                    .await;
                if updated.is_none() {
                    return SyncResult::Missing;
                }
                if let Some(settle) = self.config().sync_settle {
                    let desk = self.clone();
                    let id = id.to_string();
                    tokio::spawn(async move {
                        tokio::time::sleep(settle).await;
                        desk.finish_sync(&id).await;
                    });
                }
                event!(Level::INFO, id = %id, "integration sync started");
                SyncResult::Started
            }
            Err(err) => {
                warn!("integration sync failed: id='{}' error='{}'", id, err);
                let details = err.to_string();
                let updated = self
                    .update_with::<IntegrationData, _>(id, |integration| {
                        integration.data.status = IntegrationStatus::Error;
                        integration.data.error_log.push(IntegrationErrorEntry {
                            timestamp: now,
                            error: "Sync failed".to_string(),
                            details,
                            resolved: false,
                        });
                    })
                    .await;
                match updated {
                    Some(_) => SyncResult::Failed,
                    None => SyncResult::Missing,
                }
            }
        }
    }

    /// Completes a sync: `Syncing` becomes `Active`, any other status is left
    /// alone. Returns whether the status changed.
    pub async fn finish_sync(&self, id: &str) -> bool {
        let syncing = self
            .get::<IntegrationData>(id)
            .await
            .is_some_and(|integration| integration.data.status == IntegrationStatus::Syncing);
        if !syncing {
            return false;
        }
        self.update_with::<IntegrationData, _>(id, |integration| {
            if integration.data.status == IntegrationStatus::Syncing {
                integration.data.status = IntegrationStatus::Active;
            }
        })
        .await
        .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Record;

    fn integration(id: &str, kind: IntegrationType, status: IntegrationStatus) -> Integration {
        Record::new(
            id,
            IntegrationData {
                name: id.to_string(),
                integration_type: kind,
                status,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_overview_groups_types() {
        let integrations = vec![
            integration("sccm", IntegrationType::DiscoveryTool, IntegrationStatus::Active),
            integration("lansweeper", IntegrationType::DiscoveryTool, IntegrationStatus::Error),
            integration("snow", IntegrationType::Itsm, IntegrationStatus::Active),
            integration("workday", IntegrationType::HrSystem, IntegrationStatus::Inactive),
            integration("sap", IntegrationType::Financial, IntegrationStatus::Active),
            integration("cmdb", IntegrationType::Cmdb, IntegrationStatus::Active),
        ];

        let overview = IntegrationOverview::from_integrations(&integrations);
        assert_eq!(overview.discovery_tools, 2);
        assert_eq!(overview.itsm, 1);
        assert_eq!(overview.business_systems, 2);
        assert_eq!(overview.errored, 1);
        assert_eq!(overview.total, 6);
    }
}
