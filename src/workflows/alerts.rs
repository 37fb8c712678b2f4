use crate::core::{DeskError, EntityData, Result};
use crate::model::{Alert, AlertData, AlertSettings, AlertSeverity, AlertStatus, AlertType};
use crate::remote::RequestOptions;
use crate::store::{AssetDesk, StoreChange};
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{Instrument, Level, event, info_span};

const SETTINGS_PATH: &str = "/alerts/settings";
const BULK_PATH: &str = "/alerts/bulk";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertAction {
    Acknowledge,
    Resolve,
    Dismiss,
}

impl AlertAction {
    pub fn target_status(&self) -> AlertStatus {
        match self {
            AlertAction::Acknowledge => AlertStatus::Acknowledged,
            AlertAction::Resolve => AlertStatus::Resolved,
            AlertAction::Dismiss => AlertStatus::Dismissed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertTab {
    #[default]
    Active,
    Acknowledged,
    Resolved,
    All,
}

impl AlertTab {
    fn admits(&self, status: AlertStatus) -> bool {
        match self {
            AlertTab::Active => status == AlertStatus::Active,
            AlertTab::Acknowledged => status == AlertStatus::Acknowledged,
            AlertTab::Resolved => status == AlertStatus::Resolved,
            AlertTab::All => true,
        }
    }
}

/// Narrowing applied to the alert list. The empty filter on the `All` tab
/// admits everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertFilter {
    pub tab: AlertTab,
    pub severity: Option<AlertSeverity>,
    pub alert_type: Option<AlertType>,
    pub search: String,
}

impl AlertFilter {
    pub fn all() -> Self {
        Self {
            tab: AlertTab::All,
            ..Default::default()
        }
    }

    pub fn tab(mut self, tab: AlertTab) -> Self {
        self.tab = tab;
        self
    }

    pub fn severity(mut self, severity: AlertSeverity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn alert_type(mut self, alert_type: AlertType) -> Self {
        self.alert_type = Some(alert_type);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn matches(&self, alert: &AlertData) -> bool {
        let term = self.search.to_lowercase();
        self.tab.admits(alert.status)
            && self.severity.is_none_or(|severity| alert.severity == severity)
            && self.alert_type.is_none_or(|kind| alert.alert_type == kind)
            && (term.is_empty()
                || alert.title.to_lowercase().contains(&term)
                || alert.message.to_lowercase().contains(&term))
    }
}

/// Counters shown above the alert list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub active: usize,
    pub acknowledged: usize,
    pub resolved: usize,
    pub critical_active: usize,
    pub active_by_type: Vec<(AlertType, usize)>,
}

impl AlertSummary {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        let count = |status: AlertStatus| {
            alerts
                .iter()
                .filter(|alert| alert.data.status == status)
                .count()
        };
        let active_by_type = AlertType::ALL
            .into_iter()
            .map(|kind| {
                let active = alerts
                    .iter()
                    .filter(|alert| {
                        alert.data.alert_type == kind && alert.data.status == AlertStatus::Active
                    })
                    .count();
                (kind, active)
            })
            .collect();

        Self {
            active: count(AlertStatus::Active),
            acknowledged: count(AlertStatus::Acknowledged),
            resolved: count(AlertStatus::Resolved),
            critical_active: alerts
                .iter()
                .filter(|alert| alert.data.is_critical_active())
                .count(),
            active_by_type,
        }
    }

    pub fn active_of_type(&self, alert_type: AlertType) -> usize {
        self.active_by_type
            .iter()
            .find(|(kind, _)| *kind == alert_type)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

/// What a bulk action did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkOutcome {
    /// Whether the remote accepted the bulk request.
    pub synced: bool,
    pub applied: Vec<String>,
    /// Ids that were missing or whose status does not allow the action.
    pub rejected: Vec<String>,
}

impl AssetDesk {
    pub async fn filtered_alerts(&self, filter: &AlertFilter) -> Vec<Alert> {
        self.read()
            .await
            .collection::<AlertData>()
            .list()
            .iter()
            .filter(|alert| filter.matches(&alert.data))
            .cloned()
            .collect()
    }

    pub async fn alert_summary(&self) -> AlertSummary {
        AlertSummary::from_alerts(self.read().await.collection::<AlertData>().list())
    }

    /// Active -> Acknowledged. Returns `Ok(false)` when the alert does not
    /// exist.
    pub async fn acknowledge_alert(&self, id: &str) -> Result<bool> {
        self.transition_alert(id, AlertStatus::Acknowledged, Utc::now())
            .await
    }

    pub async fn resolve_alert(&self, id: &str) -> Result<bool> {
        self.transition_alert(id, AlertStatus::Resolved, Utc::now())
            .await
    }

    pub async fn dismiss_alert(&self, id: &str) -> Result<bool> {
        self.transition_alert(id, AlertStatus::Dismissed, Utc::now())
            .await
    }

    /// Sends the action to the remote, then applies it locally to every id
    /// whose status allows it.
    ///
    /// The local change is applied even when the remote rejects the action;
    /// check `BulkOutcome::synced` to tell the two apart.
    pub async fn bulk_alert_action(&self, action: AlertAction, ids: &[String]) -> BulkOutcome {
        let span = info_span!("alerts.bulk", action = ?action, count = ids.len());
        let body = json!({ "action": action, "alertIds": ids });
        let synced = match self
            .remote()
            .request(BULK_PATH, RequestOptions::put(Some(body)))
            .instrument(span)
            .await
        {
            Ok(_) => true,
            Err(err) => {
                warn!("remote bulk alert action failed, applying locally: {}", err);
                false
            }
        };

        let now = Utc::now();
        let mut outcome = BulkOutcome {
            synced,
            ..Default::default()
        };
        for id in ids {
            match self.transition_alert(id, action.target_status(), now).await {
                Ok(true) => outcome.applied.push(id.clone()),
                Ok(false) | Err(_) => outcome.rejected.push(id.clone()),
            }
        }
        outcome
    }

    /// Pulls settings from the remote. Current settings are kept when the
    /// remote is unreachable or answers with nothing usable.
    pub async fn load_alert_settings(&self) -> AlertSettings {
        let fetched = match self.remote().fetch(SETTINGS_PATH).await {
            Ok(response) => response
                .data
                .and_then(|data| serde_json::from_value::<AlertSettings>(data).ok()),
            Err(err) => {
                warn!("failed to load alert settings, keeping current: {}", err);
                None
            }
        };

        match fetched {
            Some(settings) => {
                self.set_alert_settings(settings.clone()).await;
                settings
            }
            None => self.alert_settings().await,
        }
    }

    /// Stores new settings locally and pushes them to the remote. Returns
    /// whether the remote accepted them.
    ///
    /// The local settings change even when the remote rejects them.
    pub async fn update_alert_settings(&self, settings: AlertSettings) -> bool {
        let synced = match serde_json::to_value(&settings) {
            Ok(body) => match self
                .remote()
                .request(SETTINGS_PATH, RequestOptions::put(Some(body)))
                .await
            {
                Ok(_) => true,
                Err(err) => {
                    warn!("failed to push alert settings: {}", err);
                    false
                }
            },
            Err(err) => {
                warn!("failed to encode alert settings: {}", err);
                false
            }
        };
        self.set_alert_settings(settings).await;
        synced
    }

    async fn transition_alert(
        &self,
        id: &str,
        next: AlertStatus,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        self.commit::<AlertData, _, _>(|state| {
            let alerts = state.collection_mut::<AlertData>();
            let Some(current) = alerts.get(id).map(|alert| alert.data.status) else {
                return (Ok(false), None);
            };
            if !current.can_transition_to(next) {
                let err = DeskError::InvalidTransition {
                    kind: AlertData::KIND,
                    id: id.to_string(),
                    from: current.to_string(),
                    to: next.to_string(),
                };
                return (Err(err), None);
            }

            alerts.update_with(id, |alert| {
                alert.data.status = next;
                match next {
                    AlertStatus::Acknowledged => alert.data.acknowledged_at = Some(at),
                    AlertStatus::Resolved | AlertStatus::Dismissed => {
                        alert.data.resolved_at = Some(at)
                    }
                    AlertStatus::Active => {}
                }
            });
            event!(Level::DEBUG, id = %id, status = %next, "alert transitioned");
            (Ok(true), Some(StoreChange::Upserted { id: id.to_string() }))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Record;

    fn alert(id: &str, severity: AlertSeverity, status: AlertStatus, title: &str) -> Alert {
        let mut data = AlertData::new(AlertType::SecurityAlert, severity, title, "details");
        data.status = status;
        Record::new(id, data)
    }

    #[test]
    fn test_filter_by_tab_severity_and_search() {
        let critical = alert("1", AlertSeverity::Critical, AlertStatus::Active, "Disk failure");
        let acknowledged = alert("2", AlertSeverity::Info, AlertStatus::Acknowledged, "Patch");

        let filter = AlertFilter::default();
        assert!(filter.matches(&critical.data));
        assert!(!filter.matches(&acknowledged.data));

        let filter = AlertFilter::all().severity(AlertSeverity::Info);
        assert!(!filter.matches(&critical.data));
        assert!(filter.matches(&acknowledged.data));

        let filter = AlertFilter::all().search("DISK");
        assert!(filter.matches(&critical.data));
        assert!(!filter.matches(&acknowledged.data));
    }

    #[test]
    fn test_summary_counts() {
        let alerts = vec![
            alert("1", AlertSeverity::Critical, AlertStatus::Active, "a"),
            alert("2", AlertSeverity::Warning, AlertStatus::Active, "b"),
            alert("3", AlertSeverity::Critical, AlertStatus::Resolved, "c"),
        ];
        let summary = AlertSummary::from_alerts(&alerts);
        assert_eq!(summary.active, 2);
        assert_eq!(summary.resolved, 1);
        assert_eq!(summary.critical_active, 1);
        assert_eq!(summary.active_of_type(AlertType::SecurityAlert), 2);
        assert_eq!(summary.active_of_type(AlertType::CostThreshold), 0);
    }

    #[test]
    fn test_action_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(AlertAction::Acknowledge).unwrap(),
            json!("acknowledge")
        );
    }
}
