use crate::core::EntityKind;
use crate::model::{
    ComplianceCheck, ComplianceCheckData, ComplianceStatus, ComplianceType, PolicyViolation,
    PolicyViolationData, ViolationStatus,
};
use crate::remote::RequestOptions;
use crate::seed;
use crate::store::AssetDesk;
use chrono::Utc;
use log::warn;
use serde::Serialize;

/// Compliance posture derived from checks and violations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    /// Percentage of compliant checks; 100 when there are no checks.
    pub overall_score: f64,
    pub type_scores: Vec<(ComplianceType, f64)>,
    pub compliant_checks: usize,
    pub total_checks: usize,
    pub open_violations: usize,
    pub critical_open_violations: usize,
}

impl ComplianceReport {
    pub fn build(checks: &[ComplianceCheck], violations: &[PolicyViolation]) -> Self {
        let type_scores = ComplianceType::ALL
            .into_iter()
            .map(|kind| {
                let of_type: Vec<&ComplianceCheckData> = checks
                    .iter()
                    .map(|check| &check.data)
                    .filter(|check| check.check_type == kind)
                    .collect();
                (kind, score(of_type))
            })
            .collect();

        Self {
            overall_score: score(checks.iter().map(|check| &check.data).collect()),
            type_scores,
            compliant_checks: checks
                .iter()
                .filter(|check| check.data.status == ComplianceStatus::Compliant)
                .count(),
            total_checks: checks.len(),
            open_violations: violations
                .iter()
                .filter(|violation| violation.data.is_open())
                .count(),
            critical_open_violations: violations
                .iter()
                .filter(|violation| violation.data.is_critical_open())
                .count(),
        }
    }

    pub fn score_for(&self, kind: ComplianceType) -> f64 {
        self.type_scores
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map(|(_, score)| *score)
            .unwrap_or(100.0)
    }
}

fn score(checks: Vec<&ComplianceCheckData>) -> f64 {
    if checks.is_empty() {
        return 100.0;
    }
    let compliant = checks
        .iter()
        .filter(|check| check.status == ComplianceStatus::Compliant)
        .count();
    compliant as f64 / checks.len() as f64 * 100.0
}

impl AssetDesk {
    /// Reloads checks and violations concurrently. A kind that cannot be
    /// loaded keeps its local records, or gets the sample set when it has
    /// none.
    pub async fn load_compliance(&self) -> ComplianceReport {
        let (checks_loaded, violations_loaded) = futures::join!(
            self.refresh::<ComplianceCheckData>(),
            self.refresh::<PolicyViolationData>()
        );

        let now = Utc::now();
        if !checks_loaded {
            self.seed_if_empty(seed::compliance_checks(now)).await;
        }
        if !violations_loaded {
            self.seed_if_empty(seed::policy_violations(now)).await;
        }
        self.compliance_report().await
    }

    pub async fn compliance_report(&self) -> ComplianceReport {
        let state = self.read().await;
        ComplianceReport::build(
            state.collection::<ComplianceCheckData>().list(),
            state.collection::<PolicyViolationData>().list(),
        )
    }

    /// Marks a violation resolved. The remote is told first; the local record
    /// is resolved either way. Returns `false` when the id is unknown.
    pub async fn resolve_violation(&self, id: &str) -> bool {
        let path = format!("{}/{}/resolve", EntityKind::PolicyViolation.remote_path(), id);
        if let Err(err) = self.remote().request(&path, RequestOptions::put(None)).await {
            warn!(
                "failed to resolve violation via remote, updating locally: id='{}' error='{}'",
                id, err
            );
        }

        let resolved_at = Utc::now();
        self.update_with::<PolicyViolationData, _>(id, |violation| {
            violation.data.status = ViolationStatus::Resolved;
            violation.data.resolved_date = Some(resolved_at);
        })
        .await
        .is_some()
    }
}
