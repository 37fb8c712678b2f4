//! Operations layered on the store for alerts, compliance and integrations.
//!
//! Each submodule extends [`AssetDesk`](crate::store::AssetDesk) with the
//! workflow's methods and defines the read-side views it needs.

pub mod alerts;
pub mod compliance;
pub mod integrations;

pub use alerts::{AlertAction, AlertFilter, AlertSummary, AlertTab, BulkOutcome};
pub use compliance::ComplianceReport;
pub use integrations::{IntegrationOverview, SyncResult};
