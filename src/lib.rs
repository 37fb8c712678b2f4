// ============================================================================
// AssetDesk Library
// ============================================================================

pub mod config;
pub mod core;
pub mod health;
pub mod metrics;
pub mod model;
pub mod remote;
pub mod seed;
pub mod storage;
pub mod store;
pub mod workflows;

// Re-export main types for convenience
pub use config::DeskConfig;
pub use core::{DeskError, EntityData, EntityKind, Record, Result};
pub use health::{ConnectionStatus, check_connection};
pub use metrics::DashboardMetrics;
pub use model::AnyRecord;
pub use store::{AssetDesk, EditingSession, SaveOutcome, StoreChange, StoreEvent};
