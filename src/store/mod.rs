//! The entity store: per-kind collections, form sessions, and the
//! `AssetDesk` handle that owns them.

pub mod collection;
pub mod coordinator;
pub mod desk;
pub mod events;
pub mod session;
pub mod state;

pub use collection::EntityCollection;
pub use coordinator::SaveOutcome;
pub use desk::AssetDesk;
pub use events::{StoreChange, StoreEvent};
pub use session::EditingSession;
pub use state::{DeskState, KindSlot};
