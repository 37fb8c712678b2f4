pub mod entity;
pub mod error;

pub use entity::{EntityData, EntityKind, Record};
pub use error::{DeskError, Result};
