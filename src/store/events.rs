use crate::core::EntityKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    Upserted { id: String },
    Removed { id: String },
    /// The whole collection was reloaded.
    Replaced { count: usize },
}

/// Published after every committed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEvent {
    pub kind: EntityKind,
    pub change: StoreChange,
}
