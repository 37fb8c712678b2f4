use crate::core::EntityKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Remote error: {0}")]
    Remote(#[from] crate::remote::RemoteError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid {kind} transition for '{id}': {from} -> {to}")]
    InvalidTransition {
        kind: EntityKind,
        id: String,
        from: String,
        to: String,
    },

    #[error("Unknown entity kind '{0}'")]
    UnknownKind(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, DeskError>;

impl DeskError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

impl From<serde_json::Error> for DeskError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
