//! Error types for remote API calls

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    /// Transport failure (connect, timeout, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Remote endpoint could not be reached
    #[error("Remote unreachable: {0}")]
    Unreachable(String),

    /// No remote is configured; the desk runs on local state only
    #[error("Remote API not configured")]
    Offline,
}

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;
