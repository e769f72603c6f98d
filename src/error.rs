//! Error types shared by the store and sync layers.

use thiserror::Error;

/// Errors raised by the local store, import/export and the remote synchronizer.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the contents API (404 is handled by the caller).
    #[error("remote API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode remote content: {0}")]
    Decode(String),

    #[error("invalid import: {0}")]
    InvalidImport(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
