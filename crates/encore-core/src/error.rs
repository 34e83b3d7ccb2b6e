//! Error types for Encore

use thiserror::Error;

/// Core error type
///
/// Runtime operations never hand these to callers; they are logged at the
/// public boundary and the operation degrades. Loading APIs return them.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Unknown track: {0}")]
    UnknownTrack(String),

    #[error("Unknown sound: {0}")]
    UnknownSound(String),

    #[error("Unknown snapshot: {0}")]
    UnknownSnapshot(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Duplicate name: {0}")]
    DuplicateName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias
pub type AudioResult<T> = Result<T, AudioError>;
