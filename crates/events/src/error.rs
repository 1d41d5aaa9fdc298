//! Event and audit log errors

use thiserror::Error;

/// Errors from the event/audit surface
#[derive(Debug, Error)]
pub enum EventError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Result type for event operations
pub type EventResult<T> = Result<T, EventError>;
