//! Error types for the Fellah core library.

use thiserror::Error;

use crate::db::DatabaseError;
use crate::model::ApplicationStatus;

/// Result type alias using the Fellah core [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Fellah operations.
///
/// Every variant maps to a localized user-facing message at the point of
/// the action that triggered it; none is fatal to the process.
#[derive(Debug, Error)]
pub enum Error {
    /// A required identity field or document category is missing or malformed
    /// at submission time. `field` is a stable key the UI localizes.
    #[error("validation failed: {field}")]
    Validation { field: String },

    /// Status mutation on an unknown record id.
    #[error("application {id} not found")]
    NotFound { id: String },

    /// Status mutation on a record whose status is already terminal.
    #[error("application {id} is already {status}")]
    TerminalStatus {
        id: String,
        status: ApplicationStatus,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage error
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Convenience constructor for a missing/invalid field.
    pub fn validation(field: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
        }
    }
}
