use thiserror::Error;

use crate::services::StoreError;

/// Errors surfaced by the matching and booking operations
#[derive(Debug, Error)]
pub enum CourierError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    /// The store could not be reached; callers may retry
    #[error("Service temporarily unavailable: {0}")]
    Transient(String),
}

impl CourierError {
    pub fn not_found(entity: &str) -> Self {
        CourierError::NotFound(format!("{} not found", entity))
    }

    /// Short machine-readable kind, used as the `error` field of responses
    pub fn kind(&self) -> &'static str {
        match self {
            CourierError::NotFound(_) => "not_found",
            CourierError::Conflict(_) => "conflict",
            CourierError::Validation(_) => "validation_failed",
            CourierError::Transient(_) => "unavailable",
        }
    }
}

impl From<StoreError> for CourierError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { .. } => {
                CourierError::Conflict("Booking already exists".to_string())
            }
            StoreError::UniqueViolation(message) => CourierError::Conflict(message),
            StoreError::Rejected(message) => CourierError::Validation(message),
            StoreError::Unavailable(message) => CourierError::Transient(message),
            StoreError::Migration(e) => CourierError::Transient(e.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for CourierError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CourierError::Validation(errors.to_string())
    }
}
