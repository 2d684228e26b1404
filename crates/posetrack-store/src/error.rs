//! Store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur at the persistence gateway.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Unexpected store response: {0}")]
    InvalidResponse(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

impl StoreError {
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId(id.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}
