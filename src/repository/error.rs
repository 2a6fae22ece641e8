// ==========================================
// Seguimiento - repository layer error types
// ==========================================
// Validation errors are raised before any backend call and are
// never partially applied. Persistence failures surface with no
// assumed local mutation: the caller retries explicitly.
// ==========================================

use thiserror::Error;

use crate::store::StoreError;

/// Repository layer error type.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("record not found: {entity} with id={id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),

    #[error("stored row could not be decoded: {0}")]
    Decode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result alias for the repository layer.
pub type RepositoryResult<T> = Result<T, RepositoryError>;
