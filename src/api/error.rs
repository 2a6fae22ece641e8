// ==========================================
// Seguimiento - api layer error types
// ==========================================
// Converts repository and engine errors into messages suitable
// for the transient notification surface. Nothing here is fatal
// to the process; every action may be retried by the user.
// ==========================================

use thiserror::Error;

use crate::engine::{AggregationError, ExportError, FetchError};
use crate::repository::RepositoryError;

/// API layer error type.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("data access failed: {0}")]
    Database(String),

    #[error("aggregation failed: {0}")]
    Aggregation(String),

    #[error("export failed: {0}")]
    Export(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Validation(msg) => ApiError::Validation(msg),
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})", entity, id))
            }
            RepositoryError::Persistence(e) => ApiError::Database(e.to_string()),
            RepositoryError::Decode(msg) => ApiError::Internal(msg),
            RepositoryError::Other(e) => ApiError::Other(e),
        }
    }
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        // an aborted batch fetch is "unknown state", surfaced as a
        // data-access failure, never mistaken for an empty result
        ApiError::Database(err.to_string())
    }
}

impl From<AggregationError> for ApiError {
    fn from(err: AggregationError) -> Self {
        ApiError::Aggregation(err.to_string())
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        ApiError::Export(err.to_string())
    }
}

/// Result alias for the api layer.
pub type ApiResult<T> = Result<T, ApiError>;
