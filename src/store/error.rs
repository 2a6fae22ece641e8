// ==========================================
// Seguimiento - store layer error type
// ==========================================
// thiserror derive; constraint violations are classified from
// the backend's message text so callers can distinguish a lost
// insert-if-absent race from a genuine failure.
// ==========================================

use thiserror::Error;

/// Store layer error type.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store connection failed: {0}")]
    Connection(String),

    #[error("store lock unavailable: {0}")]
    Lock(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("column {column} could not be decoded: {message}")]
    Decode { column: String, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    StoreError::UniqueViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    StoreError::ForeignKeyViolation(msg)
                } else {
                    StoreError::Query(msg)
                }
            }
            _ => StoreError::Query(err.to_string()),
        }
    }
}

/// Result alias for the store layer.
pub type StoreResult<T> = Result<T, StoreError>;
