// ==========================================
// Seguimiento - backend client seam
// ==========================================
// Trait defined here, adapters implement it (SQLite locally,
// the remote backend in production). Rows cross the boundary
// as JSON objects; domain entities convert via serde.
// ==========================================

use async_trait::async_trait;

use super::error::StoreResult;
use super::query::QuerySpec;

/// One row as returned by the backend.
pub type JsonRow = serde_json::Map<String, serde_json::Value>;

/// Async query/write capability of the external relational store.
///
/// Writes are single-row; `upsert` is insert-if-absent /
/// update-if-present keyed by one conflict column, overwriting
/// every other column (no partial patch).
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Execute a query and return the matching rows.
    async fn select(&self, query: &QuerySpec) -> StoreResult<Vec<JsonRow>>;

    /// Insert one row. Fails with `StoreError::UniqueViolation`
    /// when a uniqueness constraint rejects it.
    async fn insert(&self, table: &str, row: &JsonRow) -> StoreResult<()>;

    /// Total-overwrite upsert keyed by `conflict_column`.
    async fn upsert(&self, table: &str, conflict_column: &str, row: &JsonRow) -> StoreResult<()>;
}
