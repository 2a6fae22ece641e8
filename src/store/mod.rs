// ==========================================
// Seguimiento - store layer
// ==========================================
// The narrow relational-query capability this core consumes:
// equality/IN filters, single-column sort, offset+limit ranges
// and column projection. The backend itself is external; the
// SQLite adapter serves local deployments and the test suites.
// ==========================================

pub mod client;
pub mod error;
pub mod query;
pub mod row;
pub mod sqlite;

pub use client::{JsonRow, StoreClient};
pub use error::{StoreError, StoreResult};
pub use query::{Filter, QuerySpec, RowRange, SortDir};
pub use sqlite::SqliteStore;
