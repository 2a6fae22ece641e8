// ==========================================
// Seguimiento de Solicitudes - core library
// ==========================================
// Request/work-order lifecycle tracking plus the unified
// consumption ledger over consumable issuances and asset
// assignments. Persistence is delegated to an external
// relational store consumed through the `store` seam.
// ==========================================

// domain layer - entities and types
pub mod domain;

// store layer - query value objects + backend client seam
pub mod store;

// engine layer - fetch/lookup/aggregation/statistics/export
pub mod engine;

// repository layer - tracking state + audit journal
pub mod repository;

// api layer - validated facade for the tracking views
pub mod api;

// fetch/export limit knobs
pub mod config;

// logging setup
pub mod logging;

// ==========================================
// Re-exports
// ==========================================

// domain types
pub use domain::{
    AuditEntry, ConsumptionRecord, ConsumptionSource, RequestCategory, StatusCounts,
    TrackingState, TrackingStatus,
};

// store seam
pub use store::{Filter, JsonRow, QuerySpec, SortDir, SqliteStore, StoreClient};

// engines
pub use engine::{
    BatchedFetcher, ChangeNotifier, ChunkedLookup, ConsumptionAggregator, CsvSink, ExportEngine,
    ExportSink, StatisticsEngine, TrackingChanged,
};

// repositories
pub use repository::{AuditJournal, RepositoryError, TrackingStore};

// api
pub use api::{ApiError, TrackingApi};

// config
pub use config::FetchLimits;

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Seguimiento de Solicitudes";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
