// ==========================================
// Seguimiento - engine layer
// ==========================================
// The working parts of the tracking pages: batched fetch over
// the backend's page cap, chunked reference lookups under the
// IN-list limit, the two-source consumption aggregator, status
// statistics, exports and the change broadcast.
// ==========================================

pub mod aggregator;
pub mod batch_fetch;
pub mod chunk_lookup;
pub mod error;
pub mod events;
pub mod export;
pub mod money;
pub mod statistics;

pub use aggregator::ConsumptionAggregator;
pub use batch_fetch::BatchedFetcher;
pub use chunk_lookup::ChunkedLookup;
pub use error::{AggregationError, ExportError, FetchError};
pub use events::{ChangeNotifier, TrackingChanged};
pub use export::{CsvSink, ExportEngine, ExportSink};
pub use statistics::StatisticsEngine;
