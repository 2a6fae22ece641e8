// ==========================================
// Seguimiento - domain layer
// ==========================================
// Entities and enumerated types. No data access,
// no engine logic.
// ==========================================

pub mod audit;
pub mod consumption;
pub mod stats;
pub mod tracking;
pub mod types;

pub use audit::AuditEntry;
pub use consumption::ConsumptionRecord;
pub use stats::StatusCounts;
pub use tracking::TrackingState;
pub use types::{ConsumptionSource, RequestCategory, TrackingStatus};
