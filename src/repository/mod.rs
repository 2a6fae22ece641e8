// ==========================================
// Seguimiento - repository layer
// ==========================================
// Validated writes over the store seam. Repositories hold no
// business aggregation logic; they map entities to rows and
// enforce write-time preconditions.
// ==========================================

pub mod bitacora_repo;
pub mod error;
pub mod tracking_repo;

pub use bitacora_repo::AuditJournal;
pub use error::{RepositoryError, RepositoryResult};
pub use tracking_repo::TrackingStore;
