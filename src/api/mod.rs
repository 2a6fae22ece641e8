// ==========================================
// Seguimiento - api layer
// ==========================================
// Validated facade the tracking views call into. Converts layer
// errors into user-presentable ones; every error is transient
// and retrying the triggering action is always safe.
// ==========================================

pub mod error;
pub mod tracking_api;

pub use error::{ApiError, ApiResult};
pub use tracking_api::TrackingApi;
