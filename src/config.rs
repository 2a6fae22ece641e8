// ==========================================
// Fetch and export limits
// ==========================================
// The backend caps any single query at a fixed page size and
// bounds IN-list cardinality. These knobs mirror those caps;
// the defaults match the production backend.
// ==========================================

use serde::{Deserialize, Serialize};

/// Rows returned by a single page request. Matches the backend's
/// per-query row ceiling; a page shorter than this signals end-of-data.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Runaway guard for the batched fetch loop. Far above any expected
/// population (50 pages x 1000 rows).
pub const DEFAULT_MAX_PAGES: usize = 50;

/// Maximum keys per IN-list lookup query.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Hard cap for report exports. Deliberately larger than the UI page
/// size but not unbounded.
pub const DEFAULT_EXPORT_CEILING: usize = 3000;

/// Limit set threaded through the fetch, lookup and export engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchLimits {
    /// Rows per page request.
    pub page_size: usize,
    /// Maximum pages before the batched fetch stops.
    pub max_pages: usize,
    /// Keys per IN-list chunk.
    pub chunk_size: usize,
    /// Row cap for exports.
    pub export_ceiling: usize,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            chunk_size: DEFAULT_CHUNK_SIZE,
            export_ceiling: DEFAULT_EXPORT_CEILING,
        }
    }
}
