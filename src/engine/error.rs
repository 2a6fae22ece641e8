// ==========================================
// Seguimiento - engine layer error types
// ==========================================
// A failed page or chunk aborts the whole batched operation:
// callers must treat the result as unknown, never as empty.
// Nothing here retries; every retry is a fresh user action.
// ==========================================

use thiserror::Error;

use crate::store::StoreError;

/// Failure of a single page/chunk request inside the batched
/// fetch engine or the chunked lookup resolver.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("page {page} of {table} failed: {source}")]
    Page {
        table: String,
        page: usize,
        source: StoreError,
    },

    #[error("lookup chunk {chunk} against {table} failed: {source}")]
    Chunk {
        table: String,
        chunk: usize,
        source: StoreError,
    },
}

/// Failure of any sub-fetch inside the consumption aggregator.
/// No partial ledger is ever returned.
#[derive(Error, Debug)]
pub enum AggregationError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("detail fetch for {entity} {id} failed: {source}")]
    Detail {
        entity: &'static str,
        id: i64,
        source: StoreError,
    },

    #[error("ledger row could not be decoded: {0}")]
    Decode(StoreError),
}

/// Export engine failure: either the row fetch or the sink.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("export query failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("export sink failed: {0}")]
    Sink(String),
}
