// ==========================================
// Seguimiento - batched fetch engine
// ==========================================
// The backend caps any single query at a fixed page size, so a
// "complete" result set is assembled from successive
// range-bounded queries. Pages must be requested in increasing
// offset order: termination is detected by a short final page.
// ==========================================

use std::sync::Arc;

use crate::config::FetchLimits;
use crate::store::{JsonRow, QuerySpec, StoreClient};

use super::error::FetchError;

/// Retrieves an entire logical result set page by page.
///
/// Used anywhere the result size could exceed the backend's
/// per-query cap: filter-option enumeration, global statistics
/// and bulk export support queries.
pub struct BatchedFetcher {
    client: Arc<dyn StoreClient>,
    page_size: usize,
    max_pages: usize,
}

impl BatchedFetcher {
    pub fn new(client: Arc<dyn StoreClient>) -> Self {
        Self::with_limits(client, FetchLimits::default())
    }

    pub fn with_limits(client: Arc<dyn StoreClient>, limits: FetchLimits) -> Self {
        Self {
            client,
            page_size: limits.page_size,
            max_pages: limits.max_pages,
        }
    }

    /// Fetch every row matching `base`, regardless of count.
    ///
    /// `base` carries the projection, filters and ordering; any
    /// range on it is ignored and replaced page by page. A failed
    /// page aborts the whole fetch (`FetchError`) with no partial
    /// result. Hitting the page ceiling stops the loop with a
    /// warning and returns what was gathered; the ceiling exists
    /// to break runaway loops on a misbehaving backend.
    pub async fn fetch_all(&self, base: &QuerySpec) -> Result<Vec<JsonRow>, FetchError> {
        let mut out: Vec<JsonRow> = Vec::new();
        let mut page = 0usize;

        loop {
            let page_query = base.clone().range(page * self.page_size, self.page_size);
            let rows = self
                .client
                .select(&page_query)
                .await
                .map_err(|source| FetchError::Page {
                    table: base.table.clone(),
                    page,
                    source,
                })?;

            let short_page = rows.len() < self.page_size;
            out.extend(rows);

            if short_page {
                break;
            }

            page += 1;
            if page >= self.max_pages {
                tracing::warn!(
                    table = %base.table,
                    pages = self.max_pages,
                    rows = out.len(),
                    "batched fetch hit the page ceiling; returning gathered rows"
                );
                break;
            }
        }

        tracing::debug!(table = %base.table, rows = out.len(), pages = page + 1, "batched fetch complete");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{StoreError, StoreResult};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend stub holding `total_rows` rows, serving any ranged
    /// select and counting the requests it receives.
    struct PagedBackend {
        total_rows: usize,
        requests: AtomicUsize,
        fail_on_page: Option<usize>,
    }

    impl PagedBackend {
        fn new(total_rows: usize) -> Self {
            Self {
                total_rows,
                requests: AtomicUsize::new(0),
                fail_on_page: None,
            }
        }

        fn requests(&self) -> usize {
            self.requests.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StoreClient for PagedBackend {
        async fn select(&self, query: &QuerySpec) -> StoreResult<Vec<JsonRow>> {
            let n = self.requests.fetch_add(1, Ordering::SeqCst);
            if self.fail_on_page == Some(n) {
                return Err(StoreError::Query("backend unavailable".to_string()));
            }

            let range = query.range.expect("batched fetch always sets a range");
            let start = range.offset.min(self.total_rows);
            let end = (range.offset + range.limit).min(self.total_rows);
            Ok((start..end)
                .map(|i| {
                    let mut row = JsonRow::new();
                    row.insert("id".to_string(), json!(i as i64));
                    row
                })
                .collect())
        }

        async fn insert(&self, _table: &str, _row: &JsonRow) -> StoreResult<()> {
            unimplemented!("read-only stub")
        }

        async fn upsert(&self, _t: &str, _c: &str, _row: &JsonRow) -> StoreResult<()> {
            unimplemented!("read-only stub")
        }
    }

    fn fetcher(client: Arc<PagedBackend>, page_size: usize) -> BatchedFetcher {
        BatchedFetcher::with_limits(
            client,
            FetchLimits {
                page_size,
                ..FetchLimits::default()
            },
        )
    }

    /// M rows under page size N take exactly ceil((M+1)/N) requests.
    #[tokio::test]
    async fn test_page_request_count_property() {
        let cases = [
            (0usize, 10usize, 1usize), // M = 0
            (7, 10, 1),                // M < N
            (10, 10, 2),               // M = N: full page, then empty short page
            (25, 10, 3),               // M > N
            (30, 10, 4),               // M multiple of N
        ];

        for (total, page_size, expected_requests) in cases {
            let backend = Arc::new(PagedBackend::new(total));
            let rows = fetcher(Arc::clone(&backend), page_size)
                .fetch_all(&QuerySpec::new("requests"))
                .await
                .unwrap();

            assert_eq!(rows.len(), total, "M={total}");
            assert_eq!(backend.requests(), expected_requests, "M={total}");
        }
    }

    #[tokio::test]
    async fn test_failed_page_aborts_without_partial_result() {
        let mut backend = PagedBackend::new(25);
        backend.fail_on_page = Some(1);
        let backend = Arc::new(backend);

        let err = fetcher(Arc::clone(&backend), 10)
            .fetch_all(&QuerySpec::new("requests"))
            .await
            .unwrap_err();

        match err {
            FetchError::Page { table, page, .. } => {
                assert_eq!(table, "requests");
                assert_eq!(page, 1);
            }
            other => panic!("expected page error, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_page_ceiling_stops_the_loop() {
        let backend = Arc::new(PagedBackend::new(1000));
        let fetcher = BatchedFetcher::with_limits(
            Arc::clone(&backend) as Arc<dyn StoreClient>,
            FetchLimits {
                page_size: 10,
                max_pages: 3,
                ..FetchLimits::default()
            },
        );

        let rows = fetcher.fetch_all(&QuerySpec::new("requests")).await.unwrap();
        assert_eq!(rows.len(), 30);
        assert_eq!(backend.requests(), 3);
    }
}
