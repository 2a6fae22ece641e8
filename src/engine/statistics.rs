// ==========================================
// Seguimiento - statistics engine
// ==========================================
// Per-status counts over the FULL request population matching a
// category filter, not just the current page. Full recompute by
// design: callers re-invoke on every change notification and on
// every filter change.
// ==========================================

use std::collections::HashMap;

use crate::domain::{RequestCategory, StatusCounts, TrackingStatus};
use crate::store::row::get_i64;
use crate::store::{QuerySpec, SortDir};

use super::batch_fetch::BatchedFetcher;
use super::error::FetchError;

pub struct StatisticsEngine {
    fetcher: BatchedFetcher,
}

impl StatisticsEngine {
    pub fn new(fetcher: BatchedFetcher) -> Self {
        Self { fetcher }
    }

    /// Count requests by tracking status.
    ///
    /// Both populations (request ids under the category filter and
    /// all tracking rows) come through the batched fetcher since
    /// either can exceed the backend's page cap. A request with no
    /// tracking row counts as ACTIVE, the implicit default.
    pub async fn status_counts(
        &self,
        category: Option<RequestCategory>,
    ) -> Result<StatusCounts, FetchError> {
        let mut request_query = QuerySpec::new("requests")
            .columns(["id"])
            .order_by("id", SortDir::Asc);
        if let Some(category) = category {
            request_query = request_query.eq("category", category.as_str());
        }
        let request_rows = self.fetcher.fetch_all(&request_query).await?;

        let tracking_query = QuerySpec::new("request_tracking")
            .columns(["request_id", "status"])
            .order_by("request_id", SortDir::Asc);
        let tracking_rows = self.fetcher.fetch_all(&tracking_query).await?;

        let mut status_by_request: HashMap<i64, TrackingStatus> = HashMap::new();
        for row in &tracking_rows {
            let Ok(request_id) = get_i64(row, "request_id") else {
                tracing::warn!(?row, "tracking row without request_id skipped");
                continue;
            };
            let status = row
                .get("status")
                .and_then(|v| v.as_str())
                .and_then(TrackingStatus::parse)
                .unwrap_or_else(|| {
                    tracing::warn!(request_id, "unrecognized status counted as ACTIVE");
                    TrackingStatus::Active
                });
            status_by_request.insert(request_id, status);
        }

        let mut counts = StatusCounts::default();
        for row in &request_rows {
            let Ok(id) = get_i64(row, "id") else {
                continue;
            };
            let status = status_by_request
                .get(&id)
                .copied()
                .unwrap_or(TrackingStatus::Active);
            counts.record(status);
        }

        tracing::debug!(
            category = category.map(|c| c.as_str()),
            total = counts.total(),
            "status counts recomputed"
        );
        Ok(counts)
    }
}
