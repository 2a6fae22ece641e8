// ==========================================
// Seguimiento - tracking api facade
// ==========================================
// The surface the seguimiento views call: tracking state,
// bitacora, consumption ledger, status statistics and report
// export, wired over one shared store client.
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::broadcast;

use crate::config::FetchLimits;
use crate::domain::{AuditEntry, ConsumptionRecord, RequestCategory, StatusCounts, TrackingState};
use crate::engine::{
    BatchedFetcher, ChangeNotifier, ConsumptionAggregator, ExportEngine, ExportSink,
    StatisticsEngine, TrackingChanged,
};
use crate::repository::{AuditJournal, TrackingStore};
use crate::store::{QuerySpec, StoreClient};

use super::error::{ApiError, ApiResult};

pub struct TrackingApi {
    tracking: TrackingStore,
    journal: AuditJournal,
    aggregator: ConsumptionAggregator,
    statistics: StatisticsEngine,
    export: ExportEngine,
}

impl TrackingApi {
    pub fn new(client: Arc<dyn StoreClient>) -> Self {
        Self::with_limits(client, FetchLimits::default())
    }

    pub fn with_limits(client: Arc<dyn StoreClient>, limits: FetchLimits) -> Self {
        let notifier = ChangeNotifier::default();
        Self {
            tracking: TrackingStore::new(Arc::clone(&client), notifier),
            journal: AuditJournal::new(Arc::clone(&client)),
            aggregator: ConsumptionAggregator::with_limits(Arc::clone(&client), limits),
            statistics: StatisticsEngine::new(BatchedFetcher::with_limits(
                Arc::clone(&client),
                limits,
            )),
            export: ExportEngine::with_limits(client, limits),
        }
    }

    /// Subscribe to tracking-state change broadcasts. Listing views
    /// and statistics panels refresh on every event, idempotently.
    pub fn subscribe_changes(&self) -> broadcast::Receiver<TrackingChanged> {
        self.tracking.notifier().subscribe()
    }

    // ==========================================
    // Tracking state
    // ==========================================

    /// Open a request for tracking: returns its tracking state,
    /// creating the row (ACTIVE, empty milestones) on first access.
    pub async fn open_tracking(&self, request_id: i64) -> ApiResult<TrackingState> {
        validate_request_id(request_id)?;
        Ok(self.tracking.get_or_create(request_id).await?)
    }

    /// Save a tracking state (status + all milestone fields, total
    /// overwrite). Milestone-order violations come back as
    /// `ApiError::Validation` with prior storage untouched.
    pub async fn save_tracking(&self, state: &TrackingState) -> ApiResult<()> {
        validate_request_id(state.request_id)?;
        Ok(self.tracking.save(state).await?)
    }

    // ==========================================
    // Bitacora
    // ==========================================

    pub async fn append_bitacora(
        &self,
        request_id: i64,
        entry_date: NaiveDate,
        body: &str,
    ) -> ApiResult<AuditEntry> {
        validate_request_id(request_id)?;
        Ok(self.journal.append(request_id, entry_date, body).await?)
    }

    /// Bitacora entries, most recent first.
    pub async fn list_bitacora(&self, request_id: i64) -> ApiResult<Vec<AuditEntry>> {
        validate_request_id(request_id)?;
        Ok(self.journal.list(request_id).await?)
    }

    // ==========================================
    // Consumption ledger
    // ==========================================

    /// The merged consumable/asset ledger for a request, date
    /// descending. All-or-nothing: a failure returns no ledger
    /// rather than a silently incomplete one.
    pub async fn consumption_ledger(&self, request_id: i64) -> ApiResult<Vec<ConsumptionRecord>> {
        validate_request_id(request_id)?;
        Ok(self.aggregator.ledger(request_id).await?)
    }

    // ==========================================
    // Statistics and export
    // ==========================================

    /// Status counts over the full population under the category
    /// filter (requests without a tracking row count as ACTIVE).
    pub async fn status_summary(
        &self,
        category: Option<RequestCategory>,
    ) -> ApiResult<StatusCounts> {
        Ok(self.statistics.status_counts(category).await?)
    }

    /// Export the rows behind a listing view, bypassing its page
    /// size up to the export ceiling. Returns the row count handed
    /// to the sink.
    pub async fn export_view(
        &self,
        view_query: &QuerySpec,
        sink: &mut dyn ExportSink,
    ) -> ApiResult<usize> {
        Ok(self.export.export(view_query, sink).await?)
    }
}

fn validate_request_id(request_id: i64) -> ApiResult<()> {
    if request_id <= 0 {
        return Err(ApiError::InvalidInput(format!(
            "request id must be positive, got {}",
            request_id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_validation() {
        assert!(validate_request_id(500).is_ok());
        assert!(matches!(
            validate_request_id(0),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_request_id(-3),
            Err(ApiError::InvalidInput(_))
        ));
    }
}
