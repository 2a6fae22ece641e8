// ==========================================
// Seguimiento - tracking state store
// ==========================================
// One-to-one extension of a request, created lazily on first
// tracking access. Writes are total-overwrite upserts keyed by
// request_id; every successful save is broadcast so listing
// views and statistics refresh.
// ==========================================

use std::sync::Arc;

use serde_json::Value;

use crate::domain::TrackingState;
use crate::engine::{ChangeNotifier, TrackingChanged};
use crate::store::{JsonRow, QuerySpec, StoreClient, StoreError};

use super::error::{RepositoryError, RepositoryResult};

pub const TRACKING_TABLE: &str = "request_tracking";

pub struct TrackingStore {
    client: Arc<dyn StoreClient>,
    notifier: ChangeNotifier,
}

impl TrackingStore {
    pub fn new(client: Arc<dyn StoreClient>, notifier: ChangeNotifier) -> Self {
        Self { client, notifier }
    }

    /// The notifier fed by this store's saves.
    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// Fetch the tracking row for a request, if one exists.
    pub async fn find(&self, request_id: i64) -> RepositoryResult<Option<TrackingState>> {
        let query = QuerySpec::new(TRACKING_TABLE)
            .eq("request_id", request_id)
            .range(0, 1);
        let rows = self.client.select(&query).await?;
        rows.into_iter().next().map(state_from_row).transpose()
    }

    /// Fetch the tracking row, creating it (ACTIVE, all milestones
    /// empty) on first access.
    ///
    /// Explicit find + insert-if-absent: a unique-constraint
    /// violation on the insert means a concurrent caller created
    /// the row first, so the losing side re-fetches. Idempotent
    /// under repetition and races; never creates a duplicate row.
    pub async fn get_or_create(&self, request_id: i64) -> RepositoryResult<TrackingState> {
        if let Some(state) = self.find(request_id).await? {
            return Ok(state);
        }

        let fresh = TrackingState::new(request_id);
        match self.client.insert(TRACKING_TABLE, &state_row(&fresh)?).await {
            Ok(()) => {
                tracing::info!(request_id, "tracking row created on first access");
                Ok(fresh)
            }
            Err(StoreError::UniqueViolation(_)) => {
                // lost the creation race; the winner's row is authoritative
                self.find(request_id)
                    .await?
                    .ok_or(RepositoryError::NotFound {
                        entity: TRACKING_TABLE,
                        id: request_id,
                    })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist a tracking state.
    ///
    /// Validates the milestone invariant before any backend call;
    /// on violation the previously persisted state is untouched.
    /// The write is a total overwrite of status and every milestone
    /// field (last write wins), after which the change is
    /// broadcast to subscribers.
    pub async fn save(&self, state: &TrackingState) -> RepositoryResult<()> {
        state.validate().map_err(RepositoryError::Validation)?;

        self.client
            .upsert(TRACKING_TABLE, "request_id", &state_row(state)?)
            .await?;

        tracing::info!(
            request_id = state.request_id,
            status = %state.status,
            "tracking state saved"
        );
        self.notifier.notify(TrackingChanged {
            request_id: state.request_id,
        });
        Ok(())
    }
}

// entity <-> row mapping via serde; None milestones serialize as
// NULL so the upsert clears them (total overwrite, not a patch)

fn state_row(state: &TrackingState) -> RepositoryResult<JsonRow> {
    match serde_json::to_value(state) {
        Ok(Value::Object(row)) => Ok(row),
        Ok(_) => Err(RepositoryError::Decode(
            "tracking state did not serialize to an object".to_string(),
        )),
        Err(e) => Err(RepositoryError::Decode(e.to_string())),
    }
}

fn state_from_row(row: JsonRow) -> RepositoryResult<TrackingState> {
    serde_json::from_value(Value::Object(row)).map_err(|e| RepositoryError::Decode(e.to_string()))
}
