// ==========================================
// Seguimiento - audit journal (bitacora)
// ==========================================
// Append-only dated free-text entries per request. This
// subsystem never edits or deletes an entry; the only write is
// the append, the only read the reverse-chronological listing.
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;

use crate::domain::AuditEntry;
use crate::store::{QuerySpec, SortDir, StoreClient};

use super::error::{RepositoryError, RepositoryResult};

pub const BITACORA_TABLE: &str = "bitacora";

pub struct AuditJournal {
    client: Arc<dyn StoreClient>,
}

impl AuditJournal {
    pub fn new(client: Arc<dyn StoreClient>) -> Self {
        Self { client }
    }

    /// Append one immutable entry.
    ///
    /// Rejects a blank body before any backend call; the entry date
    /// is always explicit (no implicit "now").
    pub async fn append(
        &self,
        request_id: i64,
        entry_date: NaiveDate,
        body: &str,
    ) -> RepositoryResult<AuditEntry> {
        if body.trim().is_empty() {
            return Err(RepositoryError::Validation(
                "bitacora entry body must not be empty".to_string(),
            ));
        }

        let entry = AuditEntry::new(request_id, entry_date, body.trim());
        let Value::Object(row) = serde_json::to_value(&entry)
            .map_err(|e| RepositoryError::Decode(e.to_string()))?
        else {
            return Err(RepositoryError::Decode(
                "audit entry did not serialize to an object".to_string(),
            ));
        };

        self.client.insert(BITACORA_TABLE, &row).await?;
        tracing::info!(request_id, %entry_date, "bitacora entry appended");
        Ok(entry)
    }

    /// All entries for a request, most recent first. No pagination:
    /// audit trails are bounded in practice.
    pub async fn list(&self, request_id: i64) -> RepositoryResult<Vec<AuditEntry>> {
        let query = QuerySpec::new(BITACORA_TABLE)
            .eq("request_id", request_id)
            .order_by("entry_date", SortDir::Desc);
        let rows = self.client.select(&query).await?;

        rows.into_iter()
            .map(|row| {
                serde_json::from_value(Value::Object(row))
                    .map_err(|e| RepositoryError::Decode(e.to_string()))
            })
            .collect()
    }
}
