// ==========================================
// Seguimiento - audit journal entry (bitacora)
// ==========================================
// Append-only: entries are never edited or removed by this
// subsystem. Display order is entry date descending.
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One dated free-text note in a request's bitacora.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Backend-assigned identifier; `None` until inserted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub request_id: i64,
    pub entry_date: NaiveDate,
    pub body: String,
}

impl AuditEntry {
    pub fn new(request_id: i64, entry_date: NaiveDate, body: impl Into<String>) -> Self {
        Self {
            id: None,
            request_id,
            entry_date,
            body: body.into(),
        }
    }
}
