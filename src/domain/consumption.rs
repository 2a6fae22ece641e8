// ==========================================
// Seguimiento - consumption ledger record
// ==========================================
// Derived entity: computed fresh on every aggregation,
// never persisted or cached beyond the current view.
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::types::ConsumptionSource;

/// One normalized line of a request's consumption ledger,
/// merged from either the issuance or the assignment domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    pub request_id: i64,
    /// Identifier of the source header (issuance or assignment).
    pub transaction_id: i64,
    pub transaction_date: NaiveDate,
    pub item_code: String,
    /// Resolved display name; falls back to the raw code when the
    /// reference lookup has no entry.
    pub item_name: String,
    pub quantity: f64,
    pub unit_price: f64,
    /// Stored subtotal for consumables; unit value x quantity for
    /// assets (which carry no stored subtotal).
    pub subtotal: f64,
    pub source: ConsumptionSource,
    /// Human-readable order-type tag (consumable source only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>,
}
