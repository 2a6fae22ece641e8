// ==========================================
// Seguimiento - consumption aggregator
// ==========================================
// Builds the unified consumption ledger for one request by
// joining two structurally different domains: consumable stock
// issuances and fixed-asset assignments. All-or-nothing: any
// sub-fetch failure fails the aggregation, never a partial
// ledger. Records are recomputed fresh on every call.
// ==========================================

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::try_join_all;
use serde_json::{json, Value};

use crate::config::FetchLimits;
use crate::domain::{ConsumptionRecord, ConsumptionSource};
use crate::store::row::{get_date, get_f64, get_i64, get_str};
use crate::store::{JsonRow, QuerySpec, SortDir, StoreClient};

use super::batch_fetch::BatchedFetcher;
use super::chunk_lookup::ChunkedLookup;
use super::error::AggregationError;
use super::money::parse_flexible_decimal;

pub struct ConsumptionAggregator {
    client: Arc<dyn StoreClient>,
    fetcher: BatchedFetcher,
    lookup: ChunkedLookup,
}

struct IssueHeader {
    id: i64,
    date: NaiveDate,
    order_type_id: Option<i64>,
}

struct AssignmentHeader {
    id: i64,
    date: NaiveDate,
}

impl ConsumptionAggregator {
    pub fn new(client: Arc<dyn StoreClient>) -> Self {
        Self::with_limits(client, FetchLimits::default())
    }

    pub fn with_limits(client: Arc<dyn StoreClient>, limits: FetchLimits) -> Self {
        Self {
            fetcher: BatchedFetcher::with_limits(Arc::clone(&client), limits),
            lookup: ChunkedLookup::with_limits(Arc::clone(&client), limits),
            client,
        }
    }

    /// The full consumption ledger for `request_id`: both sources
    /// concatenated (no deduplication) and sorted by transaction
    /// date descending. Ties break on transaction id descending so
    /// repeated aggregations are deterministic.
    pub async fn ledger(
        &self,
        request_id: i64,
    ) -> Result<Vec<ConsumptionRecord>, AggregationError> {
        let mut records = self.consumable_records(request_id).await?;
        records.extend(self.asset_records(request_id).await?);

        records.sort_by(|a, b| {
            b.transaction_date
                .cmp(&a.transaction_date)
                .then(b.transaction_id.cmp(&a.transaction_id))
        });

        tracing::debug!(request_id, records = records.len(), "ledger aggregated");
        Ok(records)
    }

    // ==========================================
    // Source A: consumable stock issuances
    // ==========================================

    async fn consumable_records(
        &self,
        request_id: i64,
    ) -> Result<Vec<ConsumptionRecord>, AggregationError> {
        // a single request may hold more issuances than one page
        let header_query = QuerySpec::new("material_issues")
            .columns(["id", "issue_date", "order_type_id"])
            .eq("request_id", request_id)
            .order_by("id", SortDir::Asc);
        let header_rows = self.fetcher.fetch_all(&header_query).await?;

        let mut headers = Vec::with_capacity(header_rows.len());
        for row in &header_rows {
            headers.push(IssueHeader {
                id: get_i64(row, "id").map_err(AggregationError::Decode)?,
                date: get_date(row, "issue_date").map_err(AggregationError::Decode)?,
                order_type_id: match row.get("order_type_id") {
                    None | Some(Value::Null) => None,
                    Some(v) => v.as_i64(),
                },
            });
        }

        let details = self
            .fetch_details(
                "issue",
                "material_issue_items",
                "issue_id",
                &["item_code", "quantity", "unit_price", "subtotal"],
                headers.iter().map(|h| h.id),
            )
            .await?;

        // resolve item codes to display names
        let item_codes: Vec<Value> = details
            .iter()
            .flat_map(|(_, rows)| rows.iter())
            .filter_map(|row| row.get("item_code").cloned())
            .collect();
        let article_names = self
            .lookup
            .resolve("articles", "code", &["name"], &item_codes)
            .await?;

        // resolve the parent order-type tag per header
        let order_type_ids: Vec<Value> = headers
            .iter()
            .filter_map(|h| h.order_type_id)
            .map(|id| json!(id))
            .collect();
        let order_types = self
            .lookup
            .resolve("order_types", "id", &["label"], &order_type_ids)
            .await?;

        let header_by_id: HashMap<i64, &IssueHeader> =
            headers.iter().map(|h| (h.id, h)).collect();

        let mut records = Vec::new();
        for (issue_id, rows) in &details {
            let header = header_by_id[issue_id];
            let order_type = header
                .order_type_id
                .and_then(|id| order_types.get(&id.to_string()))
                .and_then(|row| row.get("label"))
                .and_then(|v| v.as_str())
                .map(str::to_string);

            for row in rows {
                let item_code = get_str(row, "item_code")
                    .map_err(AggregationError::Decode)?
                    .to_string();
                let item_name = article_names
                    .get(&item_code)
                    .and_then(|row| row.get("name"))
                    .and_then(|v| v.as_str())
                    // unresolved code: fall back to the raw code
                    .unwrap_or(&item_code)
                    .to_string();

                records.push(ConsumptionRecord {
                    request_id,
                    transaction_id: *issue_id,
                    transaction_date: header.date,
                    item_code,
                    item_name,
                    quantity: get_f64(row, "quantity").map_err(AggregationError::Decode)?,
                    unit_price: get_f64(row, "unit_price").map_err(AggregationError::Decode)?,
                    subtotal: get_f64(row, "subtotal").map_err(AggregationError::Decode)?,
                    source: ConsumptionSource::Consumable,
                    // one tag per header, shared by every line item
                    order_type: order_type.clone(),
                });
            }
        }
        Ok(records)
    }

    // ==========================================
    // Source B: fixed-asset assignments
    // ==========================================

    async fn asset_records(
        &self,
        request_id: i64,
    ) -> Result<Vec<ConsumptionRecord>, AggregationError> {
        let header_query = QuerySpec::new("asset_assignments")
            .columns(["id", "assignment_date"])
            .eq("request_id", request_id)
            .order_by("id", SortDir::Asc);
        let header_rows = self.fetcher.fetch_all(&header_query).await?;

        let mut headers = Vec::with_capacity(header_rows.len());
        for row in &header_rows {
            headers.push(AssignmentHeader {
                id: get_i64(row, "id").map_err(AggregationError::Decode)?,
                date: get_date(row, "assignment_date").map_err(AggregationError::Decode)?,
            });
        }

        let details = self
            .fetch_details(
                "assignment",
                "asset_assignment_items",
                "assignment_id",
                &["asset_id", "quantity"],
                headers.iter().map(|h| h.id),
            )
            .await?;

        // assets resolve to a display name and a raw monetary value
        let asset_ids: Vec<Value> = details
            .iter()
            .flat_map(|(_, rows)| rows.iter())
            .filter_map(|row| row.get("asset_id").cloned())
            .collect();
        let assets = self
            .lookup
            .resolve("assets", "id", &["name", "value"], &asset_ids)
            .await?;

        let header_by_id: HashMap<i64, &AssignmentHeader> =
            headers.iter().map(|h| (h.id, h)).collect();

        let mut records = Vec::new();
        for (assignment_id, rows) in &details {
            let header = header_by_id[assignment_id];
            for row in rows {
                let asset_id = get_i64(row, "asset_id").map_err(AggregationError::Decode)?;
                let quantity = get_f64(row, "quantity").map_err(AggregationError::Decode)?;

                let asset = assets.get(&asset_id.to_string());
                let item_name = asset
                    .and_then(|row| row.get("name"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    // unresolved asset: fall back to its identifier
                    .unwrap_or_else(|| asset_id.to_string());
                let unit_price = asset
                    .and_then(|row| row.get("value"))
                    .map(monetary_value)
                    .unwrap_or(0.0);

                records.push(ConsumptionRecord {
                    request_id,
                    transaction_id: *assignment_id,
                    transaction_date: header.date,
                    item_code: asset_id.to_string(),
                    item_name,
                    quantity,
                    unit_price,
                    // assets carry no stored subtotal
                    subtotal: unit_price * quantity,
                    source: ConsumptionSource::Asset,
                    order_type: None,
                });
            }
        }
        Ok(records)
    }

    /// Line items for each header, one query per header, issued
    /// concurrently and joined. Results pair each header id with
    /// its detail rows.
    async fn fetch_details(
        &self,
        entity: &'static str,
        table: &str,
        header_column: &str,
        columns: &[&str],
        header_ids: impl Iterator<Item = i64>,
    ) -> Result<Vec<(i64, Vec<JsonRow>)>, AggregationError> {
        let futures = header_ids
            .map(|id| {
                let client = Arc::clone(&self.client);
                let query = QuerySpec::new(table)
                    .columns(columns.iter().copied())
                    .eq(header_column, id);
                async move {
                    client
                        .select(&query)
                        .await
                        .map(|rows| (id, rows))
                        .map_err(|source| AggregationError::Detail { entity, id, source })
                }
            })
            .collect::<Vec<_>>();

        try_join_all(futures).await
    }
}

/// Stored asset valuations are raw strings with an ambiguous
/// decimal separator; numeric affinity may surface them as
/// numbers too.
fn monetary_value(value: &Value) -> f64 {
    match value {
        Value::String(s) => parse_flexible_decimal(s),
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        _ => 0.0,
    }
}
