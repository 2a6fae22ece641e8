// ==========================================
// Seguimiento - export engine
// ==========================================
// Re-executes the filter predicate currently applied to a
// paginated view, swapping the UI page for an explicit larger
// cap, and hands the rows to an external spreadsheet/PDF sink.
// The backend caps any single query at its page size, so rows
// are gathered through the batched fetcher and truncated at the
// export ceiling. The binary encoding belongs to the sink, not
// to this core.
// ==========================================

use std::io::Write;
use std::sync::Arc;

use crate::config::FetchLimits;
use crate::store::{JsonRow, QuerySpec, StoreClient};

use super::batch_fetch::BatchedFetcher;
use super::error::ExportError;

/// Destination for exported rows. Implementations own the file
/// format; the engine only delivers ordered rows and a header.
pub trait ExportSink {
    fn write_rows(&mut self, columns: &[String], rows: &[JsonRow]) -> Result<(), ExportError>;
}

pub struct ExportEngine {
    fetcher: BatchedFetcher,
    export_ceiling: usize,
}

impl ExportEngine {
    pub fn new(client: Arc<dyn StoreClient>) -> Self {
        Self::with_limits(client, FetchLimits::default())
    }

    pub fn with_limits(client: Arc<dyn StoreClient>, limits: FetchLimits) -> Self {
        // never fetch pages past the ceiling
        let pages_for_ceiling =
            ((limits.export_ceiling + limits.page_size - 1) / limits.page_size).max(1);
        let fetch_limits = FetchLimits {
            max_pages: limits.max_pages.min(pages_for_ceiling),
            ..limits
        };
        Self {
            fetcher: BatchedFetcher::with_limits(client, fetch_limits),
            export_ceiling: limits.export_ceiling,
        }
    }

    /// Export every row matching `view_query` up to the export
    /// ceiling, replacing whatever page range the view had applied.
    /// Rows come through the batched fetcher (the backend caps any
    /// single query at its page size) in the view's order. Returns
    /// the number of rows handed to the sink.
    pub async fn export(
        &self,
        view_query: &QuerySpec,
        sink: &mut dyn ExportSink,
    ) -> Result<usize, ExportError> {
        let mut rows = self.fetcher.fetch_all(view_query).await?;

        if rows.len() >= self.export_ceiling {
            rows.truncate(self.export_ceiling);
            tracing::warn!(
                table = %view_query.table,
                ceiling = self.export_ceiling,
                "export hit the row ceiling; result may be truncated"
            );
        }

        let columns = header_columns(view_query, &rows);
        sink.write_rows(&columns, &rows)?;

        tracing::info!(table = %view_query.table, rows = rows.len(), "export complete");
        Ok(rows.len())
    }
}

/// Column order for the sink header: the view's projection when it
/// has one, otherwise the first row's keys.
fn header_columns(query: &QuerySpec, rows: &[JsonRow]) -> Vec<String> {
    if !query.columns.is_empty() {
        query.columns.clone()
    } else {
        rows.first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default()
    }
}

// ==========================================
// CsvSink - reference sink implementation
// ==========================================

/// CSV sink over any writer. Cell rendering is lossy on purpose
/// (everything becomes display text); report consumers re-import
/// nothing from these files.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
        }
    }

    pub fn into_inner(self) -> Result<W, ExportError> {
        self.writer
            .into_inner()
            .map_err(|e| ExportError::Sink(e.to_string()))
    }
}

fn cell_text(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

impl<W: Write> ExportSink for CsvSink<W> {
    fn write_rows(&mut self, columns: &[String], rows: &[JsonRow]) -> Result<(), ExportError> {
        self.writer
            .write_record(columns)
            .map_err(|e| ExportError::Sink(e.to_string()))?;

        for row in rows {
            let record: Vec<String> = columns.iter().map(|c| cell_text(row.get(c))).collect();
            self.writer
                .write_record(&record)
                .map_err(|e| ExportError::Sink(e.to_string()))?;
        }

        self.writer
            .flush()
            .map_err(|e| ExportError::Sink(e.to_string()))?;
        Ok(())
    }
}
