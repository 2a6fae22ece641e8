// ==========================================
// Seguimiento - query value object
// ==========================================
// Filters, sort and pagination travel as an explicit immutable
// value threaded through the fetch and export engines, never as
// ambient view state. Builder methods consume self; deriving a
// page query from a base spec is a clone + range.
// ==========================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sort direction for the single-column ordering the backend offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

/// Row window: offset + limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRange {
    pub offset: usize,
    pub limit: usize,
}

/// Column filter. The backend supports single-column equality and
/// bounded-cardinality IN-list membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    Eq(String, Value),
    In(String, Vec<Value>),
}

/// One complete query against a table-like source.
///
/// An empty `columns` list means "all columns".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub table: String,
    pub columns: Vec<String>,
    pub filters: Vec<Filter>,
    pub order: Option<(String, SortDir)>,
    pub range: Option<RowRange>,
}

impl QuerySpec {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            filters: Vec::new(),
            order: None,
            range: None,
        }
    }

    /// Project a fixed set of columns.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Add an equality filter.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(column.into(), value.into()));
        self
    }

    /// Add an IN-list membership filter.
    pub fn is_in(mut self, column: impl Into<String>, values: Vec<Value>) -> Self {
        self.filters.push(Filter::In(column.into(), values));
        self
    }

    /// Sort by one column.
    pub fn order_by(mut self, column: impl Into<String>, dir: SortDir) -> Self {
        self.order = Some((column.into(), dir));
        self
    }

    /// Select a row window. Replaces any previous range, which is
    /// how the export engine swaps a view's page for its own cap.
    pub fn range(mut self, offset: usize, limit: usize) -> Self {
        self.range = Some(RowRange { offset, limit });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_accumulates() {
        let spec = QuerySpec::new("requests")
            .columns(["id", "category"])
            .eq("category", "INTERNAL")
            .order_by("id", SortDir::Asc)
            .range(0, 100);

        assert_eq!(spec.table, "requests");
        assert_eq!(spec.columns, vec!["id", "category"]);
        assert_eq!(
            spec.filters,
            vec![Filter::Eq("category".into(), json!("INTERNAL"))]
        );
        assert_eq!(spec.order, Some(("id".into(), SortDir::Asc)));
        assert_eq!(spec.range, Some(RowRange { offset: 0, limit: 100 }));
    }

    #[test]
    fn test_range_replaces_previous_window() {
        let spec = QuerySpec::new("requests").range(0, 25).range(50, 25);
        assert_eq!(
            spec.range,
            Some(RowRange {
                offset: 50,
                limit: 25
            })
        );
    }

    #[test]
    fn test_page_spec_derives_from_base_by_clone() {
        let base = QuerySpec::new("requests").eq("category", "EXTERNAL");
        let page = base.clone().range(1000, 1000);

        // the base stays untouched for the next page request
        assert!(base.range.is_none());
        assert_eq!(page.filters, base.filters);
    }
}
