// ==========================================
// Seguimiento - SQLite store adapter
// ==========================================
// Implements the `StoreClient` seam over rusqlite for local
// deployments and the test suites. PRAGMA behavior is applied
// uniformly on every connection (foreign keys, busy timeout).
// ==========================================

use async_trait::async_trait;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::client::{JsonRow, StoreClient};
use super::error::{StoreError, StoreResult};
use super::query::{Filter, QuerySpec};

/// busy_timeout applied to every connection (milliseconds).
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Uniform PRAGMA setup. foreign_keys and busy_timeout are
/// per-connection settings in SQLite.
pub fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// `StoreClient` adapter over a single SQLite connection.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(db_path: &str) -> StoreResult<Self> {
        let conn =
            Connection::open(db_path).map_err(|e| StoreError::Connection(e.to_string()))?;
        configure_connection(&conn).map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Connection(e.to_string()))?;
        configure_connection(&conn).map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Shared handle to the underlying connection (schema setup in
    /// tests, migrations in local tools).
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    fn get_conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }
}

// ==========================================
// JSON <-> SQLite value mapping
// ==========================================

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                SqlValue::Integer(i)
            } else {
                SqlValue::Real(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => SqlValue::Text(s.clone()),
        // structured values are stored as JSON text
        other => SqlValue::Text(other.to_string()),
    }
}

fn from_sql_ref(value: rusqlite::types::ValueRef<'_>) -> StoreResult<Value> {
    use rusqlite::types::ValueRef;
    Ok(match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Value::from(f),
        ValueRef::Text(bytes) => Value::String(
            std::str::from_utf8(bytes)
                .map_err(|e| StoreError::Query(format!("non-utf8 text column: {}", e)))?
                .to_string(),
        ),
        // binary payloads live in the object store, not here
        ValueRef::Blob(_) => Value::Null,
    })
}

// ==========================================
// SQL building
// ==========================================

fn build_select(query: &QuerySpec) -> (String, Vec<SqlValue>) {
    let projection = if query.columns.is_empty() {
        "*".to_string()
    } else {
        query.columns.join(", ")
    };

    let mut sql = format!("SELECT {} FROM {}", projection, query.table);
    let mut params: Vec<SqlValue> = Vec::new();
    let mut clauses: Vec<String> = Vec::new();

    for filter in &query.filters {
        match filter {
            Filter::Eq(column, value) => {
                clauses.push(format!("{} = ?", column));
                params.push(to_sql_value(value));
            }
            Filter::In(column, values) => {
                if values.is_empty() {
                    // empty key set matches nothing
                    clauses.push("1 = 0".to_string());
                } else {
                    let placeholders = vec!["?"; values.len()].join(", ");
                    clauses.push(format!("{} IN ({})", column, placeholders));
                    params.extend(values.iter().map(to_sql_value));
                }
            }
        }
    }

    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    if let Some((column, dir)) = &query.order {
        sql.push_str(&format!(" ORDER BY {} {}", column, dir.as_sql()));
    }

    if let Some(range) = query.range {
        sql.push_str(" LIMIT ? OFFSET ?");
        params.push(SqlValue::Integer(range.limit as i64));
        params.push(SqlValue::Integer(range.offset as i64));
    }

    (sql, params)
}

#[async_trait]
impl StoreClient for SqliteStore {
    async fn select(&self, query: &QuerySpec) -> StoreResult<Vec<JsonRow>> {
        let conn = self.get_conn()?;
        let (sql, params) = build_select(query);

        let mut stmt = conn.prepare(&sql)?;
        let column_names: Vec<String> =
            stmt.column_names().iter().map(|c| c.to_string()).collect();

        let mut rows = stmt.query(params_from_iter(params))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut json_row = JsonRow::new();
            for (idx, name) in column_names.iter().enumerate() {
                json_row.insert(name.clone(), from_sql_ref(row.get_ref(idx)?)?);
            }
            out.push(json_row);
        }
        Ok(out)
    }

    async fn insert(&self, table: &str, row: &JsonRow) -> StoreResult<()> {
        let conn = self.get_conn()?;

        let columns: Vec<&str> = row.keys().map(String::as_str).collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders
        );

        let params: Vec<SqlValue> = row.values().map(to_sql_value).collect();
        conn.execute(&sql, params_from_iter(params))?;
        Ok(())
    }

    async fn upsert(&self, table: &str, conflict_column: &str, row: &JsonRow) -> StoreResult<()> {
        let conn = self.get_conn()?;

        let columns: Vec<&str> = row.keys().map(String::as_str).collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let updates: Vec<String> = columns
            .iter()
            .filter(|c| **c != conflict_column)
            .map(|c| format!("{} = excluded.{}", c, c))
            .collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT({}) DO UPDATE SET {}",
            table,
            columns.join(", "),
            placeholders,
            conflict_column,
            updates.join(", ")
        );

        let params: Vec<SqlValue> = row.values().map(to_sql_value).collect();
        conn.execute(&sql, params_from_iter(params))?;
        Ok(())
    }
}
