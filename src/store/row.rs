// ==========================================
// Seguimiento - row decoding helpers
// ==========================================
// Field extraction from JSON rows with column-level error
// context. Backends are loose about numeric affinity, so the
// numeric getters accept both integer and float encodings.
// ==========================================

use chrono::NaiveDate;
use serde_json::Value;

use super::client::JsonRow;
use super::error::{StoreError, StoreResult};

fn missing(column: &str) -> StoreError {
    StoreError::Decode {
        column: column.to_string(),
        message: "column missing from row".to_string(),
    }
}

fn bad_type(column: &str, expected: &str, got: &Value) -> StoreError {
    StoreError::Decode {
        column: column.to_string(),
        message: format!("expected {}, got {}", expected, got),
    }
}

pub fn get_i64(row: &JsonRow, column: &str) -> StoreResult<i64> {
    let value = row.get(column).ok_or_else(|| missing(column))?;
    value
        .as_i64()
        .ok_or_else(|| bad_type(column, "integer", value))
}

pub fn get_f64(row: &JsonRow, column: &str) -> StoreResult<f64> {
    let value = row.get(column).ok_or_else(|| missing(column))?;
    value
        .as_f64()
        .ok_or_else(|| bad_type(column, "number", value))
}

pub fn get_str<'a>(row: &'a JsonRow, column: &str) -> StoreResult<&'a str> {
    let value = row.get(column).ok_or_else(|| missing(column))?;
    value
        .as_str()
        .ok_or_else(|| bad_type(column, "string", value))
}

/// Optional string: absent column or JSON null both read as `None`.
pub fn get_opt_str(row: &JsonRow, column: &str) -> StoreResult<Option<String>> {
    match row.get(column) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(bad_type(column, "string", other)),
    }
}

/// Date stored as `%Y-%m-%d` text.
pub fn get_date(row: &JsonRow, column: &str) -> StoreResult<NaiveDate> {
    let raw = get_str(row, column)?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| StoreError::Decode {
        column: column.to_string(),
        message: format!("invalid date {:?}: {}", raw, e),
    })
}

/// Canonical string form of a lookup key. Reference tables key on
/// either text codes or integer ids; both map into the same
/// resolver map key space.
pub fn key_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> JsonRow {
        let mut row = JsonRow::new();
        row.insert("col".to_string(), value);
        row
    }

    #[test]
    fn test_get_i64() {
        assert_eq!(get_i64(&row(json!(42)), "col").unwrap(), 42);
        assert!(get_i64(&row(json!("42")), "col").is_err());
        assert!(get_i64(&JsonRow::new(), "col").is_err());
    }

    #[test]
    fn test_get_f64_accepts_integers() {
        assert_eq!(get_f64(&row(json!(2)), "col").unwrap(), 2.0);
        assert_eq!(get_f64(&row(json!(2.5)), "col").unwrap(), 2.5);
    }

    #[test]
    fn test_get_date() {
        let date = get_date(&row(json!("2024-01-15")), "col").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert!(get_date(&row(json!("15/01/2024")), "col").is_err());
    }

    #[test]
    fn test_key_string_normalizes_ids_and_codes() {
        assert_eq!(key_string(&json!("A-100")), "A-100");
        assert_eq!(key_string(&json!(7)), "7");
    }
}
