//! Conversion between JSON row values and SQLite values.
//!
//! The core passes rows as JSON objects; SQLite stores `NULL`, `INTEGER`,
//! `REAL` and `TEXT`. Integers stay integers in both directions so a stored
//! `700` comes back as `700`, not `700.0`.

use catalog_core::Row;
use rusqlite::types::{Value as SqlValue, ValueRef};
use serde_json::{Number, Value};

use crate::error::{Result, SqliteError};

/// Converts one JSON value to its SQLite representation.
pub(crate) fn to_sql(column: &str, value: &Value) -> Result<SqlValue> {
    let unsupported = || SqliteError::UnsupportedValue {
        column: column.to_string(),
        value: value.to_string(),
    };
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().ok_or_else(unsupported)?),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => return Err(unsupported()),
    })
}

/// Converts one SQLite column value back to JSON.
pub(crate) fn from_sql(column: &str, value: ValueRef<'_>) -> Result<Value> {
    Ok(match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(_) => {
            return Err(SqliteError::UnsupportedValue {
                column: column.to_string(),
                value: "<blob>".to_string(),
            });
        }
    })
}

/// Reads every column of the current result row into a [`Row`].
pub(crate) fn read_row(row: &rusqlite::Row<'_>, columns: &[String]) -> Result<Row> {
    let mut out = Row::new();
    for (i, column) in columns.iter().enumerate() {
        out.insert(column.clone(), from_sql(column, row.get_ref(i)?)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_to_sql_scalars() {
        assert_eq!(to_sql("c", &json!(null)).unwrap(), SqlValue::Null);
        assert_eq!(to_sql("c", &json!(700)).unwrap(), SqlValue::Integer(700));
        assert_eq!(to_sql("c", &json!(9.99)).unwrap(), SqlValue::Real(9.99));
        assert_eq!(to_sql("c", &json!(true)).unwrap(), SqlValue::Integer(1));
        assert_eq!(
            to_sql("c", &json!("DVD")).unwrap(),
            SqlValue::Text("DVD".to_string())
        );
    }

    #[test]
    fn test_to_sql_rejects_nested_values() {
        let err = to_sql("sku", &json!(["a"])).unwrap_err();
        assert!(matches!(err, SqliteError::UnsupportedValue { ref column, .. } if column == "sku"));
        assert!(to_sql("sku", &json!({"a": 1})).is_err());
    }

    #[test]
    fn test_from_sql_keeps_integers_integral() {
        assert_eq!(from_sql("c", ValueRef::Integer(700)).unwrap(), json!(700));
        assert_eq!(from_sql("c", ValueRef::Real(9.99)).unwrap(), json!(9.99));
        assert_eq!(from_sql("c", ValueRef::Text(b"Book")).unwrap(), json!("Book"));
        assert_eq!(from_sql("c", ValueRef::Null).unwrap(), Value::Null);
        assert!(from_sql("c", ValueRef::Blob(b"x")).is_err());
    }
}
