//! SQL schema generation with customizable table prefixes.
//!
//! The products table is derived from the descriptor registry in
//! [`catalog_core::schema`]: every category lives in one table, so the
//! column set is the base fields followed by each category's extension
//! fields, deduplicated.
//!
//! # Table structure
//!
//! - `{prefix}products`: one row per product, `id` assigned by SQLite
//! - `idx_{prefix}products_type`: index on the category discriminator
//!
//! Text fields map to `TEXT` and numeric fields to `NUMERIC`, which keeps
//! integers integral and decimals as `REAL`. Required base fields are
//! `NOT NULL`; extension fields stay nullable because rows of other
//! categories leave them empty.
//!
//! # Custom prefix
//!
//! Prefixes must contain only alphanumeric characters and underscores.
//! This enables multiple isolated catalogs (e.g., `shop_`, `test_`) within
//! the same SQLite database.

use catalog_core::schema::{BASE_FIELDS, ID_FIELD, all_fields};
use catalog_core::{FieldDescriptor, FieldKind};

use crate::error::{Result, SqliteError};

/// Table name suffix appended to the prefix.
pub(crate) const PRODUCTS_TABLE: &str = "products";

fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validates that a table prefix contains only alphanumeric characters and underscores.
pub(crate) fn validate_prefix(prefix: &str) -> Result<()> {
    if !is_identifier(prefix) {
        return Err(SqliteError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

/// Validates a column name before it is interpolated into SQL.
pub(crate) fn validate_column(column: &str) -> Result<()> {
    if !is_identifier(column) {
        return Err(SqliteError::InvalidColumn(column.to_string()));
    }
    Ok(())
}

/// Returns the prefixed products table name.
pub(crate) fn table_name(prefix: &str) -> String {
    format!("{prefix}{PRODUCTS_TABLE}")
}

fn column_sql(field: &FieldDescriptor) -> String {
    if field.name == ID_FIELD {
        return format!("{ID_FIELD} INTEGER PRIMARY KEY AUTOINCREMENT");
    }

    let mut sql = String::from(field.name);
    sql.push_str(match field.kind {
        FieldKind::Text => " TEXT",
        FieldKind::Numeric => " NUMERIC",
    });
    let is_base = BASE_FIELDS.iter().any(|base| base.name == field.name);
    if is_base && field.required {
        sql.push_str(" NOT NULL");
    }
    if field.unique {
        sql.push_str(" UNIQUE");
    }
    sql
}

/// Generates the `CREATE TABLE` and `CREATE INDEX` statements for the
/// products table with the given prefix.
///
/// # Errors
///
/// Returns [`SqliteError::InvalidPrefix`] if the prefix contains characters
/// other than alphanumerics and underscores, or if it is empty.
pub fn generate_schema_sql(prefix: &str) -> Result<String> {
    validate_prefix(prefix)?;

    let table = table_name(prefix);
    let columns: Vec<String> = all_fields().into_iter().map(column_sql).collect();

    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {table} (\n    {}\n);\n\n\
         CREATE INDEX IF NOT EXISTS idx_{table}_type ON {table}(type);\n",
        columns.join(",\n    ")
    ))
}
