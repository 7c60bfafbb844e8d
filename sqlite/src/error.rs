//! Error types for SQLite storage operations.
//!
//! Provides a unified error type covering database access, value conversion,
//! configuration, migration, and identifier validation failures.

use catalog_core::StorageError;
use thiserror::Error;

/// Errors that can occur during SQLite storage operations.
#[derive(Debug, Error)]
pub enum SqliteError {
    /// SQLite database operation failure.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// A JSON value has no SQLite column representation.
    #[error("unsupported value for column '{column}': {value}")]
    UnsupportedValue { column: String, value: String },

    /// Migration lifecycle operation failure.
    #[error("migration error: {0}")]
    MigrationError(String),

    /// Table prefix contains invalid characters.
    #[error("invalid prefix '{0}': must contain only alphanumeric characters and underscores")]
    InvalidPrefix(String),

    /// Column name contains invalid characters.
    #[error("invalid column '{0}': must contain only alphanumeric characters and underscores")]
    InvalidColumn(String),

    /// Store configuration could not be parsed or written.
    #[error("config error: {0}")]
    ConfigError(#[from] serde_yaml::Error),

    /// Seed file is not valid JSON.
    #[error("seed data error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Filesystem failure reading or writing config and seed files.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<SqliteError> for StorageError {
    fn from(err: SqliteError) -> Self {
        StorageError::new(err)
    }
}

/// Convenience alias for results with [`SqliteError`].
pub type Result<T> = std::result::Result<T, SqliteError>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_storage_error_hides_backend_message() {
        let err = SqliteError::MigrationError("no such table: catalog_products".into());
        let storage = StorageError::from(err);
        assert!(!storage.to_string().contains("catalog_products"));
        let source = storage.source().unwrap();
        assert!(source.to_string().contains("catalog_products"));
    }
}
