//! Setup operations for the products table.
//!
//! Provides [`Migration`] for creating and seeding the table. Both run
//! inside a transaction. The table layout is fixed, so there is no
//! versioning.
//!
//! # Example
//!
//! ```no_run
//! use catalog_sqlite::Migration;
//! use rusqlite::Connection;
//!
//! let conn = Connection::open("catalog.db").unwrap();
//! let mut migration = Migration::new(conn, "catalog_").unwrap();
//!
//! // Create tables
//! migration.up().unwrap();
//!
//! // Check status
//! let status = migration.status().unwrap();
//! assert!(status.tables_exist);
//!
//! // Seed from a JSON array of products
//! let report = migration.seed("fixtures/products.json").unwrap();
//! println!("{} inserted, {} rejected", report.inserted, report.rejected);
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use catalog_core::{Catalog, Category};
use rusqlite::{Connection, params};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{Result, SqliteError};
use crate::schema::{generate_schema_sql, table_name, validate_prefix};
use crate::store::SqliteStore;

/// Manages the lifecycle of the products table.
///
/// Creates the table ([`up`](Self::up)), seeds products from a JSON file
/// ([`seed`](Self::seed)) and reports the current state
/// ([`status`](Self::status)).
pub struct Migration {
    conn: Connection,
    prefix: String,
}

impl Migration {
    /// Creates a new migration manager for the given connection and table prefix.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::InvalidPrefix`] if the prefix contains invalid characters.
    pub fn new(conn: Connection, prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        Ok(Self { conn, prefix })
    }

    /// Creates the products table and its index.
    ///
    /// Uses `CREATE TABLE IF NOT EXISTS` so it is safe to call multiple times.
    pub fn up(&mut self) -> Result<()> {
        let sql = generate_schema_sql(&self.prefix)?;
        let tx = self.conn.transaction()?;
        tx.execute_batch(&sql)
            .map_err(|e| SqliteError::MigrationError(format!("failed to create tables: {e}")))?;
        tx.commit()?;
        info!(prefix = %self.prefix, "created catalog tables");
        Ok(())
    }

    /// Returns whether the table exists and how many products it holds,
    /// in total and per category.
    pub fn status(&self) -> Result<MigrationStatus> {
        if !self.tables_exist()? {
            return Ok(MigrationStatus::default());
        }

        let table = table_name(&self.prefix);
        let product_count = self.count(&format!("SELECT COUNT(*) FROM {table}"), None)?;
        let mut category_counts = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            let count = self.count(
                &format!("SELECT COUNT(*) FROM {table} WHERE type = ?1"),
                Some(category.as_str()),
            )?;
            category_counts.push((category, count));
        }

        Ok(MigrationStatus {
            tables_exist: true,
            product_count,
            category_counts,
        })
    }

    /// Seeds the table from a file holding a JSON array of product inputs.
    ///
    /// Each item goes through [`Catalog::create`], so sanitization,
    /// validation and the SKU uniqueness check all apply. Items the catalog
    /// rejects are counted and skipped; everything else is inserted within
    /// a single transaction.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::IoError`] or [`SqliteError::JsonError`] if the
    /// file cannot be read, [`SqliteError::MigrationError`] if it is not an
    /// array or an insert fails at the storage level.
    pub fn seed(&mut self, path: impl AsRef<Path>) -> Result<SeedReport> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let data: Value = serde_json::from_reader(reader)?;
        let Value::Array(items) = data else {
            return Err(SqliteError::MigrationError(format!(
                "{} must contain a JSON array of products",
                path.display()
            )));
        };

        let tx = self.conn.transaction()?;
        let mut report = SeedReport::default();
        {
            let catalog = Catalog::new(SqliteStore::new(&tx, &self.prefix)?);
            for (index, item) in items.iter().enumerate() {
                match catalog.create(item) {
                    Ok(_) => report.inserted += 1,
                    Err(err) if err.is_client_error() => {
                        warn!(index, "skipping seed item: {err}");
                        report.rejected += 1;
                    }
                    Err(err) => {
                        return Err(SqliteError::MigrationError(format!(
                            "failed to seed item {index}: {err}"
                        )));
                    }
                }
            }
        }
        tx.commit()?;

        info!(inserted = report.inserted, rejected = report.rejected, "seeded catalog");
        Ok(report)
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Consumes the migration and returns the underlying connection.
    pub fn into_connection(self) -> Connection {
        self.conn
    }

    fn tables_exist(&self) -> Result<bool> {
        let count = self.count(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            Some(&table_name(&self.prefix)),
        )?;
        Ok(count > 0)
    }

    fn count(&self, sql: &str, param: Option<&str>) -> Result<usize> {
        let mut stmt = self.conn.prepare(sql)?;
        let count: i64 = match param {
            Some(param) => stmt.query_row(params![param], |row| row.get(0))?,
            None => stmt.query_row([], |row| row.get(0))?,
        };
        Ok(count as usize)
    }
}

/// Status of the current migration state.
///
/// Returned by [`Migration::status`].
#[derive(Debug, Clone, Default)]
pub struct MigrationStatus {
    /// Whether the products table exists in the database.
    pub tables_exist: bool,
    /// Number of products stored.
    pub product_count: usize,
    /// Number of products stored per category, in [`Category::ALL`] order.
    /// Empty when the table does not exist.
    pub category_counts: Vec<(Category, usize)>,
}

/// Outcome of a seed operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Number of products inserted.
    pub inserted: usize,
    /// Number of items rejected by validation or category resolution.
    pub rejected: usize,
}
