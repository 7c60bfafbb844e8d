//! [`RowStore`] implementation over a borrowed SQLite connection.
//!
//! Every call is a single statement except [`RowStore::delete_all`], which
//! wraps its deletes in one transaction. Column names coming from row keys
//! are validated as identifiers before they reach SQL; values are always
//! bound as parameters.
//!
//! # Example
//!
//! ```no_run
//! use catalog_core::Catalog;
//! use catalog_sqlite::{Migration, SqliteStore};
//! use rusqlite::Connection;
//! use serde_json::json;
//!
//! let mut migration = Migration::new(Connection::open("catalog.db").unwrap(), "catalog_").unwrap();
//! migration.up().unwrap();
//!
//! let store = SqliteStore::new(migration.connection(), "catalog_").unwrap();
//! let catalog = Catalog::new(store);
//! let response = catalog.handle_create(&json!({
//!     "sku": "AB12", "name": "Widget", "price": 9.99, "type": "DVD", "size": 700
//! }));
//! assert_eq!(response.status, 201);
//! ```

use catalog_core::schema::ID_FIELD;
use catalog_core::{Row, RowStore, StorageError};
use rusqlite::{Connection, params, params_from_iter};
use tracing::debug;

use crate::convert::{read_row, to_sql};
use crate::error::Result;
use crate::schema::{table_name, validate_column, validate_prefix};

/// Row store for the `{prefix}products` table.
pub struct SqliteStore<'a> {
    conn: &'a Connection,
    table: String,
}

impl<'a> SqliteStore<'a> {
    /// Creates a store for the given connection and table prefix.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::InvalidPrefix`](crate::SqliteError::InvalidPrefix)
    /// if the prefix is invalid.
    pub fn new(conn: &'a Connection, prefix: &str) -> Result<Self> {
        validate_prefix(prefix)?;
        Ok(Self {
            conn,
            table: table_name(prefix),
        })
    }

    /// Returns the prefixed table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        self.conn
    }

    fn select_rows(&self, filter: &Row, limit: Option<usize>, descending: bool) -> Result<Vec<Row>> {
        let mut sql = format!("SELECT * FROM {}", self.table);
        let mut values = Vec::with_capacity(filter.len());
        for (i, (column, value)) in filter.iter().enumerate() {
            validate_column(column)?;
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            sql.push_str(&format!("{column} = ?{}", i + 1));
            values.push(to_sql(column, value)?);
        }
        if descending {
            sql.push_str(&format!(" ORDER BY {ID_FIELD} DESC"));
        }
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        debug!(sql = %sql, "selecting rows");

        let mut stmt = self.conn.prepare(&sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.query(params_from_iter(values))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(read_row(row, &columns)?);
        }
        Ok(out)
    }

    fn insert_row(&self, data: &Row) -> Result<i64> {
        let mut columns = Vec::with_capacity(data.len());
        let mut values = Vec::with_capacity(data.len());
        for (column, value) in data.iter().filter(|(column, _)| *column != ID_FIELD) {
            validate_column(column)?;
            columns.push(column.as_str());
            values.push(to_sql(column, value)?);
        }

        let sql = if columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", self.table)
        } else {
            let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.table,
                columns.join(", "),
                placeholders.join(", ")
            )
        };
        debug!(sql = %sql, "inserting row");

        self.conn.execute(&sql, params_from_iter(values))?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_row(&self, id: i64, data: &Row) -> Result<usize> {
        let mut assignments = Vec::with_capacity(data.len());
        let mut values = Vec::with_capacity(data.len() + 1);
        for (column, value) in data.iter().filter(|(column, _)| *column != ID_FIELD) {
            validate_column(column)?;
            assignments.push(format!("{column} = ?{}", values.len() + 1));
            values.push(to_sql(column, value)?);
        }

        if assignments.is_empty() {
            let sql = format!("SELECT COUNT(*) FROM {} WHERE {ID_FIELD} = ?1", self.table);
            let count: i64 = self.conn.query_row(&sql, params![id], |row| row.get(0))?;
            return Ok(count as usize);
        }

        let sql = format!(
            "UPDATE {} SET {} WHERE {ID_FIELD} = ?{}",
            self.table,
            assignments.join(", "),
            values.len() + 1
        );
        values.push(id.into());
        debug!(sql = %sql, id, "updating row");
        Ok(self.conn.execute(&sql, params_from_iter(values))?)
    }

    fn delete_row(&self, conn: &Connection, id: i64) -> Result<usize> {
        let sql = format!("DELETE FROM {} WHERE {ID_FIELD} = ?1", self.table);
        Ok(conn.execute(&sql, params![id])?)
    }

    fn delete_rows(&self, ids: &[i64]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut removed = 0;
        for id in ids {
            let count = self.delete_row(&tx, *id)?;
            if count == 0 {
                debug!(id, "skipping missing row");
            }
            removed += count;
        }
        tx.commit()?;
        Ok(removed)
    }
}

impl RowStore for SqliteStore<'_> {
    fn select(
        &self,
        filter: &Row,
        limit: Option<usize>,
        descending_by_id: bool,
    ) -> std::result::Result<Vec<Row>, StorageError> {
        Ok(self.select_rows(filter, limit, descending_by_id)?)
    }

    fn insert(&self, data: &Row) -> std::result::Result<i64, StorageError> {
        Ok(self.insert_row(data)?)
    }

    fn update(&self, id: i64, data: &Row) -> std::result::Result<usize, StorageError> {
        Ok(self.update_row(id, data)?)
    }

    fn delete(&self, id: i64) -> std::result::Result<usize, StorageError> {
        Ok(self.delete_row(self.conn, id)?)
    }

    fn delete_all(&self, ids: &[i64]) -> std::result::Result<usize, StorageError> {
        Ok(self.delete_rows(ids)?)
    }
}
