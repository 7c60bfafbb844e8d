//! Persistence contract.
//!
//! [`RowStore`] is the minimal CRUD surface the catalog needs from a
//! backend: equality-filtered selects, inserts that return the assigned id,
//! full-row updates, and deletes. Every call is a single round trip with no
//! retries; failures surface as [`StorageError`].
//!
//! Rows are plain JSON objects keyed by column name.

use serde_json::{Map, Value};

use crate::error::StorageError;

/// One stored row, keyed by column name.
pub type Row = Map<String, Value>;

/// Generic row store for one table.
pub trait RowStore {
    /// Returns rows whose columns equal every `(column, value)` pair in
    /// `filter` (an empty filter matches all rows).
    fn select(
        &self,
        filter: &Row,
        limit: Option<usize>,
        descending_by_id: bool,
    ) -> Result<Vec<Row>, StorageError>;

    /// Inserts a row and returns its assigned id. An `id` key in `data` is
    /// ignored.
    fn insert(&self, data: &Row) -> Result<i64, StorageError>;

    /// Overwrites the given columns of row `id`. Returns the number of rows
    /// changed (0 when the id does not exist).
    fn update(&self, id: i64, data: &Row) -> Result<usize, StorageError>;

    /// Deletes row `id`. Returns the number of rows removed.
    fn delete(&self, id: i64) -> Result<usize, StorageError>;

    /// Deletes every id in order inside one atomic unit. Missing ids are
    /// skipped. Returns the number of rows removed.
    fn delete_all(&self, ids: &[i64]) -> Result<usize, StorageError>;
}

impl<T: RowStore + ?Sized> RowStore for &T {
    fn select(
        &self,
        filter: &Row,
        limit: Option<usize>,
        descending_by_id: bool,
    ) -> Result<Vec<Row>, StorageError> {
        (**self).select(filter, limit, descending_by_id)
    }

    fn insert(&self, data: &Row) -> Result<i64, StorageError> {
        (**self).insert(data)
    }

    fn update(&self, id: i64, data: &Row) -> Result<usize, StorageError> {
        (**self).update(id, data)
    }

    fn delete(&self, id: i64) -> Result<usize, StorageError> {
        (**self).delete(id)
    }

    fn delete_all(&self, ids: &[i64]) -> Result<usize, StorageError> {
        (**self).delete_all(ids)
    }
}
