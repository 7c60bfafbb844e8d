//! SQLite storage backend for the product catalog.
//!
//! This crate stores every product category in one SQLite table whose
//! columns are derived from the descriptor registry in
//! [`catalog_core::schema`]. It includes table setup and seeding, a
//! [`RowStore`](catalog_core::RowStore) implementation the
//! [`Catalog`](catalog_core::Catalog) runs on, and a YAML store
//! configuration.
//!
//! # Architecture
//!
//! - **`schema`**: DDL generation with customizable table prefixes
//! - **`migration`**: table setup (up/seed/status)
//! - **`convert`**: JSON ↔ SQLite value conversion
//! - **`store`**: the row store (select/insert/update/delete)
//! - **`config`**: database path and prefix, loadable from YAML
//!
//! # Quick start
//!
//! ```no_run
//! use catalog_core::Catalog;
//! use catalog_sqlite::{Migration, SqliteStore, StoreConfig};
//!
//! let config = StoreConfig::default();
//! let mut migration = Migration::new(config.open().unwrap(), &config.prefix).unwrap();
//! migration.up().unwrap();
//!
//! let catalog = Catalog::new(SqliteStore::new(migration.connection(), &config.prefix).unwrap());
//! for product in catalog.list().unwrap() {
//!     println!("{:?} {:?}", product.sku(), product.category());
//! }
//! ```
//!
//! # Table prefix customization
//!
//! Table and index names are prefixed with a configurable string, allowing
//! multiple isolated catalogs within the same SQLite database. Prefixes must
//! contain only alphanumeric characters and underscores.

mod config;
mod convert;
mod error;
mod migration;
mod schema;
mod store;

pub use config::{DEFAULT_DATABASE, DEFAULT_PREFIX, StoreConfig};
pub use error::{Result, SqliteError};
pub use migration::{Migration, MigrationStatus, SeedReport};
pub use schema::generate_schema_sql;
pub use store::SqliteStore;
