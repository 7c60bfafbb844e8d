//! Store configuration.
//!
//! # Example YAML
//!
//! ```yaml
//! database: /var/lib/catalog/catalog.db
//! prefix: shop_
//! ```
//!
//! Both keys are optional; missing keys take the [`Default`] values.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::schema::validate_prefix;

/// Default database file, relative to the working directory.
pub const DEFAULT_DATABASE: &str = "catalog.db";

/// Default table prefix.
pub const DEFAULT_PREFIX: &str = "catalog_";

/// Where the catalog lives: the SQLite file and the table prefix.
///
/// # Examples
///
/// ```
/// use catalog_sqlite::StoreConfig;
///
/// let config = StoreConfig::default();
/// assert_eq!(config.prefix, "catalog_");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the SQLite database file.
    pub database: PathBuf,
    /// Prefix prepended to table and index names.
    pub prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl StoreConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::SqliteError::IoError) if the file cannot
    /// be read, or [`ConfigError`](crate::SqliteError::ConfigError) if
    /// parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Checks the table prefix.
    pub fn validate(&self) -> Result<()> {
        validate_prefix(&self.prefix)
    }

    /// Opens (creating if needed) the configured database file.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPrefix`](crate::SqliteError::InvalidPrefix) before
    /// touching the filesystem if the prefix is invalid.
    pub fn open(&self) -> Result<Connection> {
        self.validate()?;
        debug!(database = %self.database.display(), prefix = %self.prefix, "opening catalog database");
        Ok(Connection::open(&self.database)?)
    }
}
