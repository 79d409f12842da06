//! Environment-driven store configuration.
//!
//! # Invariants
//! - Blank environment values fall back to defaults.
//! - Customer and address tables must have distinct names.

use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "ADDRESSBOOK_DB_PATH";
pub const CUSTOMER_TABLE_ENV: &str = "ADDRESSBOOK_CUSTOMER_TABLE";
pub const ADDRESS_TABLE_ENV: &str = "ADDRESSBOOK_ADDRESS_TABLE";

const DEFAULT_DB_FILE_NAME: &str = "addressbook.sqlite3";
const DEFAULT_CUSTOMER_TABLE: &str = "customers";
const DEFAULT_ADDRESS_TABLE: &str = "addresses";

/// Where items live and which logical tables hold each entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub customer_table: String,
    pub address_table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            customer_table: DEFAULT_CUSTOMER_TABLE.to_string(),
            address_table: DEFAULT_ADDRESS_TABLE.to_string(),
        }
    }
}

impl StoreConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which returns a raw variable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let defaults = Self::default();
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let config = Self {
            db_path: read(DB_PATH_ENV).map_or(defaults.db_path, PathBuf::from),
            customer_table: read(CUSTOMER_TABLE_ENV).unwrap_or(defaults.customer_table),
            address_table: read(ADDRESS_TABLE_ENV).unwrap_or(defaults.address_table),
        };

        if config.customer_table == config.address_table {
            return Err(format!(
                "customer and address tables must differ, both are `{}`",
                config.customer_table
            ));
        }
        Ok(config)
    }
}
