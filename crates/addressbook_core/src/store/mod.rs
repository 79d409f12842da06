//! Key-value item store contracts and implementations.
//!
//! # Responsibility
//! - Define the get/put/scan/conditional-update primitives used by `Dao`.
//! - Keep physical storage details behind the `ItemStore` trait.
//!
//! # Invariants
//! - One store instance is bound to one logical table.
//! - Store errors are reported as-is; no retries happen at this layer.

pub mod sqlite;
pub mod update_set;

pub use sqlite::SqliteItemStore;
pub use update_set::{UpdateEntry, UpdateSet};

use crate::db::DbError;
use crate::model::record::{AttributeValue, Record, RecordKey, DELETED_ATTRIBUTE};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by an item store call.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Serialization(serde_json::Error),
    /// Conditional update found no item at the key.
    ConditionFailed { table: String, key: String },
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "item serialization failed: {err}"),
            Self::ConditionFailed { table, key } => {
                write!(f, "conditional check failed for `{table}` item {key}")
            }
            Self::InvalidData(message) => write!(f, "invalid stored item data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::ConditionFailed { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Attribute equality filter applied by `ItemStore::scan`.
///
/// An item matches only when every condition attribute is present and
/// strictly equal; items lacking the attribute are filtered out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanFilter {
    conditions: Vec<(String, AttributeValue)>,
}

impl ScanFilter {
    /// Matches every item in the table.
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches items whose soft-delete flag is `false`.
    pub fn live_only() -> Self {
        Self::all().and_equals(DELETED_ATTRIBUTE, false)
    }

    pub fn and_equals(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.conditions.push((name.into(), value.into()));
        self
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.conditions
            .iter()
            .all(|(name, expected)| record.get(name) == Some(expected))
    }
}

/// Item store primitives against one logical table.
pub trait ItemStore {
    /// Logical table this store reads and writes.
    fn table_name(&self) -> &str;
    /// Reads the raw item at `key`, including soft-deleted items.
    fn get(&self, key: &RecordKey) -> StoreResult<Option<Record>>;
    /// Writes `record` at `key`, replacing any existing item.
    fn put(&self, key: &RecordKey, record: &Record) -> StoreResult<()>;
    /// Reads every item matching `filter` in one pass.
    fn scan(&self, filter: &ScanFilter) -> StoreResult<Vec<Record>>;
    /// Applies `update` to the existing item at `key` and returns the full new item.
    ///
    /// Fails with `StoreError::ConditionFailed` when no item exists at `key`.
    fn update(&self, key: &RecordKey, update: &UpdateSet) -> StoreResult<Record>;
}

impl<S: ItemStore + ?Sized> ItemStore for &S {
    fn table_name(&self) -> &str {
        (**self).table_name()
    }

    fn get(&self, key: &RecordKey) -> StoreResult<Option<Record>> {
        (**self).get(key)
    }

    fn put(&self, key: &RecordKey, record: &Record) -> StoreResult<()> {
        (**self).put(key, record)
    }

    fn scan(&self, filter: &ScanFilter) -> StoreResult<Vec<Record>> {
        (**self).scan(filter)
    }

    fn update(&self, key: &RecordKey, update: &UpdateSet) -> StoreResult<Record> {
        (**self).update(key, update)
    }
}

#[cfg(test)]
mod tests {
    use super::ScanFilter;
    use crate::model::record::Record;

    #[test]
    fn live_only_excludes_deleted_and_unflagged_items() {
        let filter = ScanFilter::live_only();
        assert!(filter.matches(&Record::new().with("id", "a").with("deleted", false)));
        assert!(!filter.matches(&Record::new().with("id", "b").with("deleted", true)));
        assert!(!filter.matches(&Record::new().with("id", "c")));
        assert!(ScanFilter::all().matches(&Record::new()));
    }
}
