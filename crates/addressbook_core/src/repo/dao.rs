//! Record access layer over one item store table.
//!
//! # Responsibility
//! - Translate key + record requests into store reads and writes.
//! - Compute minimal update sets for merge updates.
//! - Hide soft-deleted records from fetches and merge updates.
//!
//! # Invariants
//! - `insert` never overwrites an existing item, soft-deleted or not.
//! - `merge_update` issues no write when nothing changes.
//! - Store errors are passed through unmodified as `DaoError::Store`.
//!
//! Reads and writes are separate store calls, so `insert`, `soft_delete`
//! and `merge_update` have a check-then-act window. Callers needing strict
//! linearizability must add a store-level precondition.

use crate::model::record::{Record, RecordKey};
use crate::store::{ItemStore, ScanFilter, StoreError, UpdateSet};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type DaoResult<T> = Result<T, DaoError>;

#[derive(Debug)]
pub enum DaoError {
    /// An item already occupies the key.
    AlreadyExists(RecordKey),
    /// No live item exists at the key.
    NotFound(RecordKey),
    Store(StoreError),
}

impl Display for DaoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyExists(key) => write!(f, "item already exists: {key}"),
            Self::NotFound(key) => write!(f, "unable to find a live item: {key}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DaoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::AlreadyExists(_) | Self::NotFound(_) => None,
        }
    }
}

impl From<StoreError> for DaoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Data access object bound to one logical table.
pub struct Dao<S: ItemStore> {
    store: S,
}

impl<S: ItemStore> Dao<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn table_name(&self) -> &str {
        self.store.table_name()
    }

    /// Persists `record` at `key` unless any item already occupies the key.
    pub fn insert(&self, key: &RecordKey, record: Record) -> DaoResult<Record> {
        if self.store.get(key)?.is_some() {
            debug!(
                "event=dao_insert module=dao status=rejected table={} key={} reason=exists",
                self.table_name(),
                key
            );
            return Err(DaoError::AlreadyExists(key.clone()));
        }

        self.store.put(key, &record)?;
        info!(
            "event=dao_insert module=dao status=ok table={} key={}",
            self.table_name(),
            key
        );
        Ok(record)
    }

    /// Returns the live record at `key`, or `None` when absent or soft-deleted.
    pub fn fetch_by_key(&self, key: &RecordKey) -> DaoResult<Option<Record>> {
        let record = self.store.get(key)?.filter(|record| !record.is_deleted());
        debug!(
            "event=dao_fetch module=dao status=ok table={} key={} found={}",
            self.table_name(),
            key,
            record.is_some()
        );
        Ok(record)
    }

    /// Returns every live record in the table.
    pub fn fetch_all(&self) -> DaoResult<Vec<Record>> {
        let records = self.store.scan(&ScanFilter::live_only())?;
        debug!(
            "event=dao_fetch_all module=dao status=ok table={} count={}",
            self.table_name(),
            records.len()
        );
        Ok(records)
    }

    /// Sets the soft-delete flag on the item at `key` and returns it.
    ///
    /// Already-deleted items are written again unchanged.
    pub fn soft_delete(&self, key: &RecordKey) -> DaoResult<Record> {
        let mut record = self
            .store
            .get(key)?
            .ok_or_else(|| DaoError::NotFound(key.clone()))?;

        record.set_deleted(true);
        self.store.put(key, &record)?;
        info!(
            "event=dao_soft_delete module=dao status=ok table={} key={}",
            self.table_name(),
            key
        );
        Ok(record)
    }

    /// Merges `partial` into the live record at `key`.
    ///
    /// Only attributes whose values differ from the stored ones are written.
    /// When nothing differs no write is issued and the stored record is
    /// returned as-is.
    pub fn merge_update(&self, key: &RecordKey, partial: &Record) -> DaoResult<Record> {
        let current = self
            .fetch_by_key(key)?
            .filter(|record| !record.is_empty())
            .ok_or_else(|| DaoError::NotFound(key.clone()))?;

        let update = UpdateSet::diff(&current, partial);
        if update.is_empty() {
            info!(
                "event=dao_update module=dao status=skipped table={} key={} changed_fields=0",
                self.table_name(),
                key
            );
            return Ok(current);
        }

        let updated = self.store.update(key, &update)?;
        info!(
            "event=dao_update module=dao status=ok table={} key={} changed_fields={} expression=\"{}\"",
            self.table_name(),
            key,
            update.len(),
            update.expression()
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::{Dao, DaoError};
    use crate::db::open_db_in_memory;
    use crate::model::record::{Record, RecordKey};
    use crate::store::SqliteItemStore;

    #[test]
    fn soft_delete_of_missing_key_is_not_found() {
        let conn = open_db_in_memory().unwrap();
        let dao = Dao::new(SqliteItemStore::new(&conn, "addresses"));

        let err = dao.soft_delete(&RecordKey::id("nope")).unwrap_err();
        assert!(matches!(err, DaoError::NotFound(key) if key == RecordKey::id("nope")));
    }

    #[test]
    fn insert_returns_record_verbatim() {
        let conn = open_db_in_memory().unwrap();
        let dao = Dao::new(SqliteItemStore::new(&conn, "addresses"));
        let record = Record::new().with("id", "a1").with("deleted", false);

        let inserted = dao.insert(&RecordKey::id("a1"), record.clone()).unwrap();
        assert_eq!(inserted, record);
        assert_eq!(dao.table_name(), "addresses");
    }
}
