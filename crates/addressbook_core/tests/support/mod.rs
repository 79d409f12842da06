#![allow(dead_code)]

use addressbook_core::{
    ItemStore, Record, RecordKey, ScanFilter, SqliteItemStore, StoreResult, UpdateSet,
};
use rusqlite::Connection;
use std::cell::{Cell, RefCell};

/// Item store wrapper that counts writes and keeps every update set.
pub struct RecordingStore<'conn> {
    inner: SqliteItemStore<'conn>,
    puts: Cell<usize>,
    updates: RefCell<Vec<UpdateSet>>,
}

impl<'conn> RecordingStore<'conn> {
    pub fn new(conn: &'conn Connection, table_name: &str) -> Self {
        Self {
            inner: SqliteItemStore::new(conn, table_name),
            puts: Cell::new(0),
            updates: RefCell::new(Vec::new()),
        }
    }

    pub fn put_count(&self) -> usize {
        self.puts.get()
    }

    pub fn update_count(&self) -> usize {
        self.updates.borrow().len()
    }

    pub fn write_count(&self) -> usize {
        self.put_count() + self.update_count()
    }

    pub fn last_update(&self) -> Option<UpdateSet> {
        self.updates.borrow().last().cloned()
    }

    /// Writes directly to the wrapped store without counting.
    pub fn seed(&self, key: &RecordKey, record: &Record) {
        self.inner.put(key, record).unwrap();
    }
}

impl ItemStore for RecordingStore<'_> {
    fn table_name(&self) -> &str {
        self.inner.table_name()
    }

    fn get(&self, key: &RecordKey) -> StoreResult<Option<Record>> {
        self.inner.get(key)
    }

    fn put(&self, key: &RecordKey, record: &Record) -> StoreResult<()> {
        self.puts.set(self.puts.get() + 1);
        self.inner.put(key, record)
    }

    fn scan(&self, filter: &ScanFilter) -> StoreResult<Vec<Record>> {
        self.inner.scan(filter)
    }

    fn update(&self, key: &RecordKey, update: &UpdateSet) -> StoreResult<Record> {
        self.updates.borrow_mut().push(update.clone());
        self.inner.update(key, update)
    }
}

pub fn stored_address(id: &str) -> Record {
    Record::new()
        .with("id", id)
        .with("apt", "52")
        .with("residential_city", "Champaign")
        .with("deleted", false)
        .with("building", "53")
        .with("residential_state", "IL")
        .with("street", "Main St")
        .with("zip_code", "68080")
}
