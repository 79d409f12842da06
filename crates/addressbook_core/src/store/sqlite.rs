//! SQLite-backed item store.
//!
//! # Responsibility
//! - Map logical tables onto the single physical `items` table.
//! - Apply conditional updates as read, assign, write-back inside one
//!   transaction, touching only assigned attributes.
//!
//! # Invariants
//! - `item_key` is the canonical JSON of the `RecordKey`.
//! - `attributes` always holds a JSON object of scalar values.

use super::{ItemStore, ScanFilter, StoreError, StoreResult, UpdateSet};
use crate::model::record::{Record, RecordKey};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

/// Item store over one logical table inside the shared `items` table.
pub struct SqliteItemStore<'conn> {
    conn: &'conn Connection,
    table_name: String,
}

impl<'conn> SqliteItemStore<'conn> {
    pub fn new(conn: &'conn Connection, table_name: impl Into<String>) -> Self {
        Self {
            conn,
            table_name: table_name.into(),
        }
    }

    fn read_item(&self, conn: &Connection, item_key: &str) -> StoreResult<Option<Record>> {
        let attributes = conn
            .query_row(
                "SELECT attributes
                 FROM items
                 WHERE table_name = ?1 AND item_key = ?2;",
                params![self.table_name, item_key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        attributes
            .map(|raw| parse_attributes(&self.table_name, &raw))
            .transpose()
    }
}

impl ItemStore for SqliteItemStore<'_> {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    fn get(&self, key: &RecordKey) -> StoreResult<Option<Record>> {
        let item_key = key.to_canonical_json()?;
        self.read_item(self.conn, &item_key)
    }

    fn put(&self, key: &RecordKey, record: &Record) -> StoreResult<()> {
        let item_key = key.to_canonical_json()?;
        let attributes = serde_json::to_string(record)?;

        self.conn.execute(
            "INSERT INTO items (table_name, item_key, attributes)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (table_name, item_key) DO UPDATE SET
                attributes = excluded.attributes,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![self.table_name, item_key, attributes],
        )?;

        debug!(
            "event=store_put module=store status=ok table={} key={}",
            self.table_name, key
        );
        Ok(())
    }

    fn scan(&self, filter: &ScanFilter) -> StoreResult<Vec<Record>> {
        let mut stmt = self.conn.prepare(
            "SELECT attributes
             FROM items
             WHERE table_name = ?1
             ORDER BY rowid ASC;",
        )?;
        let mut rows = stmt.query([self.table_name.as_str()])?;

        let mut scanned = 0usize;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            scanned += 1;
            let raw: String = row.get(0)?;
            let record = parse_attributes(&self.table_name, &raw)?;
            if filter.matches(&record) {
                records.push(record);
            }
        }

        debug!(
            "event=store_scan module=store status=ok table={} scanned={} matched={}",
            self.table_name,
            scanned,
            records.len()
        );
        Ok(records)
    }

    fn update(&self, key: &RecordKey, update: &UpdateSet) -> StoreResult<Record> {
        let item_key = key.to_canonical_json()?;
        let condition_failed = || StoreError::ConditionFailed {
            table: self.table_name.clone(),
            key: key.to_string(),
        };

        let tx = self.conn.unchecked_transaction()?;
        let current = self.read_item(&tx, &item_key)?.ok_or_else(condition_failed)?;
        if update.is_empty() {
            tx.commit()?;
            return Ok(current);
        }

        let updated = update.apply_to(&current);
        let attributes = serde_json::to_string(&updated)?;
        let changed = tx.execute(
            "UPDATE items
             SET
                attributes = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE table_name = ?1 AND item_key = ?2;",
            params![self.table_name, item_key, attributes],
        )?;
        if changed == 0 {
            return Err(condition_failed());
        }
        tx.commit()?;

        debug!(
            "event=store_update module=store status=ok table={} key={} expression=\"{}\" names={:?}",
            self.table_name,
            key,
            update.expression(),
            update.expression_attribute_names()
        );
        Ok(updated)
    }
}

fn parse_attributes(table_name: &str, raw: &str) -> StoreResult<Record> {
    serde_json::from_str::<Record>(raw).map_err(|err| {
        StoreError::InvalidData(format!(
            "invalid attributes JSON in `{table_name}` item: {err}"
        ))
    })
}
