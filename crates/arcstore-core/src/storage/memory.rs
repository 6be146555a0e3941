//! # In-Memory Store
//!
//! A [`StoreClient`] over plain `BTreeMap`s. Rows scan in key order, so
//! walks over this backend are fully deterministic - which is exactly
//! what tests want and more than the capability contract promises.
//!
//! Clones share state through an `Arc`, so a test can hand a clone to a
//! [`GraphTable`](crate::table::GraphTable) and keep inspecting the
//! store through the original handle.

use crate::error::StoreError;
use crate::record::EdgeRecord;
use crate::schema::TableSchema;
use crate::store::{ContinuationToken, ScanPage, StoreClient, TableDescription, TableStatus};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared in-memory tables keyed by table name.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<BTreeMap<String, MemoryTable>>>,
}

#[derive(Debug)]
struct MemoryTable {
    schema: TableSchema,
    rows: BTreeMap<(String, String), EdgeRecord>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The schema a table was created with, if the table exists.
    #[must_use]
    pub fn table_schema(&self, name: &str) -> Option<TableSchema> {
        self.lock().get(name).map(|table| table.schema.clone())
    }

    /// Number of rows currently stored in a table, if the table exists.
    #[must_use]
    pub fn row_count(&self, name: &str) -> Option<usize> {
        self.lock().get(name).map(|table| table.rows.len())
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, MemoryTable>> {
        // A poisoned mutex only means another handle panicked mid-write;
        // the map itself is still structurally sound.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn encode_token(record: &EdgeRecord) -> Result<ContinuationToken, StoreError> {
    let key = (record.source(), record.target());
    let bytes = postcard::to_allocvec(&key)
        .map_err(|e| StoreError::Service(format!("encode continuation token: {e}")))?;
    Ok(ContinuationToken::from_bytes(bytes))
}

fn decode_token(token: &ContinuationToken) -> Result<(String, String), StoreError> {
    postcard::from_bytes(token.as_bytes())
        .map_err(|e| StoreError::Service(format!("malformed continuation token: {e}")))
}

impl StoreClient for MemoryStore {
    fn describe_table(&self, name: &str) -> Result<TableDescription, StoreError> {
        let tables = self.lock();
        if tables.contains_key(name) {
            Ok(TableDescription {
                name: name.to_string(),
                status: TableStatus::Active,
            })
        } else {
            Err(StoreError::NotFound(name.to_string()))
        }
    }

    fn create_table(&self, schema: &TableSchema) -> Result<(), StoreError> {
        let mut tables = self.lock();
        if tables.contains_key(&schema.table_name) {
            return Err(StoreError::AlreadyExists(schema.table_name.clone()));
        }
        tables.insert(
            schema.table_name.clone(),
            MemoryTable {
                schema: schema.clone(),
                rows: BTreeMap::new(),
            },
        );
        Ok(())
    }

    fn delete_table(&self, name: &str) -> Result<(), StoreError> {
        let mut tables = self.lock();
        tables
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn scan_page(
        &self,
        table: &str,
        limit: u32,
        start: Option<&ContinuationToken>,
    ) -> Result<ScanPage, StoreError> {
        let tables = self.lock();
        let rows = &tables
            .get(table)
            .ok_or_else(|| StoreError::NotFound(table.to_string()))?
            .rows;

        let lower = match start {
            Some(token) => Bound::Excluded(decode_token(token)?),
            None => Bound::Unbounded,
        };

        let mut iter = rows.range((lower, Bound::Unbounded));
        let records: Vec<EdgeRecord> = iter
            .by_ref()
            .take(limit as usize)
            .map(|(_, record)| record.clone())
            .collect();
        let next = if iter.next().is_some() {
            records.last().map(encode_token).transpose()?
        } else {
            None
        };

        Ok(ScanPage {
            count: records.len() as u64,
            records,
            next,
        })
    }

    fn put_item(&self, table: &str, record: &EdgeRecord) -> Result<(), StoreError> {
        let mut tables = self.lock();
        let rows = &mut tables
            .get_mut(table)
            .ok_or_else(|| StoreError::NotFound(table.to_string()))?
            .rows;
        rows.insert(
            (record.source().to_string(), record.target().to_string()),
            record.clone(),
        );
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn record(source: &str, target: &str) -> EdgeRecord {
        EdgeRecord::new(source, target)
    }

    #[test]
    fn lifecycle_errors() {
        let store = MemoryStore::new();

        assert!(matches!(
            store.describe_table("edges"),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_table("edges"),
            Err(StoreError::NotFound(_))
        ));

        store.create_table(&TableSchema::graph("edges")).unwrap();
        assert!(matches!(
            store.create_table(&TableSchema::graph("edges")),
            Err(StoreError::AlreadyExists(_))
        ));

        store.delete_table("edges").unwrap();
        assert!(matches!(
            store.describe_table("edges"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn describe_reports_active() {
        let store = MemoryStore::new();
        store.create_table(&TableSchema::graph("edges")).unwrap();

        let description = store.describe_table("edges").unwrap();
        assert_eq!(description.name, "edges");
        assert_eq!(description.status, TableStatus::Active);
    }

    #[test]
    fn put_replaces_on_same_composite_key() {
        let store = MemoryStore::new();
        store.create_table(&TableSchema::graph("edges")).unwrap();

        let first = record("A", "B").with_extra("weight", "3").unwrap();
        let second = record("A", "B").with_extra("weight", "5").unwrap();
        store.put_item("edges", &first).unwrap();
        store.put_item("edges", &second).unwrap();

        assert_eq!(store.row_count("edges"), Some(1));
        let page = store.scan_page("edges", 10, None).unwrap();
        assert_eq!(
            page.records[0].extra().get("weight").map(String::as_str),
            Some("5")
        );
    }

    #[test]
    fn scan_paginates_in_key_order() {
        let store = MemoryStore::new();
        store.create_table(&TableSchema::graph("edges")).unwrap();
        for (source, target) in [("A", "B"), ("A", "C"), ("B", "A"), ("B", "C"), ("C", "A")] {
            store.put_item("edges", &record(source, target)).unwrap();
        }

        let first = store.scan_page("edges", 2, None).unwrap();
        assert_eq!(first.count, 2);
        assert!(first.next.is_some());

        let second = store
            .scan_page("edges", 2, first.next.as_ref())
            .unwrap();
        assert_eq!(second.count, 2);
        assert!(second.next.is_some());

        let third = store
            .scan_page("edges", 2, second.next.as_ref())
            .unwrap();
        assert_eq!(third.count, 1);
        assert!(third.next.is_none());

        let mut seen: Vec<(String, String)> = Vec::new();
        for page in [&first, &second, &third] {
            for row in &page.records {
                seen.push((row.source().to_string(), row.target().to_string()));
            }
        }
        let mut sorted = seen.clone();
        sorted.sort();
        assert_eq!(seen, sorted);
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn exact_multiple_of_page_size_has_no_dangling_page() {
        let store = MemoryStore::new();
        store.create_table(&TableSchema::graph("edges")).unwrap();
        store.put_item("edges", &record("A", "B")).unwrap();
        store.put_item("edges", &record("B", "C")).unwrap();

        let page = store.scan_page("edges", 2, None).unwrap();
        assert_eq!(page.count, 2);
        assert!(page.next.is_none());
    }

    #[test]
    fn scan_against_missing_table_is_not_found() {
        let store = MemoryStore::new();

        assert!(matches!(
            store.scan_page("edges", 10, None),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn clones_share_state() {
        let store = MemoryStore::new();
        let clone = store.clone();
        clone.create_table(&TableSchema::graph("edges")).unwrap();

        assert!(store.describe_table("edges").is_ok());
    }
}
