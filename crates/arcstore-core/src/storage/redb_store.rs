//! # redb-backed Store
//!
//! An embedded [`StoreClient`] over a single redb database file,
//! giving the CLI a local table service with ACID transactions and
//! crash safety (copy-on-write B-trees), zero configuration.
//!
//! Layout: one catalog table maps logical table name to its
//! postcard-encoded [`TableSchema`]; one edges table holds every row of
//! every logical table under the composite key
//! (table, source, target) -> postcard-encoded extra attributes.
//! Prefixing rows with the table name keeps each logical table a
//! contiguous key range, so scans and drops are range operations.

use crate::error::StoreError;
use crate::record::EdgeRecord;
use crate::schema::TableSchema;
use crate::store::{ContinuationToken, ScanPage, StoreClient, TableDescription, TableStatus};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::path::Path;

/// Catalog: logical table name -> postcard-encoded TableSchema.
const CATALOG: TableDefinition<&str, &[u8]> = TableDefinition::new("catalog");

/// Rows: (table, source, target) -> postcard-encoded extra attributes.
const EDGES: TableDefinition<(&str, &str, &str), &[u8]> = TableDefinition::new("edges");

/// An embedded local table store backed by one redb database file.
#[derive(Debug)]
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open or create a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = Database::create(path.as_ref()).map_err(service)?;

        // Initialize tables if they don't exist
        {
            let write_txn = db.begin_write().map_err(service)?;
            let _ = write_txn.open_table(CATALOG).map_err(service)?;
            let _ = write_txn.open_table(EDGES).map_err(service)?;
            write_txn.commit().map_err(service)?;
        }

        Ok(Self { db })
    }
}

fn service(e: impl std::fmt::Display) -> StoreError {
    StoreError::Service(e.to_string())
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

impl StoreClient for RedbStore {
    fn describe_table(&self, name: &str) -> Result<TableDescription, StoreError> {
        let read_txn = self.db.begin_read().map_err(service)?;
        let catalog = read_txn.open_table(CATALOG).map_err(service)?;

        if catalog.get(name).map_err(service)?.is_some() {
            Ok(TableDescription {
                name: name.to_string(),
                status: TableStatus::Active,
            })
        } else {
            Err(StoreError::NotFound(name.to_string()))
        }
    }

    fn create_table(&self, schema: &TableSchema) -> Result<(), StoreError> {
        let write_txn = self.db.begin_write().map_err(service)?;
        {
            let mut catalog = write_txn.open_table(CATALOG).map_err(service)?;
            if catalog
                .get(schema.table_name.as_str())
                .map_err(service)?
                .is_some()
            {
                return Err(StoreError::AlreadyExists(schema.table_name.clone()));
            }
            let bytes = postcard::to_allocvec(schema)
                .map_err(|e| StoreError::Service(format!("encode schema: {e}")))?;
            catalog
                .insert(schema.table_name.as_str(), bytes.as_slice())
                .map_err(service)?;
        }
        write_txn.commit().map_err(service)?;
        Ok(())
    }

    fn delete_table(&self, name: &str) -> Result<(), StoreError> {
        let write_txn = self.db.begin_write().map_err(service)?;
        {
            let mut catalog = write_txn.open_table(CATALOG).map_err(service)?;
            if catalog.remove(name).map_err(service)?.is_none() {
                return Err(StoreError::NotFound(name.to_string()));
            }
        }
        {
            let mut edges = write_txn.open_table(EDGES).map_err(service)?;
            let doomed: Vec<(String, String)> = {
                let mut keys = Vec::new();
                let range = edges
                    .range((Bound::Included((name, "", "")), Bound::Unbounded))
                    .map_err(service)?;
                for entry in range {
                    let (key, _) = entry.map_err(service)?;
                    let (owner, source, target) = key.value();
                    if owner != name {
                        break;
                    }
                    keys.push((source.to_string(), target.to_string()));
                }
                keys
            };
            for (source, target) in &doomed {
                edges
                    .remove((name, source.as_str(), target.as_str()))
                    .map_err(service)?;
            }
        }
        write_txn.commit().map_err(service)?;
        Ok(())
    }

    fn scan_page(
        &self,
        table: &str,
        limit: u32,
        start: Option<&ContinuationToken>,
    ) -> Result<ScanPage, StoreError> {
        let read_txn = self.db.begin_read().map_err(service)?;

        let catalog = read_txn.open_table(CATALOG).map_err(service)?;
        if catalog.get(table).map_err(service)?.is_none() {
            return Err(StoreError::NotFound(table.to_string()));
        }

        let resume = match start {
            Some(token) => Some(decode_token(token)?),
            None => None,
        };
        let lower = match &resume {
            Some((source, target)) => {
                Bound::Excluded((table, source.as_str(), target.as_str()))
            }
            None => Bound::Included((table, "", "")),
        };

        let edges = read_txn.open_table(EDGES).map_err(service)?;
        let mut records = Vec::new();
        let mut more = false;
        let range = edges.range((lower, Bound::Unbounded)).map_err(service)?;
        for entry in range {
            let (key, value) = entry.map_err(service)?;
            let (owner, source, target) = key.value();
            if owner != table {
                break;
            }
            if records.len() == limit as usize {
                more = true;
                break;
            }
            let extra: BTreeMap<String, String> = postcard::from_bytes(value.value())
                .map_err(|e| StoreError::Service(format!("decode row: {e}")))?;
            records.push(EdgeRecord::from_parts(source, target, extra)?);
        }

        let next = if more {
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
        let write_txn = self.db.begin_write().map_err(service)?;
        {
            let catalog = write_txn.open_table(CATALOG).map_err(service)?;
            if catalog.get(table).map_err(service)?.is_none() {
                return Err(StoreError::NotFound(table.to_string()));
            }
        }
        {
            let mut edges = write_txn.open_table(EDGES).map_err(service)?;
            let bytes = postcard::to_allocvec(record.extra())
                .map_err(|e| StoreError::Service(format!("encode row: {e}")))?;
            edges
                .insert(
                    (table, record.source(), record.target()),
                    bytes.as_slice(),
                )
                .map_err(service)?;
        }
        write_txn.commit().map_err(service)?;
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
    use tempfile::tempdir;

    fn record(source: &str, target: &str) -> EdgeRecord {
        EdgeRecord::new(source, target)
    }

    #[test]
    fn lifecycle_errors() {
        let temp = tempdir().expect("temp dir");
        let store = RedbStore::open(temp.path().join("test.redb")).expect("open store");

        assert!(matches!(
            store.describe_table("edges"),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_table("edges"),
            Err(StoreError::NotFound(_))
        ));

        store.create_table(&TableSchema::graph("edges")).unwrap();
        assert!(store.describe_table("edges").is_ok());
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
    fn rows_persist_across_reopen() {
        let temp = tempdir().expect("temp dir");
        let db_path = temp.path().join("test.redb");

        // Create and populate
        {
            let store = RedbStore::open(&db_path).expect("open store");
            store.create_table(&TableSchema::graph("edges")).unwrap();
            store
                .put_item("edges", &record("A", "B").with_extra("tag", "x").unwrap())
                .unwrap();
        }

        // Reopen and verify
        {
            let store = RedbStore::open(&db_path).expect("open store");
            let page = store.scan_page("edges", 10, None).unwrap();
            assert_eq!(page.count, 1);
            assert_eq!(page.records[0].source(), "A");
            assert_eq!(page.records[0].target(), "B");
            assert_eq!(
                page.records[0].extra().get("tag").map(String::as_str),
                Some("x")
            );
        }
    }

    #[test]
    fn scan_paginates_with_resume_tokens() {
        let temp = tempdir().expect("temp dir");
        let store = RedbStore::open(temp.path().join("test.redb")).expect("open store");
        store.create_table(&TableSchema::graph("edges")).unwrap();
        for (source, target) in [("A", "B"), ("A", "C"), ("B", "A"), ("B", "C"), ("C", "A")] {
            store.put_item("edges", &record(source, target)).unwrap();
        }

        let first = store.scan_page("edges", 2, None).unwrap();
        assert_eq!(first.count, 2);
        assert!(first.next.is_some());

        let second = store.scan_page("edges", 2, first.next.as_ref()).unwrap();
        assert_eq!(second.count, 2);
        assert!(second.next.is_some());

        let third = store.scan_page("edges", 2, second.next.as_ref()).unwrap();
        assert_eq!(third.count, 1);
        assert!(third.next.is_none());
    }

    #[test]
    fn exact_multiple_of_page_size_has_no_dangling_page() {
        let temp = tempdir().expect("temp dir");
        let store = RedbStore::open(temp.path().join("test.redb")).expect("open store");
        store.create_table(&TableSchema::graph("edges")).unwrap();
        store.put_item("edges", &record("A", "B")).unwrap();
        store.put_item("edges", &record("B", "C")).unwrap();

        let page = store.scan_page("edges", 2, None).unwrap();
        assert_eq!(page.count, 2);
        assert!(page.next.is_none());
    }

    #[test]
    fn put_replaces_on_same_composite_key() {
        let temp = tempdir().expect("temp dir");
        let store = RedbStore::open(temp.path().join("test.redb")).expect("open store");
        store.create_table(&TableSchema::graph("edges")).unwrap();

        store
            .put_item("edges", &record("A", "B").with_extra("weight", "3").unwrap())
            .unwrap();
        store
            .put_item("edges", &record("A", "B").with_extra("weight", "5").unwrap())
            .unwrap();

        let page = store.scan_page("edges", 10, None).unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(
            page.records[0].extra().get("weight").map(String::as_str),
            Some("5")
        );
    }

    #[test]
    fn delete_drains_only_that_tables_rows() {
        let temp = tempdir().expect("temp dir");
        let store = RedbStore::open(temp.path().join("test.redb")).expect("open store");
        store.create_table(&TableSchema::graph("first")).unwrap();
        store.create_table(&TableSchema::graph("second")).unwrap();
        store.put_item("first", &record("A", "B")).unwrap();
        store.put_item("second", &record("C", "D")).unwrap();

        store.delete_table("first").unwrap();

        assert!(matches!(
            store.scan_page("first", 10, None),
            Err(StoreError::NotFound(_))
        ));
        let survivors = store.scan_page("second", 10, None).unwrap();
        assert_eq!(survivors.count, 1);
        assert_eq!(survivors.records[0].source(), "C");
    }

    #[test]
    fn put_against_missing_table_is_not_found() {
        let temp = tempdir().expect("temp dir");
        let store = RedbStore::open(temp.path().join("test.redb")).expect("open store");

        assert!(matches!(
            store.put_item("edges", &record("A", "B")),
            Err(StoreError::NotFound(_))
        ));
    }
}
