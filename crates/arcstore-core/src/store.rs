//! # Store Client Capability
//!
//! The minimal capability interface over the backing wide-column table
//! service: describe/create/delete table, one page of a scan, one item
//! put. This is the sole dependency edge between the graph table logic
//! and any concrete store, so the logic is testable against
//! [`MemoryStore`](crate::storage::MemoryStore) and deployable against a
//! remote wire adapter without change.
//!
//! No retries or backoff are specified at this layer; transient-failure
//! policy belongs to the adapter implementation and is opaque here.

use crate::error::StoreError;
use crate::record::EdgeRecord;
use crate::schema::TableSchema;
use serde::{Deserialize, Serialize};

// =============================================================================
// CONTINUATION TOKEN
// =============================================================================

/// Opaque marker indicating where the next scan page should resume.
///
/// Tokens are produced and consumed only by the adapter that issued
/// them; callers treat the contents as meaningless bytes. Absence of a
/// token means the scan is exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuationToken(Vec<u8>);

impl ContinuationToken {
    /// Wrap adapter-encoded resume state.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The adapter-encoded resume state.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

// =============================================================================
// TABLE DESCRIPTION
// =============================================================================

/// Lifecycle status reported by describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    Creating,
    Active,
    Deleting,
    /// Any status string this client does not know.
    #[serde(other)]
    Unknown,
}

/// What describe returns for a present table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescription {
    pub name: String,
    pub status: TableStatus,
}

// =============================================================================
// SCAN PAGE
// =============================================================================

/// One bounded batch of records returned by a single scan round-trip.
#[derive(Debug, Clone)]
pub struct ScanPage {
    /// Records in the store's natural order.
    pub records: Vec<EdgeRecord>,
    /// Store-reported record count for this page.
    pub count: u64,
    /// Resume marker for the next page; `None` means the scan is
    /// exhausted and this page is the last one.
    pub next: Option<ContinuationToken>,
}

// =============================================================================
// STORE CLIENT TRAIT
// =============================================================================

/// The five store operations the graph table logic is built on.
///
/// All methods block until the store answers. Implementations must be
/// usable through a shared reference; stores that mutate in-process
/// state use interior mutability.
pub trait StoreClient {
    /// Fetch the description of a table. Used as an existence probe.
    ///
    /// Returns [`StoreError::NotFound`] when the table is absent.
    fn describe_table(&self, name: &str) -> Result<TableDescription, StoreError>;

    /// Create a table with the given physical schema.
    ///
    /// Returns [`StoreError::AlreadyExists`] when a table of that name
    /// is already present; never silently no-ops.
    fn create_table(&self, schema: &TableSchema) -> Result<(), StoreError>;

    /// Delete a table and all of its data, irrevocably.
    ///
    /// Returns [`StoreError::NotFound`] when the table is absent.
    fn delete_table(&self, name: &str) -> Result<(), StoreError>;

    /// Fetch at most `limit` records of a full table scan, resuming
    /// from `start` when given.
    ///
    /// The returned page's `next` is `None` exactly when the store
    /// reports no further pages.
    fn scan_page(
        &self,
        table: &str,
        limit: u32,
        start: Option<&ContinuationToken>,
    ) -> Result<ScanPage, StoreError>;

    /// Insert or overwrite one record, keyed by its (source, target)
    /// pair. Last write wins; no optimistic concurrency check.
    fn put_item(&self, table: &str, record: &EdgeRecord) -> Result<(), StoreError>;
}
