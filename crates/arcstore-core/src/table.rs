//! # Graph Table Service
//!
//! [`GraphTable`] binds a table name to a [`StoreClient`] and exposes
//! the lifecycle and data operations of a graph table: existence probe,
//! create, delete, single-record put, and the paginated read walk.
//!
//! The table holds no state beyond the name and the client - no cached
//! schema, no row data. Construct one per command invocation and drop
//! it when done.

use crate::error::StoreError;
use crate::record::EdgeRecord;
use crate::schema::TableSchema;
use crate::store::{ContinuationToken, StoreClient};

/// Page size used when the caller configures `0`.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Largest page size a walk may request per scan round-trip.
pub const MAX_PAGE_SIZE: u32 = 1000;

// =============================================================================
// READ WALK CONFIGURATION
// =============================================================================

/// Configuration for [`GraphTable::read_walk`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadWalkInput {
    /// Records requested per scan round-trip. `0` selects
    /// [`DEFAULT_PAGE_SIZE`]; values above [`MAX_PAGE_SIZE`] fail
    /// validation before any store call is made.
    pub page_size: u32,
}

impl ReadWalkInput {
    /// Create a configuration with the given page size.
    #[must_use]
    pub const fn new(page_size: u32) -> Self {
        Self { page_size }
    }

    /// The configured page size with the default applied.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        if self.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        }
    }

    fn validate(&self) -> Result<(), StoreError> {
        if self.page_size > MAX_PAGE_SIZE {
            return Err(StoreError::Validation(format!(
                "page size {} exceeds maximum {}",
                self.page_size, MAX_PAGE_SIZE
            )));
        }
        Ok(())
    }
}

/// One page of a read walk as handed to the walk callback.
#[derive(Debug, Clone)]
pub struct ReadPage {
    /// Records of this page, after any client-side filter was applied.
    pub records: Vec<EdgeRecord>,
    /// Store-reported count for the page, before filtering.
    pub count: u64,
}

// =============================================================================
// GRAPH TABLE
// =============================================================================

/// A named graph table bound to a store client.
#[derive(Debug, Clone)]
pub struct GraphTable<C> {
    name: String,
    client: C,
}

impl<C: StoreClient> GraphTable<C> {
    /// Bind a table name to a store client.
    #[must_use]
    pub fn new(client: C, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            client,
        }
    }

    /// The table name this service operates on.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the table currently exists.
    ///
    /// True iff describe succeeds. Every describe failure - including a
    /// genuine service outage - reads as `false`. This conflation is a
    /// documented simplification of the existence probe, not an
    /// invitation to treat `false` as authoritative absence.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.client.describe_table(&self.name).is_ok()
    }

    /// Create the table with the graph schema: composite primary key
    /// (`source-key` hash, `target-key` range), the `reverse-search`
    /// keys-only index, on-demand billing.
    ///
    /// Fails with [`StoreError::AlreadyExists`] when the table is
    /// present. Deciding whether to delete-then-recreate is the
    /// caller's job, via [`exists`](Self::exists) /
    /// [`delete`](Self::delete) / [`create`](Self::create).
    pub fn create(&self) -> Result<(), StoreError> {
        self.client.create_table(&TableSchema::graph(&self.name))
    }

    /// Delete the table and all of its data. No soft-delete, no backup.
    ///
    /// Fails with [`StoreError::NotFound`] when the table is absent.
    pub fn delete(&self) -> Result<(), StoreError> {
        self.client.delete_table(&self.name)
    }

    /// Insert or overwrite one record. A put with the same
    /// (source, target) pair silently replaces the prior record's extra
    /// attributes - last write wins.
    pub fn put(&self, record: &EdgeRecord) -> Result<(), StoreError> {
        self.client.put_item(&self.name, record)
    }

    /// Walk the whole table page by page.
    ///
    /// The walk requests pages of [`ReadWalkInput::limit`] records and
    /// invokes `walk` once per page with the page and an `is_last` flag
    /// that is true exactly when the store reports no further pages.
    /// The callback's return value is the sole continuation control:
    /// `false` stops the walk immediately even if pages remain, `true`
    /// requests the next page. The final page is surfaced exactly once;
    /// no empty terminal page is fetched beyond what the store reports.
    ///
    /// Pages arrive in the store's natural scan order, which the store
    /// does not guarantee to be stable; results are repeatable only to
    /// the extent the backing store's scan order is.
    ///
    /// No results accumulate inside the walk - each page is transient,
    /// and cross-page aggregation is the callback's responsibility.
    pub fn read_walk<F>(&self, input: ReadWalkInput, walk: F) -> Result<(), StoreError>
    where
        F: FnMut(&ReadPage, bool) -> bool,
    {
        self.read_walk_filtered(input, |_| true, walk)
    }

    /// [`read_walk`](Self::read_walk) with a client-side record filter.
    ///
    /// The predicate runs against every record before it reaches the
    /// page; the page's `count` stays the store-reported count, so
    /// callers can still track scan progress. The walk itself applies
    /// no server-side filtering - this is purely an extension point for
    /// callers that want to narrow what they see.
    pub fn read_walk_filtered<P, F>(
        &self,
        input: ReadWalkInput,
        mut filter: P,
        mut walk: F,
    ) -> Result<(), StoreError>
    where
        P: FnMut(&EdgeRecord) -> bool,
        F: FnMut(&ReadPage, bool) -> bool,
    {
        input.validate()?;
        let limit = input.limit();
        let mut start: Option<ContinuationToken> = None;

        loop {
            let page = self.client.scan_page(&self.name, limit, start.as_ref())?;
            let is_last = page.next.is_none();
            let visible = ReadPage {
                records: page
                    .records
                    .into_iter()
                    .filter(|record| filter(record))
                    .collect(),
                count: page.count,
            };
            let proceed = walk(&visible, is_last);
            if is_last || !proceed {
                return Ok(());
            }
            start = page.next;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
