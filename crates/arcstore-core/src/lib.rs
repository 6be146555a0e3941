//! # arcstore-core
//!
//! The store-independent graph table model for Arcstore - THE LOGIC.
//!
//! Arcstore models a directed graph (source node -> target node, with
//! optional string attributes per edge) on top of a wide-column table
//! store. Each edge is one row, keyed by the composite primary key
//! (`source-key`, `target-key`); a secondary index inverts the key pair
//! so reverse lookups never need a full scan.
//!
//! ## Architectural Constraints
//!
//! - The CORE never talks to the network. Every store interaction goes
//!   through the [`StoreClient`] capability trait, so the table logic is
//!   testable against an in-memory store and deployable against a remote
//!   wire adapter without change.
//! - Deterministic: record attributes live in `BTreeMap`s, so iteration
//!   and rendering order never depend on insertion order.
//! - No async, no background work. Every operation is a blocking call
//!   that completes (or fails) before returning.

// =============================================================================
// MODULES
// =============================================================================

pub mod error;
pub mod record;
pub mod schema;
pub mod storage;
pub mod store;
pub mod table;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use error::StoreError;
pub use record::{EdgeRecord, SOURCE_KEY_ATTRIBUTE, TARGET_KEY_ATTRIBUTE};
pub use schema::{
    AttributeDefinition, AttributeType, BillingMode, KeyRole, KeySchemaElement, Projection,
    ProjectionType, REVERSE_INDEX_NAME, SecondaryIndex, TableSchema,
};
pub use store::{ContinuationToken, ScanPage, StoreClient, TableDescription, TableStatus};
pub use table::{DEFAULT_PAGE_SIZE, GraphTable, MAX_PAGE_SIZE, ReadPage, ReadWalkInput};

// =============================================================================
// RE-EXPORTS: Store Backends
// =============================================================================

pub use storage::{MemoryStore, RedbStore};
