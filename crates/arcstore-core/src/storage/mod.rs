//! # Store Backends
//!
//! First-class [`StoreClient`](crate::store::StoreClient)
//! implementations that ship with the core:
//!
//! - [`MemoryStore`] - deterministic in-memory tables; shared-state
//!   clones make it the natural test double.
//! - [`RedbStore`] - an embedded, crash-safe local store backed by a
//!   single redb database file.
//!
//! Remote wire adapters live outside the core, next to the transport
//! they speak.

pub mod memory;
pub mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;
