//! # Error Types
//!
//! The error taxonomy for store and table operations.
//!
//! - No silent failures: every fallible operation returns
//!   `Result<T, StoreError>`. The one documented exception is
//!   [`GraphTable::exists`](crate::table::GraphTable::exists), which
//!   collapses every describe failure into `false`.
//! - Store-originated failures are not distinguished further at this
//!   layer; they propagate verbatim inside [`StoreError::Service`] and
//!   the caller decides whether to abort.

use thiserror::Error;

/// Errors surfaced by store adapters and the graph table service.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Caller-supplied configuration violates a stated constraint.
    /// Never retried; surfaced before any store call is made.
    #[error("validation: {0}")]
    Validation(String),

    /// The target table is absent for an operation requiring presence.
    #[error("not found: {0}")]
    NotFound(String),

    /// Create was issued against a table that is already present.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Any failure originating from the backing store: network,
    /// throttling, permissions, malformed response.
    #[error("service error: {0}")]
    Service(String),
}
