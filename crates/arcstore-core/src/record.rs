//! # Edge Records
//!
//! The unit of storage: one directed edge of the graph, keyed by the
//! composite primary key (`source-key`, `target-key`) plus an open map
//! of extra string attributes.
//!
//! A record whose source equals its target represents a self-referencing
//! node and renders in a distinct bracketed form.

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Column name of the partition half of the composite primary key.
pub const SOURCE_KEY_ATTRIBUTE: &str = "source-key";

/// Column name of the sort half of the composite primary key.
pub const TARGET_KEY_ATTRIBUTE: &str = "target-key";

// =============================================================================
// EDGE RECORD
// =============================================================================

/// A stored (source, target, attributes) tuple representing a graph edge
/// or a self-referencing node.
///
/// The pair (source, target) uniquely identifies a record. Extra
/// attributes are held in a `BTreeMap`, so iteration order - and
/// therefore rendered output - is deterministic regardless of the order
/// attributes were inserted in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    source: String,
    target: String,
    extra: BTreeMap<String, String>,
}

impl EdgeRecord {
    /// Create a record with no extra attributes.
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Reassemble a record from its stored parts.
    ///
    /// Adapters use this when decoding rows read back from a store.
    /// Returns [`StoreError::Validation`] if the extra-attribute map
    /// contains a key that collides with the primary key columns.
    pub fn from_parts(
        source: impl Into<String>,
        target: impl Into<String>,
        extra: BTreeMap<String, String>,
    ) -> Result<Self, StoreError> {
        for key in extra.keys() {
            check_reserved(key)?;
        }
        Ok(Self {
            source: source.into(),
            target: target.into(),
            extra,
        })
    }

    /// The origin node identifier.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The destination node identifier.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// True when the record represents a self-referencing node.
    #[must_use]
    pub fn is_self_edge(&self) -> bool {
        self.source == self.target
    }

    /// The extra attributes, keyed by column name.
    #[must_use]
    pub fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }

    /// Insert (or overwrite) an extra attribute.
    ///
    /// Returns [`StoreError::Validation`] if the key collides with
    /// `source-key` or `target-key` - such an attribute would shadow the
    /// primary key in the stored row.
    pub fn insert_extra(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), StoreError> {
        let key = key.into();
        check_reserved(&key)?;
        self.extra.insert(key, value.into());
        Ok(())
    }

    /// Builder-style variant of [`EdgeRecord::insert_extra`].
    pub fn with_extra(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, StoreError> {
        self.insert_extra(key, value)?;
        Ok(self)
    }
}

fn check_reserved(key: &str) -> Result<(), StoreError> {
    if key == SOURCE_KEY_ATTRIBUTE || key == TARGET_KEY_ATTRIBUTE {
        return Err(StoreError::Validation(format!(
            "attribute name '{key}' collides with the primary key"
        )));
    }
    Ok(())
}

// =============================================================================
// CANONICAL DISPLAY FORM
// =============================================================================

/// Canonical text rendering of a record.
///
/// Extra attributes appear as `key:value` pairs separated by single
/// spaces, sorted lexicographically by key. Two forms:
///
/// - self-edge: `[source] attr1:v1 attr2:v2`
/// - directed edge: `source -> target attr1:v1 attr2:v2`
///
/// With zero extra attributes the output keeps a trailing space; this is
/// a display-only concern and callers must not rely on its absence.
impl fmt::Display for EdgeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let extra = self
            .extra
            .iter()
            .map(|(key, value)| format!("{key}:{value}"))
            .collect::<Vec<_>>()
            .join(" ");
        if self.is_self_edge() {
            write!(f, "[{}] {}", self.source, extra)
        } else {
            write!(f, "{} -> {} {}", self.source, self.target, extra)
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn directed_edge_renders_arrow_form() {
        let record = EdgeRecord::new("A", "B")
            .with_extra("tag", "x")
            .unwrap()
            .with_extra("data", "y")
            .unwrap();

        assert_eq!(record.to_string(), "A -> B data:y tag:x");
    }

    #[test]
    fn self_edge_renders_bracketed_form() {
        let record = EdgeRecord::new("A", "A").with_extra("tag", "node").unwrap();

        assert_eq!(record.to_string(), "[A] tag:node");
    }

    #[test]
    fn render_is_independent_of_insertion_order() {
        let forward = EdgeRecord::new("A", "B")
            .with_extra("tag", "x")
            .unwrap()
            .with_extra("data", "y")
            .unwrap();
        let backward = EdgeRecord::new("A", "B")
            .with_extra("data", "y")
            .unwrap()
            .with_extra("tag", "x")
            .unwrap();

        assert_eq!(forward.to_string(), backward.to_string());
    }

    #[test]
    fn reserved_attribute_names_rejected() {
        let mut record = EdgeRecord::new("A", "B");

        let source = record.insert_extra(SOURCE_KEY_ATTRIBUTE, "v");
        assert!(matches!(source, Err(StoreError::Validation(_))));

        let target = record.insert_extra(TARGET_KEY_ATTRIBUTE, "v");
        assert!(matches!(target, Err(StoreError::Validation(_))));
    }

    #[test]
    fn from_parts_rejects_reserved_keys() {
        let mut extra = BTreeMap::new();
        extra.insert(SOURCE_KEY_ATTRIBUTE.to_string(), "v".to_string());

        let result = EdgeRecord::from_parts("A", "B", extra);
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[test]
    fn insert_extra_overwrites_existing_key() {
        let mut record = EdgeRecord::new("A", "B");
        record.insert_extra("weight", "3").unwrap();
        record.insert_extra("weight", "5").unwrap();

        assert_eq!(record.extra().get("weight").map(String::as_str), Some("5"));
    }
}
