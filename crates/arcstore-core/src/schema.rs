//! # Table Schema
//!
//! The physical schema of a graph table, expressed as plain data.
//!
//! Field and variant renames match the wide-column wire format exactly,
//! so adapters can serialize a [`TableSchema`] straight into a
//! `CreateTable` request body. The embedded backends persist the same
//! structures with postcard and interpret them structurally.

use crate::record::{SOURCE_KEY_ATTRIBUTE, TARGET_KEY_ATTRIBUTE};
use serde::{Deserialize, Serialize};

/// Name of the secondary index that inverts the primary key pair,
/// enabling lookup by target without a full scan.
pub const REVERSE_INDEX_NAME: &str = "reverse-search";

// =============================================================================
// SCHEMA ELEMENTS
// =============================================================================

/// Scalar type of a key attribute. Graph tables only key on strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeType {
    /// UTF-8 string.
    #[serde(rename = "S")]
    String,
}

/// Role an attribute plays in a key schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyRole {
    /// Partition key.
    Hash,
    /// Sort key within a partition.
    Range,
}

/// Declares an attribute referenced by a key schema or index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeDefinition {
    pub attribute_name: String,
    pub attribute_type: AttributeType,
}

/// One element of a (composite) key schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeySchemaElement {
    pub attribute_name: String,
    pub key_type: KeyRole,
}

/// Which attributes an index copies out of the base table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectionType {
    /// Only the index and primary key attributes.
    KeysOnly,
    /// Every attribute of the row.
    All,
}

/// Projection clause of a secondary index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Projection {
    pub projection_type: ProjectionType,
}

/// A secondary index over the base table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecondaryIndex {
    pub index_name: String,
    pub key_schema: Vec<KeySchemaElement>,
    pub projection: Projection,
}

/// Capacity mode of the table. Graph tables are always created
/// on-demand; no static throughput is provisioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingMode {
    PayPerRequest,
}

// =============================================================================
// TABLE SCHEMA
// =============================================================================

/// Full physical schema passed to `create_table`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableSchema {
    pub table_name: String,
    pub attribute_definitions: Vec<AttributeDefinition>,
    pub key_schema: Vec<KeySchemaElement>,
    pub billing_mode: BillingMode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_secondary_indexes: Vec<SecondaryIndex>,
}

impl TableSchema {
    /// The schema of a graph table.
    ///
    /// Primary key: `source-key` (hash) + `target-key` (range), both
    /// strings. One secondary index, [`REVERSE_INDEX_NAME`], inverts the
    /// roles with a keys-only projection so reverse-edge lookups never
    /// scan the whole table.
    #[must_use]
    pub fn graph(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            attribute_definitions: vec![
                AttributeDefinition {
                    attribute_name: SOURCE_KEY_ATTRIBUTE.to_string(),
                    attribute_type: AttributeType::String,
                },
                AttributeDefinition {
                    attribute_name: TARGET_KEY_ATTRIBUTE.to_string(),
                    attribute_type: AttributeType::String,
                },
            ],
            key_schema: vec![
                KeySchemaElement {
                    attribute_name: SOURCE_KEY_ATTRIBUTE.to_string(),
                    key_type: KeyRole::Hash,
                },
                KeySchemaElement {
                    attribute_name: TARGET_KEY_ATTRIBUTE.to_string(),
                    key_type: KeyRole::Range,
                },
            ],
            billing_mode: BillingMode::PayPerRequest,
            global_secondary_indexes: vec![SecondaryIndex {
                index_name: REVERSE_INDEX_NAME.to_string(),
                key_schema: vec![
                    KeySchemaElement {
                        attribute_name: TARGET_KEY_ATTRIBUTE.to_string(),
                        key_type: KeyRole::Hash,
                    },
                    KeySchemaElement {
                        attribute_name: SOURCE_KEY_ATTRIBUTE.to_string(),
                        key_type: KeyRole::Range,
                    },
                ],
                projection: Projection {
                    projection_type: ProjectionType::KeysOnly,
                },
            }],
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
    fn graph_schema_primary_key() {
        let schema = TableSchema::graph("edges");

        assert_eq!(schema.table_name, "edges");
        assert_eq!(schema.key_schema.len(), 2);
        assert_eq!(schema.key_schema[0].attribute_name, SOURCE_KEY_ATTRIBUTE);
        assert_eq!(schema.key_schema[0].key_type, KeyRole::Hash);
        assert_eq!(schema.key_schema[1].attribute_name, TARGET_KEY_ATTRIBUTE);
        assert_eq!(schema.key_schema[1].key_type, KeyRole::Range);
    }

    #[test]
    fn graph_schema_reverse_index_inverts_key_roles() {
        let schema = TableSchema::graph("edges");

        assert_eq!(schema.global_secondary_indexes.len(), 1);
        let index = &schema.global_secondary_indexes[0];
        assert_eq!(index.index_name, REVERSE_INDEX_NAME);
        assert_eq!(index.key_schema[0].attribute_name, TARGET_KEY_ATTRIBUTE);
        assert_eq!(index.key_schema[0].key_type, KeyRole::Hash);
        assert_eq!(index.key_schema[1].attribute_name, SOURCE_KEY_ATTRIBUTE);
        assert_eq!(index.key_schema[1].key_type, KeyRole::Range);
        assert_eq!(index.projection.projection_type, ProjectionType::KeysOnly);
    }

    #[test]
    fn graph_schema_is_on_demand() {
        let schema = TableSchema::graph("edges");

        assert_eq!(schema.billing_mode, BillingMode::PayPerRequest);
    }

    #[test]
    fn graph_schema_declares_both_key_attributes_as_strings() {
        let schema = TableSchema::graph("edges");

        let names: Vec<&str> = schema
            .attribute_definitions
            .iter()
            .map(|def| def.attribute_name.as_str())
            .collect();
        assert_eq!(names, vec![SOURCE_KEY_ATTRIBUTE, TARGET_KEY_ATTRIBUTE]);
        assert!(
            schema
                .attribute_definitions
                .iter()
                .all(|def| def.attribute_type == AttributeType::String)
        );
    }

    #[test]
    fn schema_roundtrips_through_postcard() {
        let schema = TableSchema::graph("edges");
        let bytes = postcard::to_allocvec(&schema).unwrap();
        let back: TableSchema = postcard::from_bytes(&bytes).unwrap();

        assert_eq!(back, schema);
    }
}
