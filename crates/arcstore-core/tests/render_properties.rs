//! # Render Property Tests
//!
//! The canonical display form must be deterministic: independent of
//! attribute insertion order, keys always sorted, and the self-edge
//! form used exactly when source equals target.

#![allow(clippy::unwrap_used, clippy::panic)]

use arcstore_core::EdgeRecord;
use proptest::prelude::*;
use std::collections::BTreeMap;

/// Attribute keys that cannot collide with the primary key columns and
/// stay parseable in the rendered `key:value` form.
fn extra_keys() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn extra_values() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{0,8}"
}

fn extras() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(extra_keys(), extra_values(), 0..6)
}

fn node_ids() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{1,8}"
}

proptest! {
    /// Inserting the same attributes forward and backward renders
    /// identically.
    #[test]
    fn render_independent_of_insertion_order(
        source in node_ids(),
        target in node_ids(),
        attrs in extras(),
    ) {
        let mut forward = EdgeRecord::new(&source, &target);
        for (key, value) in &attrs {
            forward.insert_extra(key, value).unwrap();
        }

        let mut backward = EdgeRecord::new(&source, &target);
        for (key, value) in attrs.iter().rev() {
            backward.insert_extra(key, value).unwrap();
        }

        prop_assert_eq!(forward.to_string(), backward.to_string());
    }

    /// Rendered attribute keys appear in ascending order.
    #[test]
    fn rendered_keys_are_sorted(
        source in node_ids(),
        target in node_ids(),
        attrs in extras(),
    ) {
        let mut record = EdgeRecord::new(&source, &target);
        for (key, value) in &attrs {
            record.insert_extra(key, value).unwrap();
        }

        let rendered = record.to_string();
        let tail = if record.is_self_edge() {
            rendered
                .strip_prefix(&format!("[{source}] "))
                .map(str::to_string)
        } else {
            rendered
                .strip_prefix(&format!("{source} -> {target} "))
                .map(str::to_string)
        };
        let tail = tail.expect("rendered form has the canonical prefix");

        let keys: Vec<&str> = tail
            .split_whitespace()
            .map(|pair| pair.split(':').next().unwrap_or(pair))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        prop_assert_eq!(keys, sorted);
    }

    /// The bracketed form is used exactly when source equals target.
    #[test]
    fn self_edge_form_matches_key_equality(
        source in node_ids(),
        target in node_ids(),
    ) {
        let record = EdgeRecord::new(&source, &target);
        let rendered = record.to_string();

        if source == target {
            let expected = format!("[{}]", source);
            prop_assert!(rendered.starts_with(&expected));
        } else {
            let expected = format!("{} -> {}", source, target);
            prop_assert!(rendered.starts_with(&expected));
        }
    }
}
