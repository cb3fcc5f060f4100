//! Flat settings keys folded into a nested configuration tree.
//!
//! Ini-style settings address nested structure through two kinds of key
//! segments: dotted names (`store.handler.base_url`) and bracket groups
//! (`store.handler.filters[0]`, `store['media']`). Rewriting every `[` to
//! `.[` makes the two uniform, after which a plain split on `.` yields the
//! path and the fold below builds the tree.

use std::collections::BTreeMap;

/// One node of the intermediate configuration tree.
///
/// A node may carry both a value and children: `store.handler = X` names a
/// type while `store.handler.base_url = ...` configures it, and both keys
/// land on the same `handler` node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigNode {
    /// Trimmed raw value for the key path ending at this node.
    pub value: Option<String>,
    /// Child nodes keyed by path segment (`handler`, `[0]`, `['thumbs']`).
    pub children: BTreeMap<String, ConfigNode>,
}

impl ConfigNode {
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.children.is_empty()
    }
}

/// Rewrite bracket groups into dot-delimited segments:
/// `store.filters[0][1]` becomes `store.filters.[0].[1]`.
fn normalize_key(key: &str) -> String {
    key.replace('[', ".[")
}

/// Fold every key of `settings` under `prefix` into a tree.
///
/// Only keys beginning with `prefix.` or `prefix[` participate; the returned
/// node is the subtree rooted at the prefix itself, empty when nothing
/// matched. Two keys addressing the same path overwrite each other,
/// last write wins.
pub fn collect_prefix<K, V>(prefix: &str, settings: impl IntoIterator<Item = (K, V)>) -> ConfigNode
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let dotted = format!("{prefix}.");
    let bracketed = format!("{prefix}[");

    let mut root = ConfigNode::default();
    for (key, value) in settings {
        let key = key.as_ref();
        if key.starts_with(&dotted) || key.starts_with(&bracketed) {
            insert_path(&mut root, &normalize_key(key), value.as_ref());
        }
    }

    // Everything folded in under the prefix's own segments; unwrap down to
    // the subtree the caller cares about.
    let mut node = root;
    for segment in normalize_key(prefix).split('.') {
        node = match node.children.remove(segment) {
            Some(child) => child,
            None => return ConfigNode::default(),
        };
    }
    node
}

fn insert_path(root: &mut ConfigNode, normalized_key: &str, value: &str) {
    let mut node = root;
    for segment in normalized_key.split('.') {
        node = node.children.entry(segment.to_string()).or_default();
    }
    node.value = Some(value.trim().to_string());
}
