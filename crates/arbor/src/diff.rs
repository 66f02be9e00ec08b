//! Structural comparison of two architecture documents.
//!
//! Resources are compared by name anywhere in the tree, connections by their
//! `(from, to)` pair. A connection present on both sides counts as changed
//! when its label or any of its style hints differ. Nothing is composed, so
//! documents that would fail validation can still be compared.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use log::debug;

use arbor_core::{
    diagram::Architecture,
    resource::{ConnectionEdge, EdgeHints},
};

use crate::validate::collect_names;

/// A connection identified by its source and target names.
pub type ConnectionKey = (String, String);

/// Differences between an old and a new document.
///
/// Every list is sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchitectureDiff {
    pub added_resources: Vec<String>,
    pub removed_resources: Vec<String>,
    pub added_connections: Vec<ConnectionKey>,
    pub removed_connections: Vec<ConnectionKey>,
    pub changed_connections: Vec<ConnectionKey>,
}

impl ArchitectureDiff {
    /// Returns true when the two documents are structurally equal.
    pub fn is_empty(&self) -> bool {
        self.added_resources.is_empty()
            && self.removed_resources.is_empty()
            && self.added_connections.is_empty()
            && self.removed_connections.is_empty()
            && self.changed_connections.is_empty()
    }
}

impl fmt::Display for ArchitectureDiff {
    /// One line per change: `+`/`-` for resources and connections, `~` for
    /// changed connections.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in &self.added_resources {
            writeln!(f, "+ {name}")?;
        }
        for name in &self.removed_resources {
            writeln!(f, "- {name}")?;
        }
        for (source, target) in &self.added_connections {
            writeln!(f, "+ {source} -> {target}")?;
        }
        for (source, target) in &self.removed_connections {
            writeln!(f, "- {source} -> {target}")?;
        }
        for (source, target) in &self.changed_connections {
            writeln!(f, "~ {source} -> {target}")?;
        }
        Ok(())
    }
}

/// Attributes of a connection that count towards a change.
type ConnectionAttrs<'a> = (Option<&'a str>, &'a EdgeHints);

/// Keys connections by endpoint pair. A repeated pair keeps the last one.
fn connections(edges: &[ConnectionEdge]) -> BTreeMap<ConnectionKey, ConnectionAttrs<'_>> {
    edges
        .iter()
        .map(|edge| {
            (
                (edge.source().to_string(), edge.target().to_string()),
                (edge.label(), edge.hints()),
            )
        })
        .collect()
}

/// Compares `old` against `new`.
pub fn diff(old: &Architecture, new: &Architecture) -> ArchitectureDiff {
    let old_names: BTreeSet<&str> = collect_names(&old.resources).into_iter().collect();
    let new_names: BTreeSet<&str> = collect_names(&new.resources).into_iter().collect();

    let old_connections = connections(&old.connections);
    let new_connections = connections(&new.connections);

    let result = ArchitectureDiff {
        added_resources: new_names
            .difference(&old_names)
            .map(|name| name.to_string())
            .collect(),
        removed_resources: old_names
            .difference(&new_names)
            .map(|name| name.to_string())
            .collect(),
        added_connections: new_connections
            .keys()
            .filter(|key| !old_connections.contains_key(*key))
            .cloned()
            .collect(),
        removed_connections: old_connections
            .keys()
            .filter(|key| !new_connections.contains_key(*key))
            .cloned()
            .collect(),
        changed_connections: old_connections
            .iter()
            .filter(|(key, attrs)| new_connections.get(*key).is_some_and(|new| new != *attrs))
            .map(|(key, _)| key.clone())
            .collect(),
    };

    debug!(
        added = result.added_resources.len(),
        removed = result.removed_resources.len(),
        changed_connections = result.changed_connections.len();
        "Architecture diff computed"
    );
    result
}
