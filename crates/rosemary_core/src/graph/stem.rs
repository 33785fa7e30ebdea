//! Labelled, undirected connection graph over leaf ids.
//!
//! # Responsibility
//! - Own the adjacency table used by traversal and ranking.
//! - Keep both directed halves of every edge in lock-step.
//!
//! # Invariants
//! - Symmetry: `(a, b, label)` present iff `(b, a, label)` present.
//! - No self-loops are ever stored.
//! - Re-connecting a pair overwrites its label; parallel edges do not exist.
//! - A leaf with no edges has no adjacency entry unless one was explicitly
//!   recorded in an imported payload.

use crate::model::leaf::LeafId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Adjacency list entry of one leaf, as written to structured exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StemRecord {
    pub leaf_id: LeafId,
    /// `[neighborId, label]` pairs.
    #[serde(default)]
    pub connections: Vec<(LeafId, String)>,
}

/// Connection graph. Ordered maps keep iteration deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stem {
    adjacency: BTreeMap<LeafId, BTreeMap<LeafId, String>>,
}

impl Stem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects `a` and `b` with `label`, overwriting any previous label.
    ///
    /// Returns `false` without touching the graph when `a == b`.
    pub fn connect_pair(&mut self, a: &LeafId, b: &LeafId, label: impl Into<String>) -> bool {
        if a == b {
            return false;
        }
        let label = label.into();
        self.adjacency
            .entry(a.clone())
            .or_default()
            .insert(b.clone(), label.clone());
        self.adjacency
            .entry(b.clone())
            .or_default()
            .insert(a.clone(), label);
        true
    }

    /// Returns `(neighbor, label)` pairs of `id`; empty for unknown ids.
    pub fn connected_leaves(&self, id: &LeafId) -> Vec<(&LeafId, &str)> {
        self.adjacency
            .get(id)
            .map(|neighbors| {
                neighbors
                    .iter()
                    .map(|(neighbor, label)| (neighbor, label.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Neighbor ids of `id` in ascending id order.
    pub fn neighbors<'a>(&'a self, id: &LeafId) -> impl Iterator<Item = &'a LeafId> + 'a {
        self.adjacency
            .get(id)
            .into_iter()
            .flat_map(|neighbors| neighbors.keys())
    }

    pub fn degree(&self, id: &LeafId) -> usize {
        self.adjacency.get(id).map_or(0, BTreeMap::len)
    }

    pub fn has_connection(&self, a: &LeafId, b: &LeafId) -> bool {
        self.adjacency
            .get(a)
            .is_some_and(|neighbors| neighbors.contains_key(b))
    }

    /// Label of the `a`–`b` edge, or `None` when they are not connected.
    pub fn relationship_type(&self, a: &LeafId, b: &LeafId) -> Option<&str> {
        self.adjacency
            .get(a)
            .and_then(|neighbors| neighbors.get(b))
            .map(String::as_str)
    }

    /// Drops every edge touching `id`.
    pub fn remove_leaf_connections(&mut self, id: &LeafId) {
        let Some(neighbors) = self.adjacency.remove(id) else {
            return;
        };
        for neighbor in neighbors.keys() {
            if let Some(back) = self.adjacency.get_mut(neighbor) {
                back.remove(id);
                if back.is_empty() {
                    self.adjacency.remove(neighbor);
                }
            }
        }
    }

    /// Number of unordered edges.
    pub fn total_connections(&self) -> usize {
        let directed: usize = self.adjacency.values().map(BTreeMap::len).sum();
        directed / 2
    }

    /// Unordered edges as `(a, b, label)` with `a < b`.
    pub fn edges(&self) -> Vec<(&LeafId, &LeafId, &str)> {
        self.adjacency
            .iter()
            .flat_map(|(a, neighbors)| {
                neighbors
                    .iter()
                    .filter(move |(b, _)| a < *b)
                    .map(move |(b, label)| (a, b, label.as_str()))
            })
            .collect()
    }

    /// Ids that own an adjacency entry, in ascending order.
    pub fn leaf_ids(&self) -> impl Iterator<Item = &LeafId> {
        self.adjacency.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn to_records(&self) -> Vec<StemRecord> {
        self.adjacency
            .iter()
            .map(|(leaf_id, neighbors)| StemRecord {
                leaf_id: leaf_id.clone(),
                connections: neighbors
                    .iter()
                    .map(|(neighbor, label)| (neighbor.clone(), label.clone()))
                    .collect(),
            })
            .collect()
    }

    /// Rebuilds a graph from exported records.
    ///
    /// Every half-edge goes through `connect_pair`, so one-sided records are
    /// mirrored and self-loops dropped. When both halves carry different
    /// labels the later record wins. Explicitly recorded empty lists are kept.
    pub fn from_records(records: impl IntoIterator<Item = StemRecord>) -> Self {
        let mut stem = Self::new();
        for record in records {
            if record.connections.is_empty() {
                stem.adjacency.entry(record.leaf_id).or_default();
                continue;
            }
            for (neighbor, label) in record.connections {
                stem.connect_pair(&record.leaf_id, &neighbor, label);
            }
        }
        stem
    }
}
