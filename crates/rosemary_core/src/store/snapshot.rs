//! Whole-store snapshot used by structured export/import.
//!
//! # Invariants
//! - `import_data(export_data())` restores the same leaves, edges and
//!   registry.
//! - Missing `connections`/`tags` keys degrade to empty collections.
//! - Imported state never violates the registry or edge invariants: payload
//!   tags without carriers and edges to unknown leaves are dropped.

use super::Rosemary;
use crate::graph::stem::{Stem, StemRecord};
use crate::model::leaf::{Leaf, LeafRecord};
use log::{info, warn};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Structured export payload: `{leaves, connections, tags}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportData {
    pub leaves: Vec<LeafRecord>,
    #[serde(default)]
    pub connections: Vec<StemRecord>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// What an import kept and what it had to drop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub leaves: usize,
    pub connections: usize,
    pub tags: usize,
    /// Leaf records whose id appeared earlier in the payload.
    pub duplicate_leaves: usize,
    /// Edges removed because an endpoint was not an imported leaf.
    pub dropped_connections: usize,
    /// Registry entries removed because no imported leaf carries them.
    pub dropped_tags: Vec<String>,
}

impl<G: RngCore> Rosemary<G> {
    /// Snapshot of leaves (insertion order), graph and registry.
    pub fn export_data(&self) -> ExportData {
        ExportData {
            leaves: self.leaves().map(LeafRecord::from).collect(),
            connections: self.stem.to_records(),
            tags: self.tags().map(str::to_string).collect(),
        }
    }

    /// Replaces the whole store state with `data`.
    pub fn import_data(&mut self, data: ExportData) -> ImportSummary {
        self.clear();
        let mut summary = ImportSummary::default();

        for record in data.leaves {
            if self.upsert_leaf(Leaf::from(record)).is_some() {
                summary.duplicate_leaves += 1;
            }
        }

        let mut stem = Stem::from_records(data.connections);
        let recorded = stem.total_connections();
        let unknown: Vec<_> = stem
            .leaf_ids()
            .filter(|id| !self.leaves.contains_key(*id))
            .cloned()
            .collect();
        for id in &unknown {
            stem.remove_leaf_connections(id);
        }
        summary.dropped_connections = recorded - stem.total_connections();
        self.stem = stem;

        summary.dropped_tags = data
            .tags
            .into_iter()
            .filter(|tag| !self.tags.contains_key(tag.trim()))
            .collect();

        summary.leaves = self.leaf_count();
        summary.connections = self.stem.total_connections();
        summary.tags = self.tag_count();

        if summary.duplicate_leaves > 0
            || summary.dropped_connections > 0
            || !summary.dropped_tags.is_empty()
        {
            warn!(
                "event=store_import module=store status=degraded duplicate_leaves={} dropped_connections={} dropped_tags={}",
                summary.duplicate_leaves,
                summary.dropped_connections,
                summary.dropped_tags.len()
            );
        }
        info!(
            "event=store_import module=store status=ok leaves={} connections={} tags={}",
            summary.leaves, summary.connections, summary.tags
        );
        summary
    }
}
