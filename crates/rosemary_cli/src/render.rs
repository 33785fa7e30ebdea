//! Plain-text rendering of store views.

use rosemary_core::{FuzzyHit, Leaf, Stem, TagInfo};
use std::fmt::Write;

pub fn leaf_block(leaf: &Leaf) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID: {}", leaf.id());
    let _ = writeln!(out, "Content: {}", leaf.content());
    let _ = writeln!(out, "Tags: {}", leaf.tags().join(", "));
    out.push_str("---");
    out
}

pub fn leaf_list(leaves: &[&Leaf]) -> String {
    leaves
        .iter()
        .map(|leaf| leaf_block(leaf))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn leaf_with_connections(leaf: &Leaf, stem: &Stem) -> String {
    let mut out = leaf_block(leaf);
    for (neighbor, label) in stem.connected_leaves(leaf.id()) {
        if label.is_empty() {
            let _ = write!(out, "\n  -> {neighbor}");
        } else {
            let _ = write!(out, "\n  -> {neighbor} ({label})");
        }
    }
    out
}

pub fn fuzzy_hits(hits: &[FuzzyHit<'_>]) -> String {
    hits.iter()
        .map(|hit| {
            format!(
                "{:.3} [{}] {}\n{}",
                hit.score,
                hit.key,
                hit.leaf.id(),
                hit.leaf.content()
            )
        })
        .collect::<Vec<_>>()
        .join("\n---\n")
}

pub fn tag_infos(infos: &[TagInfo]) -> String {
    infos
        .iter()
        .map(|info| format!("{} ({})", info.name, info.count))
        .collect::<Vec<_>>()
        .join("\n")
}
