//! Knowledge store: the composition root of leaves, tag registry and graph.
//!
//! # Responsibility
//! - Own every leaf, the global tag registry and one `Stem`.
//! - Expose all mutations, traversals, rankings and searches.
//!
//! # Invariants
//! - A tag is in the registry iff at least one live leaf carries it.
//! - Every graph edge joins two live leaves.
//! - Every mutation leaves leaves, registry and graph mutually consistent
//!   before returning.
//! - Lookup misses surface as `StoreError::NotFound`, never as defaults.
//!
//! # See also
//! - crate::graph::stem for edge symmetry rules.

mod ranking;
mod snapshot;
mod traversal;

pub use ranking::{LeafPage, SortKey, SortOrder, TagInfo};
pub use snapshot::{ExportData, ImportSummary};
pub use traversal::SimilarPair;

use crate::graph::stem::Stem;
use crate::model::leaf::{normalize_tag, Leaf, LeafId};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No live leaf carries the id.
    NotFound(LeafId),
    /// The operation needs at least one leaf.
    Empty,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "leaf with id {id} not found"),
            Self::Empty => write!(f, "knowledge store has no leaves"),
        }
    }
}

impl Error for StoreError {}

/// In-memory knowledge graph store.
///
/// `G` is the random source used for id generation and random walks; pass a
/// seeded generator through [`Rosemary::with_rng`] for reproducible results.
#[derive(Debug)]
pub struct Rosemary<G: RngCore = StdRng> {
    leaves: HashMap<LeafId, Leaf>,
    /// Leaf ids in insertion order.
    order: Vec<LeafId>,
    /// Tag -> number of live leaves carrying it.
    tags: BTreeMap<String, usize>,
    stem: Stem,
    rng: G,
}

impl Rosemary<StdRng> {
    /// Creates an empty store seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Creates an empty store with a reproducible random source.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Rosemary<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: RngCore> Rosemary<G> {
    pub fn with_rng(rng: G) -> Self {
        Self {
            leaves: HashMap::new(),
            order: Vec::new(),
            tags: BTreeMap::new(),
            stem: Stem::new(),
            rng,
        }
    }

    /// Creates a leaf with a fresh id and registers its tags.
    pub fn add_leaf<I, T>(&mut self, content: impl Into<String>, tags: I) -> LeafId
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let id = self.generate_id();
        let leaf = Leaf::new(id.clone(), content, tags);
        debug!(
            "event=leaf_add module=store status=ok leaf_id={} tag_count={}",
            id,
            leaf.tags().len()
        );
        self.insert_new(leaf);
        id
    }

    /// Inserts a leaf that already carries its identity.
    ///
    /// Replaces any live leaf with the same id (keeping its insertion slot and
    /// edges) and returns the replaced leaf.
    pub fn upsert_leaf(&mut self, leaf: Leaf) -> Option<Leaf> {
        let id = leaf.id().clone();
        match self.leaves.remove(&id) {
            Some(previous) => {
                self.release_tags(previous.tags());
                self.register_tags(leaf.tags());
                self.leaves.insert(id, leaf);
                Some(previous)
            }
            None => {
                self.insert_new(leaf);
                None
            }
        }
    }

    /// Looks a leaf up by id.
    pub fn leaf(&self, id: &LeafId) -> StoreResult<&Leaf> {
        self.leaves
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    pub fn contains_leaf(&self, id: &LeafId) -> bool {
        self.leaves.contains_key(id)
    }

    pub fn leaf_count(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All leaves in insertion order.
    pub fn leaves(&self) -> impl Iterator<Item = &Leaf> + '_ {
        self.order.iter().filter_map(|id| self.leaves.get(id))
    }

    /// Deletes a leaf, its unused tags and every edge touching it.
    pub fn remove_leaf(&mut self, id: &LeafId) -> StoreResult<Leaf> {
        let leaf = self
            .leaves
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        self.order.retain(|current| current != id);
        self.release_tags(leaf.tags());
        self.stem.remove_leaf_connections(id);
        info!(
            "event=leaf_remove module=store status=ok leaf_id={} remaining={}",
            id,
            self.order.len()
        );
        Ok(leaf)
    }

    /// Adds tags to a leaf and registers them.
    pub fn tag_leaf<I, T>(&mut self, id: &LeafId, tags: I) -> StoreResult<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let leaf = self
            .leaves
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let mut added = Vec::new();
        for tag in tags {
            let tag = tag.as_ref();
            if leaf.add_tag(tag) {
                if let Some(tag) = normalize_tag(tag) {
                    added.push(tag);
                }
            }
        }
        self.register_tags(&added);
        Ok(())
    }

    /// Removes one tag from a leaf, pruning the registry when it was the
    /// last carrier. Returns whether the leaf had the tag.
    pub fn untag_leaf(&mut self, id: &LeafId, tag: &str) -> StoreResult<bool> {
        let leaf = self
            .leaves
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if !leaf.remove_tag(tag) {
            return Ok(false);
        }
        if let Some(tag) = normalize_tag(tag) {
            self.release_tags(&[tag]);
        }
        Ok(true)
    }

    pub fn update_leaf_content(&mut self, id: &LeafId, content: impl Into<String>) -> StoreResult<()> {
        let leaf = self
            .leaves
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        leaf.update_content(content);
        Ok(())
    }

    /// Registry tags in ascending order.
    pub fn tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.tags.keys().map(String::as_str)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains_key(tag.trim())
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Number of live leaves carrying `tag`.
    pub fn tag_usage(&self, tag: &str) -> usize {
        self.tags.get(tag.trim()).copied().unwrap_or(0)
    }

    /// Connects two existing leaves.
    ///
    /// Self-connection is accepted and stores nothing.
    pub fn connect_leaves(&mut self, a: &LeafId, b: &LeafId, label: impl Into<String>) -> StoreResult<()> {
        self.ensure_exists(a)?;
        self.ensure_exists(b)?;
        if self.stem.connect_pair(a, b, label) {
            debug!("event=leaf_connect module=store status=ok from={a} to={b}");
        }
        Ok(())
    }

    /// Read-only view of the connection graph.
    pub fn stem(&self) -> &Stem {
        &self.stem
    }

    fn ensure_exists(&self, id: &LeafId) -> StoreResult<()> {
        if self.leaves.contains_key(id) {
            Ok(())
        } else {
            Err(StoreError::NotFound(id.clone()))
        }
    }

    fn insert_new(&mut self, leaf: Leaf) {
        let id = leaf.id().clone();
        self.register_tags(leaf.tags());
        self.order.push(id.clone());
        self.leaves.insert(id, leaf);
    }

    fn register_tags(&mut self, tags: &[String]) {
        for tag in tags {
            *self.tags.entry(tag.clone()).or_default() += 1;
        }
    }

    fn release_tags(&mut self, tags: &[String]) {
        for tag in tags {
            if let Some(count) = self.tags.get_mut(tag) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    self.tags.remove(tag);
                }
            }
        }
    }

    /// Resets leaves, registry and graph in one step.
    fn clear(&mut self) {
        self.leaves.clear();
        self.order.clear();
        self.tags.clear();
        self.stem = Stem::new();
    }

    /// UUID-formatted id drawn from the store's random source.
    fn generate_id(&mut self) -> LeafId {
        loop {
            let mut bytes = [0_u8; 16];
            self.rng.fill_bytes(&mut bytes);
            let id = LeafId::new(uuid::Builder::from_random_bytes(bytes).into_uuid().to_string());
            if !self.leaves.contains_key(&id) {
                return id;
            }
        }
    }
}
