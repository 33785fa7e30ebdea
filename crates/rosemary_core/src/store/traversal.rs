//! Graph construction and traversal over the store.
//!
//! # Invariants
//! - `related_leaves` visits every node at most once and never returns the
//!   start leaf.
//! - Random chains never repeat a leaf and only step along existing edges.

use super::{Rosemary, StoreError, StoreResult};
use crate::model::leaf::{Leaf, LeafId};
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use std::collections::{HashSet, VecDeque};

/// A pair linked by [`Rosemary::connect_similar_leaves`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarPair {
    pub first: LeafId,
    pub second: LeafId,
    /// Shared tags in the first leaf's tag order.
    pub shared_tags: Vec<String>,
}

impl SimilarPair {
    /// Edge label written for this pair.
    pub fn label(&self) -> String {
        format!("Common tags: {}", self.shared_tags.join(", "))
    }
}

impl<G: RngCore> Rosemary<G> {
    /// Connects every pair of leaves sharing at least `threshold` tags.
    ///
    /// Existing labels of qualifying pairs are overwritten. Runs in
    /// O(n²·t); callers with large stores should cap or chunk.
    pub fn connect_similar_leaves(&mut self, threshold: usize) -> Vec<SimilarPair> {
        let leaves: Vec<&Leaf> = self.leaves().collect();
        let mut pairs = Vec::new();
        for (index, first) in leaves.iter().enumerate() {
            for second in &leaves[index + 1..] {
                let shared = first.shared_tags(second);
                if shared.len() >= threshold {
                    pairs.push(SimilarPair {
                        first: first.id().clone(),
                        second: second.id().clone(),
                        shared_tags: shared.into_iter().map(str::to_string).collect(),
                    });
                }
            }
        }

        for pair in &pairs {
            self.stem.connect_pair(&pair.first, &pair.second, pair.label());
        }
        info!(
            "event=connect_similar module=store status=ok threshold={} pairs={}",
            threshold,
            pairs.len()
        );
        pairs
    }

    /// Leaves within `max_distance` hops of `start`, in breadth-first
    /// discovery order, excluding `start`.
    pub fn related_leaves(&self, start: &LeafId, max_distance: usize) -> StoreResult<Vec<&Leaf>> {
        self.ensure_exists(start)?;

        let mut visited: HashSet<&LeafId> = HashSet::new();
        let mut queue: VecDeque<(&LeafId, usize)> = VecDeque::new();
        let mut related = Vec::new();
        visited.insert(start);
        queue.push_back((start, 0));

        while let Some((current, distance)) = queue.pop_front() {
            if distance >= max_distance {
                continue;
            }
            for neighbor in self.stem.neighbors(current) {
                if visited.insert(neighbor) {
                    related.push(self.leaf(neighbor)?);
                    queue.push_back((neighbor, distance + 1));
                }
            }
        }

        debug!(
            "event=related_leaves module=store status=ok start={} max_distance={} found={}",
            start,
            max_distance,
            related.len()
        );
        Ok(related)
    }

    /// Self-avoiding random walk of at most `max_length` leaves.
    ///
    /// Without `start` the first leaf is drawn uniformly from the store. The
    /// walk stops early when the current leaf has no unused neighbor; there is
    /// no backtracking.
    pub fn random_connected_chain(
        &mut self,
        start: Option<&LeafId>,
        max_length: usize,
    ) -> StoreResult<Vec<LeafId>> {
        let first = match start {
            Some(id) => {
                self.ensure_exists(id)?;
                id.clone()
            }
            None => self
                .order
                .choose(&mut self.rng)
                .cloned()
                .ok_or(StoreError::Empty)?,
        };
        if max_length == 0 {
            return Ok(Vec::new());
        }

        let mut used: HashSet<LeafId> = HashSet::new();
        used.insert(first.clone());
        let mut chain = vec![first];

        while chain.len() < max_length {
            let Some(current) = chain.last() else {
                break;
            };
            let candidates: Vec<&LeafId> = self
                .stem
                .neighbors(current)
                .filter(|neighbor| !used.contains(*neighbor))
                .collect();
            if candidates.is_empty() {
                break;
            }
            let next = candidates[self.rng.gen_range(0..candidates.len())].clone();
            used.insert(next.clone());
            chain.push(next);
        }

        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::SimilarPair;
    use crate::model::leaf::LeafId;

    #[test]
    fn similar_pair_label_lists_shared_tags() {
        let pair = SimilarPair {
            first: LeafId::from("a"),
            second: LeafId::from("b"),
            shared_tags: vec!["rust".to_string(), "graphs".to_string()],
        };
        assert_eq!(pair.label(), "Common tags: rust, graphs");
    }
}
