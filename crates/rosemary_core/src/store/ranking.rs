//! Read-only views: tag statistics, orderings, searches and pagination.
//!
//! # Invariants
//! - Every ordering here is deterministic: explicit tie-breaks, otherwise
//!   stable sorts over insertion order.

use super::{Rosemary, StoreResult};
use crate::model::leaf::{Leaf, LeafId};
use crate::search::fuzzy::{FuzzyHit, FuzzyMatcher, FuzzyOptions};
use log::debug;
use rand::RngCore;
use std::cmp::Ordering;

const LEAVES_DEFAULT_PAGE_SIZE: usize = 10;

/// Usage summary of one registry tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub name: String,
    /// Number of live leaves carrying the tag.
    pub count: usize,
    /// Carrier ids in insertion order.
    pub leaves: Vec<LeafId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Leaf attribute used by [`Rosemary::leaves_sorted_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedAt,
    LastModified,
    TagCount,
    ConnectionCount,
}

/// One page of leaves in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafPage<'a> {
    /// 1-based page number actually served.
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub leaves: Vec<&'a Leaf>,
}

impl<G: RngCore> Rosemary<G> {
    /// Leaves carrying `tag`, in insertion order.
    pub fn leaves_by_tag(&self, tag: &str) -> Vec<&Leaf> {
        self.leaves().filter(|leaf| leaf.has_tag(tag)).collect()
    }

    /// Usage summary of a registry tag, `None` when no leaf carries it.
    pub fn tag_info(&self, tag: &str) -> Option<TagInfo> {
        let name = tag.trim();
        let count = *self.tags.get(name)?;
        Some(TagInfo {
            name: name.to_string(),
            count,
            leaves: self
                .leaves_by_tag(name)
                .into_iter()
                .map(|leaf| leaf.id().clone())
                .collect(),
        })
    }

    /// Summaries of every registry tag, in ascending tag order.
    pub fn all_tags(&self) -> Vec<TagInfo> {
        self.tags().filter_map(|tag| self.tag_info(tag)).collect()
    }

    /// Tags ordered by carrier count; ties by ascending tag name.
    pub fn tags_sorted_by_leaf_count(&self, order: SortOrder) -> Vec<TagInfo> {
        let mut infos = self.all_tags();
        // all_tags is already name-ordered, so a stable sort keeps the tie-break.
        infos.sort_by(|a, b| order.apply(a.count.cmp(&b.count)));
        infos
    }

    /// The `limit` most used tags.
    pub fn most_used_tags(&self, limit: usize) -> Vec<TagInfo> {
        let mut infos = self.tags_sorted_by_leaf_count(SortOrder::Descending);
        infos.truncate(limit);
        infos
    }

    /// Registry tags containing `partial` (case-insensitive).
    ///
    /// Prefix matches come first, then substring-only matches; each group is
    /// in lexicographic order.
    pub fn suggest_tags(&self, partial: &str, limit: usize) -> Vec<String> {
        let needle = partial.trim().to_lowercase();
        let mut matches: Vec<(bool, &str)> = self
            .tags()
            .filter_map(|tag| {
                let lowered = tag.to_lowercase();
                lowered
                    .contains(needle.as_str())
                    .then(|| (!lowered.starts_with(needle.as_str()), tag))
            })
            .collect();
        matches.sort();
        matches
            .into_iter()
            .take(limit)
            .map(|(_, tag)| tag.to_string())
            .collect()
    }

    /// Leaves ordered by `key`; ties keep insertion order.
    pub fn leaves_sorted_by(&self, key: SortKey, order: SortOrder) -> Vec<&Leaf> {
        let mut leaves: Vec<&Leaf> = self.leaves().collect();
        match key {
            SortKey::CreatedAt => {
                leaves.sort_by(|a, b| order.apply(a.created_at().cmp(&b.created_at())))
            }
            SortKey::LastModified => {
                leaves.sort_by(|a, b| order.apply(a.last_modified().cmp(&b.last_modified())))
            }
            SortKey::TagCount => {
                leaves.sort_by(|a, b| order.apply(a.tags().len().cmp(&b.tags().len())))
            }
            SortKey::ConnectionCount => leaves.sort_by(|a, b| {
                order.apply(self.stem.degree(a.id()).cmp(&self.stem.degree(b.id())))
            }),
        }
        leaves
    }

    /// The `limit` leaves with the highest degree; ties keep insertion order.
    pub fn most_connected_leaves(&self, limit: usize) -> Vec<&Leaf> {
        let mut leaves = self.leaves_sorted_by(SortKey::ConnectionCount, SortOrder::Descending);
        leaves.truncate(limit);
        leaves
    }

    /// Case-insensitive substring search over content.
    pub fn leaves_by_content(&self, query: &str) -> Vec<&Leaf> {
        let needle = query.to_lowercase();
        self.leaves()
            .filter(|leaf| leaf.content().to_lowercase().contains(needle.as_str()))
            .collect()
    }

    /// Approximate search over the fields selected in `options`.
    ///
    /// Hits are ordered by ascending score; equal scores keep insertion order.
    pub fn fuzzy_search(&self, query: &str, options: &FuzzyOptions) -> Vec<FuzzyHit<'_>> {
        let Some(matcher) = FuzzyMatcher::new(query, options) else {
            return Vec::new();
        };

        let mut hits: Vec<FuzzyHit<'_>> = self
            .leaves()
            .filter_map(|leaf| {
                let (score, key) = matcher.score_leaf(leaf, &options.keys)?;
                (score <= options.threshold).then_some(FuzzyHit { leaf, score, key })
            })
            .collect();
        hits.sort_by(|a, b| a.score.total_cmp(&b.score));
        if let Some(limit) = options.limit {
            hits.truncate(limit);
        }

        debug!(
            "event=fuzzy_search module=store status=ok query_chars={} hits={}",
            query.chars().count(),
            hits.len()
        );
        hits
    }

    /// Serves one 1-based page of leaves.
    ///
    /// Page `0` is treated as `1`; a `0` page size falls back to the default.
    pub fn list_leaves(&self, page: usize, page_size: usize) -> LeafPage<'_> {
        let page = page.max(1);
        let page_size = if page_size == 0 {
            LEAVES_DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        let total = self.leaf_count();
        let leaves = self
            .leaves()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .collect();
        LeafPage {
            current_page: page,
            total_pages: total.div_ceil(page_size),
            page_size,
            leaves,
        }
    }

    /// Looks up a batch of ids, failing on the first miss.
    pub fn leaves_by_ids<'a, I>(&self, ids: I) -> StoreResult<Vec<&Leaf>>
    where
        I: IntoIterator<Item = &'a LeafId>,
    {
        ids.into_iter().map(|id| self.leaf(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{SortKey, SortOrder};
    use crate::store::Rosemary;

    #[test]
    fn list_leaves_paginates_in_insertion_order() {
        let mut store = Rosemary::seeded(3);
        let ids: Vec<_> = (0..25)
            .map(|idx| store.add_leaf(format!("leaf {idx}"), Vec::<String>::new()))
            .collect();

        let third = store.list_leaves(3, 10);
        assert_eq!(third.total_pages, 3);
        assert_eq!(third.leaves.len(), 5);
        assert_eq!(third.leaves[0].id(), &ids[20]);

        let defaulted = store.list_leaves(0, 0);
        assert_eq!(defaulted.current_page, 1);
        assert_eq!(defaulted.page_size, 10);

        let beyond = store.list_leaves(9, 10);
        assert!(beyond.leaves.is_empty());
    }

    #[test]
    fn tag_count_sort_is_stable_over_insertion_order() {
        let mut store = Rosemary::seeded(4);
        let a = store.add_leaf("a", ["x"]);
        let b = store.add_leaf("b", ["x", "y"]);
        let c = store.add_leaf("c", ["z"]);

        let sorted = store.leaves_sorted_by(SortKey::TagCount, SortOrder::Descending);
        let ids: Vec<_> = sorted.iter().map(|leaf| leaf.id().clone()).collect();
        assert_eq!(ids, vec![b, a, c]);
    }
}
