//! Leaf domain model.
//!
//! # Responsibility
//! - Define the canonical note record held by the knowledge store.
//! - Keep tag membership and modification timestamps consistent on mutation.
//!
//! # Invariants
//! - `id` never changes after construction.
//! - `tags` has set semantics: no duplicates, no blank values.
//! - `last_modified` never decreases.
//!
//! # See also
//! - crate::store for the registry that mirrors leaf tags.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable identifier of a leaf.
///
/// Opaque string: generated ids are UUID-formatted, imported ids keep whatever
/// text the source carried.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeafId(String);

impl LeafId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for LeafId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LeafId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for LeafId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Current wall-clock instant in Unix epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Trims one tag value, returning `None` for blank input.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// A single note: content, tags and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LeafRecord", into = "LeafRecord")]
pub struct Leaf {
    id: LeafId,
    content: String,
    tags: Vec<String>,
    created_at: i64,
    last_modified: i64,
}

impl Leaf {
    /// Creates a leaf stamped with the current instant.
    ///
    /// Blank and duplicate tags are dropped; first occurrence order is kept.
    pub fn new<I, T>(id: LeafId, content: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let now = now_ms();
        let mut leaf = Self {
            id,
            content: content.into(),
            tags: Vec::new(),
            created_at: now,
            last_modified: now,
        };
        for tag in tags {
            leaf.insert_tag(tag.as_ref());
        }
        leaf
    }

    pub fn id(&self) -> &LeafId {
        &self.id
    }

    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    /// Tags in insertion order.
    pub fn tags(&self) -> &[String] {
        self.tags.as_slice()
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn last_modified(&self) -> i64 {
        self.last_modified
    }

    /// Adds a tag and touches `last_modified`.
    ///
    /// Returns `true` when the tag was not present before. Blank tags are
    /// ignored and do not touch the timestamp.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        if normalize_tag(tag).is_none() {
            return false;
        }
        let added = self.insert_tag(tag);
        self.touch();
        added
    }

    /// Removes a tag, touching `last_modified` only when it was present.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let Some(tag) = normalize_tag(tag) else {
            return false;
        };
        let Some(position) = self.tags.iter().position(|current| *current == tag) else {
            return false;
        };
        self.tags.remove(position);
        self.touch();
        true
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.tags.iter().any(|current| current == tag)
    }

    /// Replaces content and touches `last_modified`.
    pub fn update_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.touch();
    }

    /// Milliseconds elapsed since creation.
    pub fn age_ms(&self) -> i64 {
        self.age_at(now_ms())
    }

    /// Milliseconds elapsed since the last mutation.
    pub fn time_since_last_modified_ms(&self) -> i64 {
        self.time_since_last_modified_at(now_ms())
    }

    pub fn age_at(&self, now: i64) -> i64 {
        now - self.created_at
    }

    pub fn time_since_last_modified_at(&self, now: i64) -> i64 {
        now - self.last_modified
    }

    /// Returns tags shared with `other`, in this leaf's tag order.
    pub fn shared_tags<'a>(&'a self, other: &Leaf) -> Vec<&'a str> {
        self.tags
            .iter()
            .filter(|tag| other.tags.contains(tag))
            .map(String::as_str)
            .collect()
    }

    fn insert_tag(&mut self, tag: &str) -> bool {
        match normalize_tag(tag) {
            Some(tag) if !self.tags.contains(&tag) => {
                self.tags.push(tag);
                true
            }
            _ => false,
        }
    }

    fn touch(&mut self) {
        self.last_modified = self.last_modified.max(now_ms());
    }
}

/// Wire shape of a leaf used by structured export/import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafRecord {
    pub id: LeafId,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: i64,
    pub last_modified: i64,
}

impl From<LeafRecord> for Leaf {
    fn from(record: LeafRecord) -> Self {
        let mut leaf = Self {
            id: record.id,
            content: record.content,
            tags: Vec::new(),
            created_at: record.created_at,
            last_modified: record.last_modified,
        };
        for tag in &record.tags {
            leaf.insert_tag(tag);
        }
        leaf
    }
}

impl From<Leaf> for LeafRecord {
    fn from(leaf: Leaf) -> Self {
        Self {
            id: leaf.id,
            content: leaf.content,
            tags: leaf.tags,
            created_at: leaf.created_at,
            last_modified: leaf.last_modified,
        }
    }
}

impl From<&Leaf> for LeafRecord {
    fn from(leaf: &Leaf) -> Self {
        leaf.clone().into()
    }
}
