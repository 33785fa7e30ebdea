//! Approximate text matching over leaf content and tags.
//!
//! # Responsibility
//! - Score how well a query approximately occurs inside a field value.
//! - Define the typed option set that tunes fuzzy search.
//!
//! # Invariants
//! - Scores lie in `[0, 1]`; `0` is a perfect match.
//! - A query occurring verbatim in a value scores `0`.
//! - A query sharing no characters with a value scores `1`.
//! - Scores are monotonic in edit distance for a fixed query.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::model::leaf::Leaf;

const DEFAULT_THRESHOLD: f64 = 0.4;

/// Leaf field a fuzzy query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKey {
    Content,
    Tags,
}

impl SearchKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Tags => "tags",
        }
    }
}

impl Display for SearchKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a search key name is not one of `content|tags`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSearchKey(pub String);

impl Display for UnknownSearchKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown search key `{}`; expected content|tags",
            self.0
        )
    }
}

impl Error for UnknownSearchKey {}

impl FromStr for SearchKey {
    type Err = UnknownSearchKey;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "content" => Ok(Self::Content),
            "tags" | "tag" => Ok(Self::Tags),
            other => Err(UnknownSearchKey(other.to_string())),
        }
    }
}

/// Fuzzy search tuning.
///
/// Defaults: both keys, threshold `0.4`, case-insensitive, one-character
/// minimum query, no result limit.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyOptions {
    /// Fields to match. Duplicates are harmless.
    pub keys: Vec<SearchKey>,
    /// Maximum accepted score; hits scoring above it are dropped.
    pub threshold: f64,
    pub ignore_case: bool,
    /// Queries shorter than this (after trimming) yield no hits.
    pub min_match_chars: usize,
    pub limit: Option<usize>,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        Self {
            keys: vec![SearchKey::Content, SearchKey::Tags],
            threshold: DEFAULT_THRESHOLD,
            ignore_case: true,
            min_match_chars: 1,
            limit: None,
        }
    }
}

impl FuzzyOptions {
    pub fn with_keys(mut self, keys: impl IntoIterator<Item = SearchKey>) -> Self {
        self.keys = keys.into_iter().collect();
        self
    }

    /// Sets the cutoff, clamped into `[0, 1]`. `NaN` falls back to the default.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = if threshold.is_nan() {
            DEFAULT_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        self
    }

    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    pub fn with_min_match_chars(mut self, min_match_chars: usize) -> Self {
        self.min_match_chars = min_match_chars;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Parses a comma-separated key list such as `content,tags`.
    ///
    /// Unknown names are rejected rather than skipped.
    pub fn parse_keys(value: &str) -> Result<Vec<SearchKey>, UnknownSearchKey> {
        value
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(SearchKey::from_str)
            .collect()
    }
}

/// One fuzzy search result.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyHit<'a> {
    pub leaf: &'a Leaf,
    pub score: f64,
    /// Field that produced the best score.
    pub key: SearchKey,
}

/// Prepared query, lowered once per search.
pub(crate) struct FuzzyMatcher {
    pattern: Vec<char>,
    ignore_case: bool,
}

impl FuzzyMatcher {
    /// Returns `None` when the trimmed query is shorter than the minimum.
    pub(crate) fn new(query: &str, options: &FuzzyOptions) -> Option<Self> {
        let trimmed = query.trim();
        let pattern: Vec<char> = if options.ignore_case {
            trimmed.to_lowercase().chars().collect()
        } else {
            trimmed.chars().collect()
        };
        if pattern.is_empty() || pattern.len() < options.min_match_chars {
            return None;
        }
        Some(Self {
            pattern,
            ignore_case: options.ignore_case,
        })
    }

    /// Best score of `leaf` over `keys`, with the key that produced it.
    pub(crate) fn score_leaf(&self, leaf: &Leaf, keys: &[SearchKey]) -> Option<(f64, SearchKey)> {
        let mut best: Option<(f64, SearchKey)> = None;
        for key in keys {
            let score = match key {
                SearchKey::Content => Some(self.score(leaf.content())),
                SearchKey::Tags => leaf
                    .tags()
                    .iter()
                    .map(|tag| self.score(tag))
                    .min_by(f64::total_cmp),
            };
            if let Some(score) = score {
                if best.map_or(true, |(current, _)| score < current) {
                    best = Some((score, *key));
                }
            }
        }
        best
    }

    pub(crate) fn score(&self, text: &str) -> f64 {
        if self.ignore_case {
            let lowered = text.to_lowercase();
            substring_distance_score(&self.pattern, &lowered)
        } else {
            substring_distance_score(&self.pattern, text)
        }
    }
}

/// Scores `query` against `text` with default case folding.
///
/// Returns `1.0` for a blank query.
pub fn match_score(query: &str, text: &str) -> f64 {
    let options = FuzzyOptions::default();
    match FuzzyMatcher::new(query, &options) {
        Some(matcher) => matcher.score(text),
        None => 1.0,
    }
}

/// Minimal edit distance between `pattern` and any substring of `text`,
/// normalized by the pattern length.
fn substring_distance_score(pattern: &[char], text: &str) -> f64 {
    let m = pattern.len();
    if m == 0 {
        return 1.0;
    }

    // Column over the pattern; row 0 is free so a match may start anywhere.
    let mut column: Vec<usize> = (0..=m).collect();
    let mut best = column[m];
    for ch in text.chars() {
        let mut diagonal = column[0];
        column[0] = 0;
        for i in 1..=m {
            let above = column[i];
            let cost = usize::from(pattern[i - 1] != ch);
            column[i] = (diagonal + cost).min(above + 1).min(column[i - 1] + 1);
            diagonal = above;
        }
        best = best.min(column[m]);
        if best == 0 {
            break;
        }
    }

    (best as f64 / m as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::{match_score, substring_distance_score, FuzzyOptions, SearchKey};

    fn chars(value: &str) -> Vec<char> {
        value.chars().collect()
    }

    #[test]
    fn exact_and_contained_queries_score_zero() {
        assert_eq!(match_score("rosemary", "rosemary"), 0.0);
        assert_eq!(match_score("gardening", "Notes about gardening in spring"), 0.0);
    }

    #[test]
    fn disjoint_query_scores_one() {
        assert_eq!(match_score("xyz", "abc def"), 1.0);
        assert_eq!(match_score("abc", ""), 1.0);
    }

    #[test]
    fn score_grows_with_edit_distance() {
        let one_typo = substring_distance_score(&chars("javascript"), "javascrpt is fun");
        let two_typos = substring_distance_score(&chars("javascript"), "jvascrpt is fun");
        assert!(one_typo > 0.0);
        assert!(two_typos > one_typo);
        assert!((one_typo - 0.1).abs() < 1e-9);
    }

    #[test]
    fn case_folding_is_optional() {
        assert_eq!(match_score("RUST", "rust"), 0.0);
        let options = FuzzyOptions::default().with_ignore_case(false);
        let matcher = super::FuzzyMatcher::new("RUST", &options).unwrap();
        assert_eq!(matcher.score("rust"), 1.0);
    }

    #[test]
    fn parse_keys_rejects_unknown_names() {
        assert_eq!(
            FuzzyOptions::parse_keys("content, tags").unwrap(),
            vec![SearchKey::Content, SearchKey::Tags]
        );
        let err = FuzzyOptions::parse_keys("content,title").unwrap_err();
        assert_eq!(err.0, "title");
    }

    #[test]
    fn threshold_is_clamped() {
        assert_eq!(FuzzyOptions::default().with_threshold(3.0).threshold, 1.0);
        assert_eq!(FuzzyOptions::default().with_threshold(-1.0).threshold, 0.0);
        assert_eq!(FuzzyOptions::default().with_threshold(f64::NAN).threshold, 0.4);
    }

    #[test]
    fn short_queries_below_minimum_are_rejected() {
        let options = FuzzyOptions::default().with_min_match_chars(3);
        assert!(super::FuzzyMatcher::new("ab", &options).is_none());
        assert!(super::FuzzyMatcher::new("   ", &FuzzyOptions::default()).is_none());
    }
}
