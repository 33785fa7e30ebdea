//! Approximate search entry points.
//!
//! # Responsibility
//! - Score leaves against free-text queries with a typo-tolerant metric.
//! - Keep the option surface typed; unknown keys are rejected.

pub mod fuzzy;
