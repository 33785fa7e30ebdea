//! Relationship graph between leaves.
//!
//! # Responsibility
//! - Store labelled, symmetric connections keyed by `LeafId`.
//! - Provide the serialization shape used by structured exchange.

pub mod stem;
