//! Domain model for knowledge-graph notes.
//!
//! # Responsibility
//! - Define the leaf record and its stable identifier.
//! - Define the wire DTO used by structured export/import.
//!
//! # Invariants
//! - Every leaf is identified by a stable `LeafId`.

pub mod leaf;
