//! Core engine of the Rosemary knowledge graph.
//! This crate is the single source of truth for leaf, tag and graph invariants.

pub mod exchange;
pub mod graph;
pub mod logging;
pub mod model;
pub mod search;
pub mod store;

pub use exchange::{
    export_csv, export_csv_file, export_json, import_csv, import_csv_file, import_json,
    load_from_file, save_to_file, split_tags, CsvImportReport, ExchangeError, ExchangeResult,
    SkipReason, SkippedRow,
};
pub use graph::stem::{Stem, StemRecord};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::leaf::{Leaf, LeafId, LeafRecord};
pub use search::fuzzy::{match_score, FuzzyHit, FuzzyOptions, SearchKey, UnknownSearchKey};
pub use store::{
    ExportData, ImportSummary, LeafPage, Rosemary, SimilarPair, SortKey, SortOrder, StoreError,
    StoreResult, TagInfo,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
