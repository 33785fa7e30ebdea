//! Import/export plumbing between the store and external formats.
//!
//! # Responsibility
//! - Structured (JSON) snapshots as strings and files.
//! - Tabular (CSV) bulk import and export.
//! - Wrap external I/O and parse failures with context.
//!
//! # Invariants
//! - A failed read or parse never leaves the store partially updated.
//! - Malformed tabular rows are skipped and reported, not fatal.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod structured;
pub mod tabular;

pub use structured::{export_json, import_json, load_from_file, save_to_file};
pub use tabular::{
    export_csv, export_csv_file, import_csv, import_csv_file, split_tags, CsvImportReport,
    SkipReason, SkippedRow,
};

pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// Failure while moving data in or out of the store.
#[derive(Debug)]
pub enum ExchangeError {
    /// File-system read/write failure.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// JSON payload could not be encoded or decoded as the expected shape.
    Serialization {
        context: &'static str,
        source: serde_json::Error,
    },
    /// CSV stream could not be read or written.
    Csv {
        context: &'static str,
        source: csv::Error,
    },
}

impl Display for ExchangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o failure on `{}`: {source}", path.display()),
            Self::Serialization { context, source } => write!(f, "{context}: {source}"),
            Self::Csv { context, source } => write!(f, "{context}: {source}"),
        }
    }
}

impl Error for ExchangeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
        }
    }
}

impl ExchangeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
