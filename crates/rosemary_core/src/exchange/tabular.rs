//! CSV bulk import and export.
//!
//! # Responsibility
//! - Turn tabular rows into leaves with caller-provided ids.
//! - Write one row per leaf for spreadsheet round-trips.
//!
//! # Invariants
//! - All rows are read and buffered before the store is touched.
//! - Rows without a non-blank id or content are skipped and reported.
//! - Imported leaves are stamped with the import instant; source
//!   timestamp columns are ignored.
//! - Header names match case-insensitively; unknown columns are ignored.
//! - Content is stored exactly as written; only ids and tags are trimmed.

use super::{ExchangeError, ExchangeResult};
use crate::model::leaf::{Leaf, LeafId};
use crate::store::Rosemary;
use log::{info, warn};
use once_cell::sync::Lazy;
use rand::RngCore;
use regex::Regex;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

static TAG_DELIMITER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,;]").expect("valid tag delimiter regex"));

const EXPORT_HEADER: [&str; 5] = ["id", "content", "tags", "createdAt", "lastModified"];
const EXPORT_TAG_SEPARATOR: &str = ";";

/// Why a row was not imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingId,
    MissingContent,
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingId => f.write_str("missing id"),
            Self::MissingContent => f.write_str("missing content"),
        }
    }
}

/// Diagnostic for one skipped row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the source, header included.
    pub line: u64,
    pub reason: SkipReason,
}

/// Outcome of a tabular import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvImportReport {
    /// Ids of imported leaves in row order.
    pub imported: Vec<LeafId>,
    /// How many imported rows replaced an existing leaf with the same id.
    pub replaced: usize,
    pub skipped: Vec<SkippedRow>,
}

/// Splits a delimiter-joined tag field on `,` or `;`, trimming and dropping
/// empty values.
pub fn split_tags(raw: &str) -> Vec<String> {
    TAG_DELIMITER_RE
        .split(raw)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

struct PendingRow {
    line: u64,
    id: Option<String>,
    content: Option<String>,
    tags: Vec<String>,
}

struct Columns {
    id: Option<usize>,
    content: Option<usize>,
    tags: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let find = |name: &str| {
            headers
                .iter()
                .position(|header| header.trim().eq_ignore_ascii_case(name))
        };
        Self {
            id: find("id"),
            content: find("content"),
            tags: find("tags"),
        }
    }
}

/// Imports CSV rows from `source` into the store.
///
/// Read or parse failures abort before any leaf is applied.
pub fn import_csv<G: RngCore, R: Read>(
    store: &mut Rosemary<G>,
    source: R,
) -> ExchangeResult<CsvImportReport> {
    let rows = read_rows(source)?;
    let mut report = CsvImportReport::default();

    for row in rows {
        let id = row
            .id
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let content = row.content.filter(|value| !value.trim().is_empty());
        let (id, content) = match (id, content) {
            (Some(id), Some(content)) => (id, content),
            (None, _) => {
                skip_row(&mut report, row.line, SkipReason::MissingId);
                continue;
            }
            (Some(_), None) => {
                skip_row(&mut report, row.line, SkipReason::MissingContent);
                continue;
            }
        };

        let id = LeafId::new(id);
        if store.upsert_leaf(Leaf::new(id.clone(), content, &row.tags)).is_some() {
            report.replaced += 1;
        }
        report.imported.push(id);
    }

    info!(
        "event=csv_import module=exchange status=ok imported={} replaced={} skipped={}",
        report.imported.len(),
        report.replaced,
        report.skipped.len()
    );
    Ok(report)
}

/// Imports a CSV file into the store.
pub fn import_csv_file<G: RngCore>(
    store: &mut Rosemary<G>,
    path: &Path,
) -> ExchangeResult<CsvImportReport> {
    let file = File::open(path).map_err(|err| ExchangeError::io(path, err))?;
    import_csv(store, file)
}

/// Writes every leaf as one CSV row, tags joined with `;`.
pub fn export_csv<G: RngCore, W: Write>(store: &Rosemary<G>, sink: W) -> ExchangeResult<()> {
    let mut writer = csv::Writer::from_writer(sink);
    writer
        .write_record(EXPORT_HEADER)
        .map_err(|source| csv_error("failed to write CSV header", source))?;
    for leaf in store.leaves() {
        writer
            .write_record([
                leaf.id().as_str(),
                leaf.content(),
                leaf.tags().join(EXPORT_TAG_SEPARATOR).as_str(),
                leaf.created_at().to_string().as_str(),
                leaf.last_modified().to_string().as_str(),
            ])
            .map_err(|source| csv_error("failed to write CSV row", source))?;
    }
    writer
        .flush()
        .map_err(|err| csv_error("failed to flush CSV output", csv::Error::from(err)))?;
    Ok(())
}

/// Writes the CSV export to `path`.
pub fn export_csv_file<G: RngCore>(store: &Rosemary<G>, path: &Path) -> ExchangeResult<()> {
    let file = File::create(path).map_err(|err| ExchangeError::io(path, err))?;
    export_csv(store, file)?;
    info!(
        "event=csv_export module=exchange status=ok path={} rows={}",
        path.display(),
        store.leaf_count()
    );
    Ok(())
}

fn read_rows<R: Read>(source: R) -> ExchangeResult<Vec<PendingRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(source);
    let columns = Columns::from_headers(
        reader
            .headers()
            .map_err(|source| csv_error("failed to read CSV header", source))?,
    );

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|source| csv_error("failed to parse CSV", source))?;
        let field = |column: Option<usize>| {
            column
                .and_then(|column| record.get(column))
                .map(str::to_string)
        };
        rows.push(PendingRow {
            line: record
                .position()
                .map_or(index as u64 + 2, csv::Position::line),
            id: field(columns.id),
            content: field(columns.content),
            tags: field(columns.tags)
                .map(|raw| split_tags(&raw))
                .unwrap_or_default(),
        });
    }
    Ok(rows)
}

fn skip_row(report: &mut CsvImportReport, line: u64, reason: SkipReason) {
    warn!("event=csv_import_row module=exchange status=skipped line={line} reason={reason}");
    report.skipped.push(SkippedRow { line, reason });
}

fn csv_error(context: &'static str, source: csv::Error) -> ExchangeError {
    ExchangeError::Csv { context, source }
}

#[cfg(test)]
mod tests {
    use super::split_tags;

    #[test]
    fn split_tags_accepts_both_delimiters() {
        assert_eq!(
            split_tags(" rust, graphs;notes ;; ,"),
            vec!["rust".to_string(), "graphs".to_string(), "notes".to_string()]
        );
        assert!(split_tags("   ").is_empty());
    }
}
