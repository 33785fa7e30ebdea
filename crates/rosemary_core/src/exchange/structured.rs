//! JSON snapshot export/import.
//!
//! # Invariants
//! - Decoding happens fully before the store is touched.
//! - A missing data file is not an error; an all-whitespace file loads as an
//!   empty store.

use super::{ExchangeError, ExchangeResult};
use crate::store::{ExportData, ImportSummary, Rosemary};
use log::info;
use rand::RngCore;
use std::fs;
use std::path::Path;

/// Pretty-printed JSON snapshot of the store.
pub fn export_json<G: RngCore>(store: &Rosemary<G>) -> ExchangeResult<String> {
    serde_json::to_string_pretty(&store.export_data()).map_err(|source| {
        ExchangeError::Serialization {
            context: "failed to export to JSON",
            source,
        }
    })
}

/// Replaces the store state with a JSON snapshot.
pub fn import_json<G: RngCore>(store: &mut Rosemary<G>, json: &str) -> ExchangeResult<ImportSummary> {
    let data: ExportData =
        serde_json::from_str(json).map_err(|source| ExchangeError::Serialization {
            context: "failed to import from JSON",
            source,
        })?;
    Ok(store.import_data(data))
}

/// Writes the JSON snapshot to `path`, creating parent directories.
pub fn save_to_file<G: RngCore>(store: &Rosemary<G>, path: &Path) -> ExchangeResult<()> {
    let json = export_json(store)?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| ExchangeError::io(parent, err))?;
    }
    fs::write(path, json).map_err(|err| ExchangeError::io(path, err))?;
    info!(
        "event=store_save module=exchange status=ok path={} leaves={}",
        path.display(),
        store.leaf_count()
    );
    Ok(())
}

/// Loads a JSON snapshot from `path` into the store.
///
/// Returns `Ok(false)` and leaves the store untouched when the file does not
/// exist.
pub fn load_from_file<G: RngCore>(store: &mut Rosemary<G>, path: &Path) -> ExchangeResult<bool> {
    if !path.exists() {
        return Ok(false);
    }
    let json = fs::read_to_string(path).map_err(|err| ExchangeError::io(path, err))?;
    if json.trim().is_empty() {
        store.import_data(ExportData::default());
        return Ok(true);
    }
    import_json(store, &json)?;
    info!(
        "event=store_load module=exchange status=ok path={} leaves={}",
        path.display(),
        store.leaf_count()
    );
    Ok(true)
}
