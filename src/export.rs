//! JSON export and import of the note collection.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use canvas::doc::Note;
use time::Date;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("nothing to export: the board has no notes")]
    Empty,
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid notes JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Render notes as 2-space-indented JSON.
pub fn to_json(notes: &[Note]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(notes)?)
}

/// Parse a JSON array of notes.
pub fn from_json(text: &str) -> Result<Vec<Note>, ExportError> {
    Ok(serde_json::from_str(text)?)
}

/// `ambient-notes-YYYY-MM-DD.json`
#[must_use]
pub fn export_filename(date: Date) -> String {
    format!("ambient-notes-{:04}-{:02}-{:02}.json", date.year(), u8::from(date.month()), date.day())
}

/// Write `notes` into `dir` under the dated export name and return the path.
pub fn write_export(dir: &Path, notes: &[Note], date: Date) -> Result<PathBuf, ExportError> {
    if notes.is_empty() {
        return Err(ExportError::Empty);
    }
    let path = dir.join(export_filename(date));
    let text = to_json(notes)?;
    fs::write(&path, text).map_err(|source| ExportError::Io { path: path.clone(), source })?;
    tracing::info!(path = %path.display(), count = notes.len(), "notes exported");
    Ok(path)
}

/// Read an export file written by [`write_export`].
pub fn read_import(path: &Path) -> Result<Vec<Note>, ExportError> {
    let text = fs::read_to_string(path).map_err(|source| ExportError::Io { path: path.to_path_buf(), source })?;
    from_json(&text)
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
