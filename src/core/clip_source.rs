//! Loads the ordered list of test clips from the recordings CSV.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::clip::ClipRef;

/// Header of the column holding clip URLs
pub const AUDIO_COLUMN: &str = "Audio";

#[derive(Debug, Error)]
pub enum ClipSourceError {
    #[error("Failed to read clip list {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Clip list {} has no 'Audio' column", .0.display())]
    MissingColumn(PathBuf),

    #[error("Malformed row {row} in clip list: {source}")]
    Row {
        row: usize,
        #[source]
        source: csv::Error,
    },
}

/// Read clips in file order. Rows with a blank `Audio` cell are skipped.
pub fn load_clips(path: &Path) -> Result<Vec<ClipRef>, ClipSourceError> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| ClipSourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let headers = reader
        .headers()
        .map_err(|source| ClipSourceError::Read {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    let column = headers
        .iter()
        .position(|h| h.trim() == AUDIO_COLUMN)
        .ok_or_else(|| ClipSourceError::MissingColumn(path.to_path_buf()))?;

    let mut clips = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let row = result.map_err(|source| ClipSourceError::Row {
            row: idx + 1,
            source,
        })?;
        match row.get(column).map(str::trim) {
            Some(cell) if !cell.is_empty() => clips.push(ClipRef::from(cell)),
            _ => tracing::warn!(row = idx + 1, "Skipping clip list row without audio"),
        }
    }

    tracing::info!(count = clips.len(), path = %path.display(), "Loaded clip list");
    Ok(clips)
}
