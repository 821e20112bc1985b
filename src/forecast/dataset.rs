//! Loading historical demand records from disk.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::error::EngineError;
use crate::types::HistoricalRecord;

/// Failure to read a history dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read {}: {1}", .0.display())]
    Io(PathBuf, std::io::Error),

    #[error("Malformed history JSON in {}: {1}", .0.display())]
    Json(PathBuf, serde_json::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Read a JSON array of `HistoricalRecord`s.
///
/// Rows are checked with [`HistoricalRecord::is_well_formed`]; the first bad
/// row fails the whole file.
pub fn load_history(path: &Path) -> Result<Vec<HistoricalRecord>, DatasetError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| DatasetError::Io(path.to_path_buf(), e))?;
    let records: Vec<HistoricalRecord> =
        serde_json::from_str(&contents).map_err(|e| DatasetError::Json(path.to_path_buf(), e))?;

    if let Some(pos) = records.iter().position(|r| !r.is_well_formed()) {
        return Err(EngineError::InvalidDataset(format!(
            "{}: record {pos} has a non-finite feature or invalid quantity",
            path.display()
        ))
        .into());
    }

    info!(path = %path.display(), rows = records.len(), "Loaded demand history");
    Ok(records)
}
