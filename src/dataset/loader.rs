//! Offline catalog loading from a local JSON file.

use crate::dataset::parse_payload;
use crate::models::PlanetRecord;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors raised while reading a local catalog file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read dataset file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode dataset file {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load catalog records from a JSON file on disk.
pub fn load_records(path: &Path) -> Result<Vec<PlanetRecord>, LoadError> {
    info!("Loading dataset from: {}", path.display());

    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records = parse_payload(&bytes).map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Loaded {} records", records.len());
    Ok(records)
}
