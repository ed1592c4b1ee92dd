//! Dataset acquisition.
//!
//! Records come either from the remote catalog over HTTP or from a JSON
//! file on disk. Both paths accept the same payload shapes.

pub mod fetcher;
pub mod loader;

pub use fetcher::{DatasetFetcher, FetchOptions};
pub use loader::load_records;

use crate::models::PlanetRecord;
use serde::Deserialize;

/// Public exoplanet catalog used when no URL is configured.
pub const DEFAULT_DATASET_URL: &str = "https://gist.githubusercontent.com/joelbirchler/66cf8045fcbb6515557347c05d789b4a/raw/9a196385b44d4288431eef74896c0512bad3defe/exoplanets";

/// Accepted top-level shapes of a catalog payload.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    /// A bare array of records.
    Records(Vec<PlanetRecord>),
    /// An envelope with the records under `data`.
    Wrapped { data: Vec<PlanetRecord> },
}

/// Decode a catalog payload from raw JSON bytes.
pub fn parse_payload(bytes: &[u8]) -> Result<Vec<PlanetRecord>, serde_json::Error> {
    let payload: Payload = serde_json::from_slice(bytes)?;
    Ok(match payload {
        Payload::Records(records) => records,
        Payload::Wrapped { data } => data,
    })
}
