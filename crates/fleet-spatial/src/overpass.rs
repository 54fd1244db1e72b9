//! Overpass JSON node loader.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use fleet_spatial::overpass::load_from_path;
//!
//! let dataset = load_from_path(Path::new("jodhpur_map_data.json"))?;
//! ```
//!
//! # What is loaded
//!
//! The input is the `[out:json]` response of an Overpass query:
//!
//! ```json
//! { "elements": [
//!     { "type": "node", "id": 1, "lat": 26.28, "lon": 73.03 },
//!     { "type": "way",  "id": 9, "nodes": [1, 2] }
//! ] }
//! ```
//!
//! Only `node` elements carrying both `lat` and `lon` become coordinates.
//! Ways, relations, and nodes without a position are skipped silently.
//! Duplicate positions are kept.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use fleet_core::Coordinate;

use crate::{GeoDataset, SpatialResult};

// ── Wire records ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Deserialize)]
struct Element {
    #[serde(rename = "type", default)]
    kind: String,
    lat:  Option<f64>,
    lon:  Option<f64>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`GeoDataset`] from an Overpass JSON file.
///
/// # Errors
///
/// [`SpatialError::DataUnavailable`](crate::SpatialError::DataUnavailable)
/// if the file cannot be opened or parsed,
/// [`SpatialError::EmptyDataset`](crate::SpatialError::EmptyDataset) if it
/// holds no usable nodes.
pub fn load_from_path(path: &Path) -> SpatialResult<GeoDataset> {
    let file = File::open(path)?;
    load_from_reader(BufReader::new(file))
}

/// Like [`load_from_path`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or loading from a
/// response body.
pub fn load_from_reader<R: Read>(reader: R) -> SpatialResult<GeoDataset> {
    let response: OverpassResponse = serde_json::from_reader(reader)?;
    GeoDataset::new(node_coordinates(response.elements))
}

/// Like [`load_from_path`] but parses an in-memory string.
pub fn load_from_str(json: &str) -> SpatialResult<GeoDataset> {
    let response: OverpassResponse = serde_json::from_str(json)?;
    GeoDataset::new(node_coordinates(response.elements))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn node_coordinates(elements: Vec<Element>) -> Vec<Coordinate> {
    elements
        .into_iter()
        .filter(|e| e.kind == "node")
        .filter_map(|e| match (e.lat, e.lon) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        })
        .collect()
}
