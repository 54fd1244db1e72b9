//! `fleet-spatial`: geo node dataset, spatial indexing, and next-hop
//! selection.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`dataset`]   | `GeoDataset` (flat coordinates + R-tree)                   |
//! | [`overpass`]  | `load_from_path`, `load_from_reader` (Overpass JSON)       |
//! | [`selector`]  | `select_next`, `select_hop`, `Hop`, `HopKind`              |
//! | [`error`]     | `SpatialError`, `SpatialResult<T>`                         |
//!
//! There is no road graph here: agents move between raw map nodes using a
//! direction-biased random walk, which approximates road-following motion
//! well enough for load generation.

pub mod dataset;
pub mod error;
pub mod overpass;
pub mod selector;


pub use dataset::GeoDataset;
pub use error::{SpatialError, SpatialResult};
pub use selector::{Hop, HopKind, select_hop, select_next};
