//! The geo node dataset and its spatial index.
//!
//! # Data layout
//!
//! Coordinates are kept in a flat `Vec` in load order (duplicates allowed),
//! alongside an R-tree (via `rstar`) over `[lat, lon]` points.  The R-tree is
//! only a pre-filter: a radius query pulls the candidates inside a
//! degree-space bounding box that provably contains the search circle, then
//! keeps those whose haversine distance is below the radius.  A circle that
//! crosses the ±180° meridian is covered by a second box shifted by 360°, so
//! the result is identical to a full linear scan.
//!
//! The dataset is read-only after construction and is shared between
//! workers behind an `Arc`.

use rand::Rng;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use fleet_core::{Coordinate, EARTH_RADIUS_KM, distance_km};

use crate::{SpatialError, SpatialResult};

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a `[lat, lon]` point and its index into
/// `GeoDataset::coords`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    idx:   usize,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in degree space.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── GeoDataset ────────────────────────────────────────────────────────────────

/// A non-empty, read-only collection of map-node coordinates.
///
/// Construct with [`GeoDataset::new`] or one of the loaders in
/// [`overpass`](crate::overpass).  An empty input is rejected, so every
/// method may assume at least one coordinate.
pub struct GeoDataset {
    coords:      Vec<Coordinate>,
    spatial_idx: RTree<NodeEntry>,
}

impl GeoDataset {
    /// Build a dataset from raw coordinates.
    ///
    /// # Errors
    ///
    /// [`SpatialError::EmptyDataset`] if `coords` is empty.
    pub fn new(coords: Vec<Coordinate>) -> SpatialResult<Self> {
        if coords.is_empty() {
            return Err(SpatialError::EmptyDataset);
        }

        // Bulk-load for O(N log N) construction (faster than N inserts).
        let entries: Vec<NodeEntry> = coords
            .iter()
            .enumerate()
            .map(|(idx, c)| NodeEntry { point: [c.lat, c.lon], idx })
            .collect();

        Ok(Self {
            spatial_idx: RTree::bulk_load(entries),
            coords,
        })
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// All coordinates in load order.
    pub fn coords(&self) -> &[Coordinate] {
        &self.coords
    }

    /// `true` if `c` is (exactly) one of the dataset's coordinates.
    pub fn contains(&self, c: Coordinate) -> bool {
        self.spatial_idx
            .locate_at_point(&[c.lat, c.lon])
            .is_some()
    }

    /// A uniformly random coordinate from the whole dataset.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Coordinate {
        self.coords[rng.gen_range(0..self.coords.len())]
    }

    /// Every coordinate strictly closer than `radius_km` to `center`,
    /// excluding coordinates equal to `center`, paired with its distance.
    ///
    /// Order is unspecified; callers sort as they need.
    pub fn within_radius(&self, center: Coordinate, radius_km: f64) -> Vec<(Coordinate, f64)> {
        if !(radius_km > 0.0) {
            return Vec::new();
        }

        search_envelopes(center, radius_km)
            .iter()
            .flat_map(|env| self.spatial_idx.locate_in_envelope(env))
            .filter_map(|e| {
                let c = self.coords[e.idx];
                if c == center {
                    return None;
                }
                let d = distance_km(center, c);
                (d < radius_km).then_some((c, d))
            })
            .collect()
    }
}

/// Degree-space boxes that together contain every point within `radius_km`
/// of `center`.
///
/// Latitude: a great-circle distance `d` bounds `|Δlat| ≤ d / R`.
/// Longitude: with both latitudes inside the band, haversine gives
/// `sin(d / 2R) ≥ cos(φmax) · sin(Δlon / 2)`; near the poles, where that
/// bound degenerates, the full longitude range is used.
///
/// When the box spills past ±180° the overflow is queried again on the
/// other side of the meridian.  The two boxes never overlap because the
/// wrapped case only arises for `Δlon < 180°`.
fn search_envelopes(center: Coordinate, radius_km: f64) -> Vec<AABB<[f64; 2]>> {
    const MARGIN: f64 = 1.0 + 1e-9;
    const SLACK_DEG: f64 = 1e-9;

    let ang = radius_km / EARTH_RADIUS_KM;
    let dlat = ang.to_degrees() * MARGIN + SLACK_DEG;

    let lat_max = (center.lat.abs() + dlat).min(90.0);
    let cos_max = lat_max.to_radians().cos();
    let ratio = if cos_max > 0.0 { (ang * 0.5).sin() / cos_max } else { f64::INFINITY };

    let (lat_lo, lat_hi) = (center.lat - dlat, center.lat + dlat);

    let dlon = if ratio < 1.0 {
        (2.0 * ratio.asin()).to_degrees() * MARGIN + SLACK_DEG
    } else {
        f64::INFINITY
    };
    if dlon >= 180.0 {
        return vec![AABB::from_corners([lat_lo, f64::MIN], [lat_hi, f64::MAX])];
    }

    let (lon_lo, lon_hi) = (center.lon - dlon, center.lon + dlon);
    let mut boxes = vec![AABB::from_corners([lat_lo, lon_lo], [lat_hi, lon_hi])];
    if lon_lo < -180.0 {
        boxes.push(AABB::from_corners([lat_lo, lon_lo + 360.0], [lat_hi, lon_hi + 360.0]));
    }
    if lon_hi > 180.0 {
        boxes.push(AABB::from_corners([lat_lo, lon_lo - 360.0], [lat_hi, lon_hi - 360.0]));
    }
    boxes
}
