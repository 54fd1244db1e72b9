//! Geographic coordinate type and the great-circle distance metric.
//!
//! `Coordinate` uses `f64` latitude/longitude.  Node datasets come from OSM
//! with 7 decimal places, and equality between coordinates is exact, so the
//! values are kept at the precision they were parsed with.

use std::fmt;

/// Mean Earth radius used by [`distance_km`].
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

// ── Coordinate ────────────────────────────────────────────────────────────────

/// A WGS-84 `(latitude, longitude)` pair in degrees.
///
/// Equality is exact numeric comparison; there is no tolerance.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance to `other`, in kilometres.
    #[inline]
    pub fn distance_km(self, other: Coordinate) -> f64 {
        distance_km(self, other)
    }

    /// Delta from `self` to `to`.
    #[inline]
    pub fn direction_to(self, to: Coordinate) -> Direction {
        Direction {
            d_lat: to.lat - self.lat,
            d_lon: to.lon - self.lon,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Haversine great-circle distance between `a` and `b`, in kilometres.
///
/// Symmetric in its arguments and zero for identical points.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat * 0.5).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

    // `min` guards asin against h creeping past 1.0 for antipodal points.
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

// ── Direction ─────────────────────────────────────────────────────────────────

/// The `(Δlat, Δlon)` of an agent's last move.
///
/// Only the signs matter: the next-hop selector uses them to prefer
/// candidates that keep the same heading quadrant.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Direction {
    pub d_lat: f64,
    pub d_lon: f64,
}

impl Direction {
    #[inline]
    pub fn new(d_lat: f64, d_lon: f64) -> Self {
        Self { d_lat, d_lon }
    }

    /// `(lat_sign, lon_sign)`, each `1` or `-1`.  A zero delta counts as `-1`.
    #[inline]
    pub fn signs(self) -> (i8, i8) {
        (sign(self.d_lat), sign(self.d_lon))
    }

    /// `true` if `other` points into the same quadrant as `self`.
    #[inline]
    pub fn same_heading(self, other: Direction) -> bool {
        self.signs() == other.signs()
    }
}

#[inline]
fn sign(v: f64) -> i8 {
    if v > 0.0 { 1 } else { -1 }
}
