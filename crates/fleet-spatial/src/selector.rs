//! Next-hop selection: a direction-biased random walk over map nodes.
//!
//! # Algorithm
//!
//! ```text
//! candidates = nodes with distance(current, n) < r, n != current
//! if none:  candidates = same with 2r
//! if none:  return a uniformly random node          (Teleport)
//! sort candidates by ascending distance
//! if last_direction and p < 0.7:
//!     cont = candidates whose (Δlat, Δlon) signs match last_direction
//!     if cont non-empty:
//!         p < 0.8 ? nearest of cont : random of first min(5, |cont|)
//!                                                    (Continuation)
//! p < 0.8 ? nearest candidate  (Nearest)
//!         : random of first min(5, n)  (Spread)
//! ```
//!
//! The function is pure apart from the injected RNG: all state it depends on
//! is passed in, so a seeded RNG reproduces a walk exactly.
//!
//! # Teleport hops
//!
//! When even the doubled radius is empty the agent jumps to a random node
//! anywhere in the dataset.  This keeps agents moving on sparse data but can
//! move one across the whole map in a single tick; the hop is reported as
//! [`HopKind::Teleport`] so callers can surface it.

use rand::Rng;

use fleet_core::{Coordinate, Direction};

use crate::GeoDataset;

/// Probability of trying to keep the previous heading.
pub const CONTINUATION_P: f64 = 0.7;

/// Probability of taking the nearest node of the chosen pool.
pub const NEAREST_P: f64 = 0.8;

/// Width of the "nearest few" pool used for variety.
pub const SPREAD_WIDTH: usize = 5;

// ── Hop ───────────────────────────────────────────────────────────────────────

/// Which branch of the walk produced a hop.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HopKind {
    /// Kept the previous heading.
    Continuation,
    /// Nearest candidate, no heading constraint.
    Nearest,
    /// Random pick among the nearest few candidates.
    Spread,
    /// Nothing within twice the radius; random node from the whole dataset.
    Teleport,
}

impl HopKind {
    pub fn as_str(self) -> &'static str {
        match self {
            HopKind::Continuation => "continuation",
            HopKind::Nearest      => "nearest",
            HopKind::Spread       => "spread",
            HopKind::Teleport     => "teleport",
        }
    }
}

impl std::fmt::Display for HopKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The chosen next position and how it was chosen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hop {
    pub to:          Coordinate,
    pub kind:        HopKind,
    /// Great-circle length of the hop.
    pub distance_km: f64,
}

// ── Selection ─────────────────────────────────────────────────────────────────

/// Choose the next coordinate for an agent at `current`.
///
/// See the [module docs](self) for the branch structure.
pub fn select_next<R: Rng + ?Sized>(
    current:        Coordinate,
    dataset:        &GeoDataset,
    last_direction: Option<Direction>,
    max_radius_km:  f64,
    rng:            &mut R,
) -> Coordinate {
    select_hop(current, dataset, last_direction, max_radius_km, rng).to
}

/// Like [`select_next`] but also reports the branch taken and hop length.
pub fn select_hop<R: Rng + ?Sized>(
    current:        Coordinate,
    dataset:        &GeoDataset,
    last_direction: Option<Direction>,
    max_radius_km:  f64,
    rng:            &mut R,
) -> Hop {
    let mut candidates = dataset.within_radius(current, max_radius_km);
    if candidates.is_empty() {
        candidates = dataset.within_radius(current, max_radius_km * 2.0);
    }
    if candidates.is_empty() {
        let to = dataset.random(rng);
        return Hop { to, kind: HopKind::Teleport, distance_km: current.distance_km(to) };
    }

    // Ties broken by position so the order never depends on index layout.
    candidates.sort_by(|(a, da), (b, db)| {
        da.total_cmp(db)
            .then(a.lat.total_cmp(&b.lat))
            .then(a.lon.total_cmp(&b.lon))
    });

    if let Some(heading) = last_direction {
        if rng.r#gen::<f64>() < CONTINUATION_P {
            let continuing: Vec<(Coordinate, f64)> = candidates
                .iter()
                .copied()
                .filter(|&(c, _)| heading.same_heading(current.direction_to(c)))
                .collect();

            if !continuing.is_empty() {
                let ((to, distance_km), _) = nearest_or_spread(&continuing, rng);
                return Hop { to, kind: HopKind::Continuation, distance_km };
            }
        }
    }

    let ((to, distance_km), spread) = nearest_or_spread(&candidates, rng);
    let kind = if spread { HopKind::Spread } else { HopKind::Nearest };
    Hop { to, kind, distance_km }
}

/// Nearest entry of the (sorted, non-empty) pool with probability
/// `NEAREST_P`, otherwise a uniform pick among the first `SPREAD_WIDTH`.
/// The flag is `true` for the spread branch.
fn nearest_or_spread<R: Rng + ?Sized>(
    pool: &[(Coordinate, f64)],
    rng:  &mut R,
) -> ((Coordinate, f64), bool) {
    if rng.r#gen::<f64>() < NEAREST_P {
        (pool[0], false)
    } else {
        let width = pool.len().min(SPREAD_WIDTH);
        (pool[rng.gen_range(0..width)], true)
    }
}
