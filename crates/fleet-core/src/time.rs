//! Tick counter and wall-clock pacing.
//!
//! # Design
//!
//! A tick is one scheduling round.  Ticks are strictly sequential: tick N+1
//! never begins before every operation dispatched in tick N has completed.
//!
//! Pacing is "sleep the remainder": if a tick finishes early the scheduler
//! waits out the rest of the interval; if it overran, the next tick starts
//! immediately and the missed slots are not caught up.

use std::fmt;
use std::time::Duration;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// A monotonically increasing tick counter.
///
/// `Tick::ZERO` is the priming pass; periodic ticks start at `T1`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// The tick after `self`.
    #[inline]
    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }

    /// `true` every `n` ticks (never for `n == 0` or the priming tick).
    #[inline]
    pub fn is_every(self, n: u64) -> bool {
        n > 0 && self.0 > 0 && self.0 % n == 0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── Pacing ────────────────────────────────────────────────────────────────────

/// How long to suspend after a tick that took `elapsed`, given the target
/// `interval`.  Zero when the tick overran.
#[inline]
pub fn pacing_delay(elapsed: Duration, interval: Duration) -> Duration {
    interval.saturating_sub(elapsed)
}
