//! Per-agent, per-tick, and per-run results.

use std::fmt;
use std::time::Duration;

use fleet_core::{AgentId, Coordinate, Tick};
use fleet_ingest::Outcome;
use fleet_spatial::HopKind;

// ── SchedulerState ────────────────────────────────────────────────────────────

/// Lifecycle of a [`Scheduler`](crate::Scheduler).
///
/// ```text
/// Idle ──prime──▶ Priming ──run──▶ Running ──shutdown──▶ Stopped
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SchedulerState {
    Idle,
    Priming,
    Running,
    Stopped,
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SchedulerState::Idle    => "idle",
            SchedulerState::Priming => "priming",
            SchedulerState::Running => "running",
            SchedulerState::Stopped => "stopped",
        })
    }
}

/// Which pass produced a [`TickReport`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The one-off pass over every agent before periodic ticks.
    Priming,
    /// A sampled, paced tick.
    Running,
}

// ── TickOutcome ───────────────────────────────────────────────────────────────

/// What happened to one agent in one tick.
#[derive(Clone, Debug)]
pub struct TickOutcome {
    pub agent:    AgentId,
    pub identity: String,
    /// Position after the move (unchanged if skipped).
    pub position: Coordinate,
    /// `None` when the agent was inactive and nothing was sent.
    pub delivery: Option<Outcome>,
    /// Selector branch of the move; `None` when skipped.
    pub hop:      Option<HopKind>,
    /// Wall time spent on `advance` + `report`.
    pub latency:  Duration,
}

impl TickOutcome {
    pub fn is_delivered(&self) -> bool {
        self.delivery.as_ref().is_some_and(Outcome::is_delivered)
    }

    pub fn is_failed(&self) -> bool {
        self.delivery.as_ref().is_some_and(|o| !o.is_delivered())
    }

    pub fn is_skipped(&self) -> bool {
        self.delivery.is_none()
    }

    pub fn teleported(&self) -> bool {
        self.hop == Some(HopKind::Teleport)
    }
}

// ── TickReport ────────────────────────────────────────────────────────────────

/// Aggregate of one tick (or of the priming pass).
#[derive(Clone, Debug)]
pub struct TickReport {
    pub tick:     Tick,
    pub phase:    Phase,
    /// One entry per dispatched agent, in completion order.
    pub outcomes: Vec<TickOutcome>,
    /// From first dispatch to the join barrier.
    pub elapsed:  Duration,
}

impl TickReport {
    pub fn dispatched(&self) -> usize {
        self.outcomes.len()
    }

    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_delivered()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }

    pub fn teleports(&self) -> usize {
        self.outcomes.iter().filter(|o| o.teleported()).count()
    }
}

// ── RunTotals ─────────────────────────────────────────────────────────────────

/// Running counts since the scheduler was built.  `ticks` counts periodic
/// ticks only; the other counters include the priming pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RunTotals {
    pub ticks:     u64,
    pub delivered: u64,
    pub failed:    u64,
    pub skipped:   u64,
    pub teleports: u64,
}

impl RunTotals {
    pub(crate) fn absorb(&mut self, report: &TickReport) {
        if report.phase == Phase::Running {
            self.ticks += 1;
        }
        self.delivered += report.delivered() as u64;
        self.failed    += report.failed() as u64;
        self.skipped   += report.skipped() as u64;
        self.teleports += report.teleports() as u64;
    }

    /// Delivery attempts (delivered + failed).
    pub fn attempts(&self) -> u64 {
        self.delivered + self.failed
    }
}
