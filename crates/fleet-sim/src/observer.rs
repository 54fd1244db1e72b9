//! Scheduler observers: progress reporting and logging.

use std::time::Duration;

use tracing::Span;

use fleet_core::Tick;
use fleet_ingest::Outcome;

use crate::{RunTotals, SchedulerState, TickOutcome, TickReport};

/// Callbacks invoked by the [`Scheduler`](crate::Scheduler) at key points
/// of its lifecycle.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: failure counter
///
/// ```rust,ignore
/// struct Failures(usize);
///
/// impl SimObserver for Failures {
///     fn on_outcome(&mut self, _tick: Tick, outcome: &TickOutcome) {
///         if outcome.is_failed() {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    fn on_state_change(&mut self, _from: SchedulerState, _to: SchedulerState) {}

    /// Called before dispatch.  `batch` is the number of agents sampled.
    fn on_tick_start(&mut self, _tick: Tick, _batch: usize) {}

    /// Called once per dispatched agent after the tick's join barrier.
    fn on_outcome(&mut self, _tick: Tick, _outcome: &TickOutcome) {}

    /// Called after every outcome of the tick has been reported.
    fn on_tick_end(&mut self, _report: &TickReport, _totals: &RunTotals) {}

    /// Called after a running tick with the time the scheduler will
    /// suspend before the next one (zero if the tick overran).
    fn on_pacing(&mut self, _tick: Tick, _wait: Duration) {}

    /// Called once when the scheduler stops.
    fn on_sim_end(&mut self, _totals: &RunTotals) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

// ── LogObserver ───────────────────────────────────────────────────────────────

/// Emits `tracing` events for every outcome, pacing decision, and summary.
///
/// Events are parented to the span given at construction, so the observer
/// is the scheduler's log sink without relying on ambient span context.
///
/// | Event                         | Level  |
/// |-------------------------------|--------|
/// | report delivered              | info   |
/// | report failed                 | warn   |
/// | inactive agent skipped        | debug  |
/// | teleport hop                  | warn   |
/// | pacing wait / overrun         | info / warn |
/// | summary every `summary_every` ticks and at stop | info |
pub struct LogObserver {
    span:          Span,
    summary_every: u64,
}

impl LogObserver {
    pub fn new(span: Span, summary_every: u64) -> Self {
        Self { span, summary_every }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl SimObserver for LogObserver {
    fn on_state_change(&mut self, from: SchedulerState, to: SchedulerState) {
        tracing::info!(parent: &self.span, %from, %to, "scheduler state changed");
    }

    fn on_tick_start(&mut self, tick: Tick, batch: usize) {
        tracing::debug!(parent: &self.span, %tick, batch, "tick started");
    }

    fn on_outcome(&mut self, tick: Tick, outcome: &TickOutcome) {
        if outcome.teleported() {
            tracing::warn!(
                parent: &self.span,
                %tick,
                driver_id = %outcome.identity,
                lat = outcome.position.lat,
                lon = outcome.position.lon,
                "no nodes within twice the search radius; agent jumped to a random node"
            );
        }

        match &outcome.delivery {
            Some(Outcome::Delivered { status }) => tracing::info!(
                parent: &self.span,
                %tick,
                driver_id = %outcome.identity,
                lat = outcome.position.lat,
                lon = outcome.position.lon,
                status,
                latency_ms = outcome.latency.as_millis() as u64,
                "location delivered"
            ),
            Some(Outcome::DeliveryFailed { reason }) => tracing::warn!(
                parent: &self.span,
                %tick,
                driver_id = %outcome.identity,
                reason = %reason,
                "location delivery failed"
            ),
            None => tracing::debug!(
                parent: &self.span,
                %tick,
                driver_id = %outcome.identity,
                "agent inactive; skipped"
            ),
        }
    }

    fn on_tick_end(&mut self, report: &TickReport, totals: &RunTotals) {
        tracing::debug!(
            parent: &self.span,
            tick = %report.tick,
            delivered = report.delivered(),
            failed = report.failed(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "tick complete"
        );
        if report.tick.is_every(self.summary_every) {
            tracing::info!(
                parent: &self.span,
                ticks = totals.ticks,
                delivered = totals.delivered,
                failed = totals.failed,
                skipped = totals.skipped,
                teleports = totals.teleports,
                "progress summary"
            );
        }
    }

    fn on_pacing(&mut self, tick: Tick, wait: Duration) {
        if wait.is_zero() {
            tracing::warn!(parent: &self.span, %tick, "tick overran the interval; starting next tick immediately");
        } else {
            tracing::info!(
                parent: &self.span,
                %tick,
                "waiting {:.2} s until next tick",
                wait.as_secs_f64()
            );
        }
    }

    fn on_sim_end(&mut self, totals: &RunTotals) {
        tracing::info!(
            parent: &self.span,
            ticks = totals.ticks,
            delivered = totals.delivered,
            failed = totals.failed,
            skipped = totals.skipped,
            teleports = totals.teleports,
            "simulation stopped"
        );
    }
}
