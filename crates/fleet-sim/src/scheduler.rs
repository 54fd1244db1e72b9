//! The `Scheduler` and its tick loop.

use std::sync::Arc;

use tokio::time::Instant;

use fleet_agent::{AgentStore, MovementAgent};
use fleet_core::{AgentId, SimConfig, SimRng, Tick, pacing_delay};
use fleet_spatial::GeoDataset;

use crate::pool::WorkerPool;
use crate::shutdown::Shutdown;
use crate::{Phase, RunTotals, SchedulerState, SimError, SimObserver, SimResult, TickReport};

/// Drives every agent through priming and paced, sampled ticks.
///
/// # Tick
///
/// ```text
/// ① Sample   up to max_parallel agent IDs, without replacement
/// ② Dispatch check each agent out of the store into the worker pool
/// ③ Barrier  wait for exactly as many completions as were dispatched,
///            checking each agent back in
/// ④ Pace     sleep for what is left of the interval (nothing on overrun)
/// ```
///
/// The scheduler is the only owner of the agent store and its RNG is the
/// only source of batch sampling, so a tick is deterministic given a seed
/// apart from completion order.
///
/// Create via [`SchedulerBuilder`][crate::SchedulerBuilder]; must be used
/// from inside the tokio runtime it was built on.
pub struct Scheduler {
    pub(crate) config:  SimConfig,
    pub(crate) state:   SchedulerState,
    pub(crate) agents:  AgentStore,
    pub(crate) dataset: Arc<GeoDataset>,
    pub(crate) pool:    WorkerPool,
    pub(crate) rng:     SimRng,
    pub(crate) seed:    u64,
    pub(crate) tick:    Tick,
    pub(crate) totals:  RunTotals,
}

impl Scheduler {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The last completed tick (`Tick::ZERO` before the first).
    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn totals(&self) -> RunTotals {
        self.totals
    }

    /// Seed the run was built with; reuse it to reproduce the run.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn agents(&self) -> &AgentStore {
        &self.agents
    }

    pub fn dataset(&self) -> &GeoDataset {
        &self.dataset
    }

    /// Activate or deactivate an agent between ticks.  Inactive agents are
    /// still sampled but do not move or report.
    pub fn set_active(&mut self, agent: AgentId, active: bool) -> SimResult<()> {
        if self.agents.set_active(agent, active) {
            Ok(())
        } else {
            Err(SimError::AgentMissing(agent))
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Advance and report every agent once to establish start positions.
    ///
    /// `Idle → Priming`.  Individual delivery failures are counted, never
    /// fatal.
    pub async fn prime<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<TickReport> {
        if self.state != SchedulerState::Idle {
            return Err(SimError::InvalidState { op: "prime", state: self.state });
        }
        self.transition(SchedulerState::Priming, observer);

        let everyone: Vec<AgentId> = self.agents.agent_ids().collect();
        self.dispatch(Tick::ZERO, Phase::Priming, everyone, observer).await
    }

    /// Run paced ticks until `shutdown` fires, then stop.
    ///
    /// Primes first if that has not happened yet.  The signal is honoured
    /// between ticks and during the pacing sleep; a tick in progress always
    /// completes, so no agent is left checked out.
    pub async fn run<O: SimObserver>(
        &mut self,
        shutdown: &mut Shutdown,
        observer: &mut O,
    ) -> SimResult<RunTotals> {
        self.enter_running(observer).await?;

        while !shutdown.is_triggered() {
            let report = self.run_tick(observer).await?;
            let wait = pacing_delay(report.elapsed, self.config.interval());
            observer.on_pacing(report.tick, wait);

            if !wait.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(wait) => {}
                    _ = shutdown.triggered() => break,
                }
            }
        }

        self.transition(SchedulerState::Stopped, observer);
        observer.on_sim_end(&self.totals);
        Ok(self.totals)
    }

    /// Run exactly `n` paced ticks and stay `Running`.
    ///
    /// Pacing applies between ticks only: the call returns as soon as the
    /// last tick's barrier completes.
    pub async fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<RunTotals> {
        self.enter_running(observer).await?;

        for i in 0..n {
            let report = self.run_tick(observer).await?;
            if i + 1 < n {
                let wait = pacing_delay(report.elapsed, self.config.interval());
                observer.on_pacing(report.tick, wait);
                tokio::time::sleep(wait).await;
            }
        }
        Ok(self.totals)
    }

    /// Stop the worker pool and wait for its workers to exit.
    pub async fn close(self) {
        self.pool.close().await;
    }

    // ── Tick processing ───────────────────────────────────────────────────

    /// Sample, dispatch, and join one tick.  No pacing.
    pub async fn run_tick<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<TickReport> {
        if self.state != SchedulerState::Running {
            return Err(SimError::InvalidState { op: "run a tick", state: self.state });
        }

        let tick = self.tick.next();
        let batch: Vec<AgentId> = self
            .rng
            .sample_indices(self.agents.len(), self.config.max_parallel)
            .into_iter()
            .map(|i| AgentId(i as u32))
            .collect();

        let report = self.dispatch(tick, Phase::Running, batch, observer).await?;
        self.tick = tick;
        Ok(report)
    }

    async fn enter_running<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        match self.state {
            SchedulerState::Running => return Ok(()),
            SchedulerState::Idle => {
                self.prime(observer).await?;
            }
            SchedulerState::Priming => {}
            SchedulerState::Stopped => {
                return Err(SimError::InvalidState { op: "run", state: self.state });
            }
        }
        self.transition(SchedulerState::Running, observer);
        Ok(())
    }

    /// Push `batch` through the pool and wait for all of it.
    ///
    /// Every ID is checked out before anything is awaited, so an ID listed
    /// twice fails here instead of being moved twice.
    async fn dispatch<O: SimObserver>(
        &mut self,
        tick:     Tick,
        phase:    Phase,
        batch:    Vec<AgentId>,
        observer: &mut O,
    ) -> SimResult<TickReport> {
        observer.on_tick_start(tick, batch.len());
        let started = Instant::now();

        let mut checked_out: Vec<MovementAgent> = Vec::with_capacity(batch.len());
        for &id in &batch {
            match self.agents.checkout(id) {
                Some(agent) => checked_out.push(agent),
                None => {
                    for agent in checked_out {
                        let _ = self.agents.checkin(agent);
                    }
                    return Err(SimError::AgentMissing(id));
                }
            }
        }

        let in_flight = checked_out.len();
        for agent in checked_out {
            self.pool.submit(agent).await?;
        }

        let mut outcomes = Vec::with_capacity(in_flight);
        for _ in 0..in_flight {
            let done = self.pool.next_completed().await?;
            if let Err(stray) = self.agents.checkin(done.agent) {
                return Err(SimError::AgentMissing(stray.id()));
            }
            outcomes.push(done.outcome);
        }

        let report = TickReport { tick, phase, outcomes, elapsed: started.elapsed() };
        self.totals.absorb(&report);

        for outcome in &report.outcomes {
            observer.on_outcome(tick, outcome);
        }
        observer.on_tick_end(&report, &self.totals);
        Ok(report)
    }

    fn transition<O: SimObserver>(&mut self, to: SchedulerState, observer: &mut O) {
        let from = self.state;
        if from != to {
            self.state = to;
            observer.on_state_change(from, to);
        }
    }
}
