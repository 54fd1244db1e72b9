//! Unit tests for fleet-sim.
//!
//! Tests run on tokio's paused clock: sleeps complete instantly and
//! `Instant` only moves when every task is idle, so pacing is exact.

#[cfg(test)]
mod support {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use fleet_agent::LocationReport;
    use fleet_core::{Coordinate, SimConfig, Tick};
    use fleet_ingest::{LocationSink, Outcome};
    use fleet_spatial::GeoDataset;

    use crate::{RunTotals, SchedulerBuilder, SchedulerState, ShutdownTrigger, SimObserver, TickOutcome, TickReport};

    /// 10 × 10 grid, 0.0003° (~33 m) spacing: every node has neighbours
    /// inside the default 0.05 km radius.
    pub fn grid() -> GeoDataset {
        let coords = (0..10)
            .flat_map(|i| (0..10).map(move |j| Coordinate::new(i as f64 * 0.0003, j as f64 * 0.0003)))
            .collect();
        GeoDataset::new(coords).unwrap()
    }

    pub fn config(agent_count: usize, max_parallel: usize) -> SimConfig {
        SimConfig {
            interval_secs: 5,
            max_parallel,
            agent_count,
            seed: Some(42),
            ..SimConfig::default()
        }
    }

    pub fn identities(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("driver{i}@fleet.test")).collect()
    }

    pub fn builder(agent_count: usize, max_parallel: usize, sink: Arc<dyn LocationSink>) -> SchedulerBuilder {
        SchedulerBuilder::new(config(agent_count, max_parallel), grid(), sink)
            .identities(identities(agent_count))
    }

    // ── Fake sink ─────────────────────────────────────────────────────────

    /// Records calls and peak concurrency; optionally slow, failing,
    /// panicking, or firing a shutdown after a number of calls.
    #[derive(Default)]
    pub struct TestSink {
        pub delay:         Duration,
        pub fail_suffixes: Vec<&'static str>,
        pub panic:         bool,
        pub trigger_after: Option<(usize, ShutdownTrigger)>,
        pub calls:         AtomicUsize,
        pub in_flight:         AtomicUsize,
        pub peak:          AtomicUsize,
    }

    impl TestSink {
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn peak(&self) -> usize {
            self.peak.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LocationSink for TestSink {
        async fn report(&self, report: &LocationReport) -> Outcome {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some((after, trigger)) = &self.trigger_after {
                if n >= *after {
                    trigger.trigger();
                }
            }

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.panic {
                panic!("sink exploded");
            }
            if self.fail_suffixes.iter().any(|s| report.identity.ends_with(s)) {
                Outcome::failed("HTTP 503 Service Unavailable")
            } else {
                Outcome::Delivered { status: 200 }
            }
        }
    }

    // ── Recording observer ────────────────────────────────────────────────

    #[derive(Default)]
    pub struct Recorder {
        pub states:   Vec<(SchedulerState, SchedulerState)>,
        pub waits:    Vec<Duration>,
        pub outcomes: Vec<(Tick, TickOutcome)>,
        pub ticks:    Vec<Tick>,
        pub ended:    Option<RunTotals>,
    }

    impl SimObserver for Recorder {
        fn on_state_change(&mut self, from: SchedulerState, to: SchedulerState) {
            self.states.push((from, to));
        }
        fn on_outcome(&mut self, tick: Tick, outcome: &TickOutcome) {
            self.outcomes.push((tick, outcome.clone()));
        }
        fn on_tick_end(&mut self, report: &TickReport, _totals: &RunTotals) {
            self.ticks.push(report.tick);
        }
        fn on_pacing(&mut self, _tick: Tick, wait: Duration) {
            self.waits.push(wait);
        }
        fn on_sim_end(&mut self, totals: &RunTotals) {
            self.ended = Some(*totals);
        }
    }

    pub fn approx(actual: Duration, expected: Duration) -> bool {
        actual.abs_diff(expected) <= Duration::from_millis(10)
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use std::sync::Arc;

    use fleet_agent::{AgentError, load_roster_str};

    use crate::{SchedulerBuilder, SchedulerState, SimError};

    use super::support::{TestSink, builder, config, grid};

    #[tokio::test]
    async fn builds_idle_with_one_agent_per_identity() {
        let s = builder(10, 3, Arc::new(TestSink::default())).build().unwrap();
        assert_eq!(s.state(), SchedulerState::Idle);
        assert_eq!(s.agents().len(), 10);
        assert_eq!(s.seed(), 42);
        assert!(s.agents().iter().all(|a| s.dataset().contains(a.position())));
        assert!(s.agents().iter().all(|a| a.city() == "delhi"));
    }

    #[tokio::test]
    async fn roster_is_sampled_to_agent_count() {
        let roster = load_roster_str(
            r#"[ {"email":"a@x","user_type":"driver"},
                 {"email":"b@x","user_type":"driver"},
                 {"email":"c@x","user_type":"customer"},
                 {"email":"d@x","user_type":"driver"} ]"#,
        )
        .unwrap();

        let s = SchedulerBuilder::new(config(2, 5), grid(), Arc::new(TestSink::default()))
            .roster(roster.clone())
            .build()
            .unwrap();
        assert_eq!(s.agents().len(), 2);

        let s = SchedulerBuilder::new(config(10, 5), grid(), Arc::new(TestSink::default()))
            .roster(roster)
            .build()
            .unwrap();
        assert_eq!(s.agents().len(), 3);
    }

    #[tokio::test]
    async fn empty_population_is_fatal() {
        let err = SchedulerBuilder::new(config(3, 3), grid(), Arc::new(TestSink::default()))
            .identities(vec![])
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::Agent(AgentError::NoOperators)));

        let err = SchedulerBuilder::new(config(3, 3), grid(), Arc::new(TestSink::default()))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::Agent(AgentError::NoOperators)));
    }

    #[test]
    fn requires_runtime() {
        let err = builder(2, 2, Arc::new(TestSink::default())).build().err().unwrap();
        assert!(matches!(err, SimError::NoRuntime));
    }
}

// ── Priming ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod priming {
    use std::sync::Arc;

    use fleet_core::{AgentId, Tick};

    use crate::{NoopObserver, Phase, SchedulerState, SimError};

    use super::support::{Recorder, TestSink, builder};

    #[tokio::test(start_paused = true)]
    async fn every_agent_moves_and_reports_once() {
        let sink = Arc::new(TestSink::default());
        let mut s = builder(7, 3, sink.clone()).build().unwrap();
        let mut rec = Recorder::default();

        let report = s.prime(&mut rec).await.unwrap();
        assert_eq!(report.phase, Phase::Priming);
        assert_eq!(report.tick, Tick::ZERO);
        assert_eq!(report.dispatched(), 7);
        assert_eq!(report.delivered(), 7);
        assert_eq!(sink.calls(), 7);
        assert!(s.agents().iter().all(|a| a.update_count() == 1));
        assert_eq!(s.state(), SchedulerState::Priming);
        assert_eq!(rec.states, vec![(SchedulerState::Idle, SchedulerState::Priming)]);

        let totals = s.totals();
        assert_eq!(totals.ticks, 0);
        assert_eq!(totals.delivered, 7);
        assert!(sink.peak() <= 3);
        assert!(s.agents().get(AgentId(6)).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn failures_do_not_abort_priming() {
        let sink = Arc::new(TestSink { fail_suffixes: vec!["1@fleet.test", "3@fleet.test"], ..Default::default() });
        let mut s = builder(6, 6, sink.clone()).build().unwrap();

        let report = s.prime(&mut NoopObserver).await.unwrap();
        assert_eq!(report.delivered(), 4);
        assert_eq!(report.failed(), 2);
        assert_eq!(s.totals().failed, 2);
        assert!(s.agents().is_settled());
    }

    #[tokio::test(start_paused = true)]
    async fn prime_twice_is_rejected() {
        let mut s = builder(2, 2, Arc::new(TestSink::default())).build().unwrap();
        s.prime(&mut NoopObserver).await.unwrap();
        let err = s.prime(&mut NoopObserver).await.unwrap_err();
        assert!(matches!(err, SimError::InvalidState { state: SchedulerState::Priming, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn tick_before_running_is_rejected() {
        let mut s = builder(2, 2, Arc::new(TestSink::default())).build().unwrap();
        let err = s.run_tick(&mut NoopObserver).await.unwrap_err();
        assert!(matches!(err, SimError::InvalidState { state: SchedulerState::Idle, .. }));
    }
}

// ── Ticks ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod ticks {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    use fleet_agent::MovementAgent;
    use fleet_core::{AgentId, Tick};
    use fleet_spatial::GeoDataset;

    use crate::pool::WorkerPool;
    use crate::{NoopObserver, SchedulerState, SimError};

    use super::support::{Recorder, TestSink, builder, grid};

    #[tokio::test(start_paused = true)]
    async fn each_agent_advances_at_most_once_per_tick() {
        let sink = Arc::new(TestSink { delay: Duration::from_millis(50), ..Default::default() });
        let mut s = builder(10, 3, sink.clone()).build().unwrap();
        s.prime(&mut NoopObserver).await.unwrap();

        let mut rec = Recorder::default();
        s.run_ticks(1, &mut rec).await.unwrap();

        let outcomes = rec.outcomes;
        let agents: HashSet<AgentId> = outcomes.iter().map(|(_, o)| o.agent).collect();
        assert_eq!(outcomes.len(), 3);
        assert_eq!(agents.len(), 3);

        let counts: Vec<u64> = s.agents().iter().map(|a| a.update_count()).collect();
        assert_eq!(counts.iter().filter(|&&c| c == 2).count(), 3);
        assert_eq!(counts.iter().filter(|&&c| c == 1).count(), 7);
        assert!(sink.peak() <= 3, "peak in-flight {}", sink.peak());
        assert!(s.agents().is_settled());
    }

    #[tokio::test(start_paused = true)]
    async fn small_population_uses_everyone() {
        let mut s = builder(4, 100, Arc::new(TestSink::default())).build().unwrap();
        let mut rec = Recorder::default();
        s.run_ticks(1, &mut rec).await.unwrap();

        // Auto-primed (4) then one tick over all 4 agents.
        assert_eq!(rec.outcomes.len(), 8);
        assert!(s.agents().iter().all(|a| a.update_count() == 2));
        assert_eq!(s.tick(), Tick(1));
        assert_eq!(
            rec.states,
            vec![
                (SchedulerState::Idle, SchedulerState::Priming),
                (SchedulerState::Priming, SchedulerState::Running),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn inactive_agents_are_skipped() {
        let sink = Arc::new(TestSink::default());
        let mut s = builder(4, 4, sink.clone()).build().unwrap();
        s.set_active(AgentId(1), false).unwrap();
        s.set_active(AgentId(3), false).unwrap();
        assert!(matches!(s.set_active(AgentId(9), false), Err(SimError::AgentMissing(AgentId(9)))));

        let report = s.prime(&mut NoopObserver).await.unwrap();
        assert_eq!(report.skipped(), 2);
        assert_eq!(report.delivered(), 2);
        assert_eq!(sink.calls(), 2);
        assert_eq!(s.agents().get(AgentId(1)).unwrap().update_count(), 0);
        assert_eq!(s.agents().get(AgentId(0)).unwrap().update_count(), 1);

        s.set_active(AgentId(1), true).unwrap();
        s.run_ticks(1, &mut NoopObserver).await.unwrap();
        assert_eq!(s.agents().get(AgentId(1)).unwrap().update_count(), 1);
        assert_eq!(s.totals().skipped, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_counted_and_loop_continues() {
        let sink = Arc::new(TestSink { fail_suffixes: vec!["0@fleet.test"], ..Default::default() });
        let mut s = builder(2, 2, sink).build().unwrap();

        let totals = s.run_ticks(3, &mut NoopObserver).await.unwrap();
        assert_eq!(totals.ticks, 3);
        assert_eq!(totals.failed, 4);
        assert_eq!(totals.delivered, 4);
        assert_eq!(totals.attempts(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_sink_becomes_failure() {
        let sink = Arc::new(TestSink { panic: true, ..Default::default() });
        let mut s = builder(3, 2, sink).build().unwrap();

        let report = s.prime(&mut NoopObserver).await.unwrap();
        assert_eq!(report.failed(), 3);
        assert!(s.agents().is_settled());
        assert!(s.agents().iter().all(|a| a.update_count() == 1));
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_movement_becomes_failure() {
        fn explode(_: &mut MovementAgent, _: &GeoDataset, _: f64) -> bool {
            panic!("movement exploded");
        }

        let sink = Arc::new(TestSink::default());
        let mut s = builder(3, 2, sink.clone()).build().unwrap();
        s.pool = WorkerPool::spawn_with(2, Arc::new(grid()), sink.clone(), 0.05, explode);

        let report = s.prime(&mut NoopObserver).await.unwrap();
        assert_eq!(report.failed(), 3);
        assert_eq!(sink.calls(), 0);
        assert!(s.agents().is_settled());
        assert!(s.agents().iter().all(|a| a.update_count() == 0));

        let totals = s.run_ticks(2, &mut NoopObserver).await.unwrap();
        assert_eq!(totals.failed, 3 + 2 * 2);
    }

    #[tokio::test]
    async fn pool_never_outnumbers_agents() {
        let small = builder(4, 100, Arc::new(TestSink::default())).build().unwrap();
        assert_eq!(small.pool.size(), 4);

        let large = builder(10, 3, Arc::new(TestSink::default())).build().unwrap();
        assert_eq!(large.pool.size(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn pool_is_reused_across_ticks() {
        let sink = Arc::new(TestSink::default());
        let mut s = builder(5, 2, sink.clone()).build().unwrap();
        s.run_ticks(20, &mut NoopObserver).await.unwrap();

        assert_eq!(s.totals().ticks, 20);
        assert_eq!(sink.calls(), 5 + 20 * 2);
        let moves: u64 = s.agents().iter().map(|a| a.update_count()).sum();
        assert_eq!(moves, 45);
        s.close().await;
    }
}

// ── Pacing ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pacing {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::Instant;

    use crate::NoopObserver;

    use super::support::{Recorder, TestSink, approx, builder};

    #[tokio::test(start_paused = true)]
    async fn short_tick_waits_out_the_interval() {
        let sink = Arc::new(TestSink { delay: Duration::from_secs(1), ..Default::default() });
        let mut s = builder(2, 2, sink).build().unwrap();
        s.prime(&mut NoopObserver).await.unwrap();

        let mut rec = Recorder::default();
        let start = Instant::now();
        s.run_ticks(2, &mut rec).await.unwrap();

        assert_eq!(rec.waits.len(), 1);
        assert!(approx(rec.waits[0], Duration::from_secs(4)), "waited {:?}", rec.waits[0]);
        // 1 s work + 4 s wait + 1 s work.
        assert!(approx(start.elapsed(), Duration::from_secs(6)), "took {:?}", start.elapsed());
    }

    #[tokio::test(start_paused = true)]
    async fn overrun_starts_next_tick_immediately() {
        let sink = Arc::new(TestSink { delay: Duration::from_secs(6), ..Default::default() });
        let mut s = builder(2, 2, sink).build().unwrap();
        s.prime(&mut NoopObserver).await.unwrap();

        let mut rec = Recorder::default();
        let start = Instant::now();
        s.run_ticks(3, &mut rec).await.unwrap();

        assert_eq!(rec.waits, vec![Duration::ZERO, Duration::ZERO]);
        assert!(approx(start.elapsed(), Duration::from_secs(18)), "took {:?}", start.elapsed());
    }
}

// ── Cancellation ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod cancellation {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::Instant;

    use crate::{NoopObserver, SchedulerState, SimError, shutdown};

    use super::support::{Recorder, TestSink, approx, builder};

    #[tokio::test(start_paused = true)]
    async fn signal_during_pacing_stops_without_waiting() {
        let sink = Arc::new(TestSink::default());
        let mut s = builder(3, 3, sink).build().unwrap();
        let (trigger, mut listener) = shutdown::channel();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(12)).await;
            trigger.trigger();
        });

        let mut rec = Recorder::default();
        let start = Instant::now();
        let totals = s.run(&mut listener, &mut rec).await.unwrap();

        // Ticks start at 0 s, 5 s, 10 s; the signal at 12 s cuts the sleep.
        assert_eq!(totals.ticks, 3);
        assert!(approx(start.elapsed(), Duration::from_secs(12)), "took {:?}", start.elapsed());
        assert_eq!(s.state(), SchedulerState::Stopped);
        assert_eq!(rec.ended, Some(totals));
        assert_eq!(
            rec.states.last(),
            Some(&(SchedulerState::Running, SchedulerState::Stopped))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_tick_completes() {
        let (trigger, mut listener) = shutdown::channel();
        // 4 priming reports, then the signal fires on the first report of
        // the second tick.
        let sink = Arc::new(TestSink {
            delay: Duration::from_millis(100),
            trigger_after: Some((4 + 2 + 1, trigger)),
            ..Default::default()
        });
        let mut s = builder(4, 2, sink.clone()).build().unwrap();

        let totals = s.run(&mut listener, &mut NoopObserver).await.unwrap();

        assert_eq!(totals.ticks, 2);
        assert_eq!(sink.calls(), 4 + 2 + 2);
        assert!(s.agents().is_settled());
        assert_eq!(s.state(), SchedulerState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn already_triggered_runs_no_ticks() {
        let (trigger, mut listener) = shutdown::channel();
        trigger.trigger();
        let mut s = builder(2, 2, Arc::new(TestSink::default())).build().unwrap();

        let totals = s.run(&mut listener, &mut NoopObserver).await.unwrap();
        assert_eq!(totals.ticks, 0);
        assert_eq!(totals.delivered, 2, "priming still happens");
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_cannot_restart() {
        let (trigger, mut listener) = shutdown::channel();
        trigger.trigger();
        let mut s = builder(2, 2, Arc::new(TestSink::default())).build().unwrap();
        s.run(&mut listener, &mut NoopObserver).await.unwrap();

        let err = s.run(&mut listener, &mut NoopObserver).await.unwrap_err();
        assert!(matches!(err, SimError::InvalidState { state: SchedulerState::Stopped, .. }));
        let err = s.run_ticks(1, &mut NoopObserver).await.unwrap_err();
        assert!(matches!(err, SimError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn dropped_trigger_never_fires() {
        let (trigger, mut listener) = shutdown::channel();
        drop(trigger);
        assert!(!listener.is_triggered());
        let fired = tokio::time::timeout(Duration::from_millis(20), listener.triggered()).await;
        assert!(fired.is_err());
    }
}

// ── Observers ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observers {
    use std::sync::Arc;

    use tracing::Span;

    use crate::LogObserver;

    use super::support::{TestSink, builder};

    #[tokio::test(start_paused = true)]
    async fn log_observer_runs_every_hook() {
        let sink = Arc::new(TestSink { fail_suffixes: vec!["1@fleet.test"], ..Default::default() });
        let mut s = builder(3, 3, sink).build().unwrap();
        let mut obs = LogObserver::new(Span::none(), 2);

        let totals = s.run_ticks(4, &mut obs).await.unwrap();
        assert_eq!(totals.ticks, 4);
        assert_eq!(totals.failed, 5);
    }
}
