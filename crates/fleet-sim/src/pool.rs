//! Long-lived bounded worker pool.
//!
//! # Layout
//!
//! ```text
//!               ┌──────────── job queue (bounded, size N) ────────────┐
//! scheduler ──▶ │ MovementAgent, MovementAgent, …                     │
//!               └──────┬──────────────┬──────────────┬────────────────┘
//!                  worker 0       worker 1   …   worker N-1
//!                      │ advance + report (one agent at a time)
//!                      ▼
//!               results (unbounded) ──▶ scheduler join barrier
//! ```
//!
//! The pool is spawned once, when the scheduler is built, and lives until
//! the scheduler is closed.  At most `N` agents are in flight at once
//! because there are exactly `N` workers, each handling one agent at a
//! time.
//!
//! Agents are *moved* into the queue and come back inside a [`Completed`],
//! so a worker owns the agent it is mutating outright.  Workers never
//! touch the agent store.  A panic while moving or reporting is caught and
//! the agent still comes back, so the join barrier always completes.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use fleet_agent::MovementAgent;
use fleet_ingest::{LocationSink, Outcome};
use fleet_spatial::GeoDataset;

use crate::{SimError, SimResult, TickOutcome};

/// An agent handed back by a worker, with what happened to it.
pub struct Completed {
    pub agent:   MovementAgent,
    pub outcome: TickOutcome,
}

/// Moves one agent; [`MovementAgent::advance`] outside tests.
pub(crate) type Step = fn(&mut MovementAgent, &GeoDataset, f64) -> bool;

/// Everything a worker needs besides the agent itself.  Read-only and
/// shared by all workers.
struct WorkerContext {
    dataset:       Arc<GeoDataset>,
    sink:          Arc<dyn LocationSink>,
    max_radius_km: f64,
    step:          Step,
}

pub struct WorkerPool {
    jobs:    mpsc::Sender<MovementAgent>,
    results: mpsc::UnboundedReceiver<Completed>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `size` workers (at least one) on the current tokio runtime.
    pub fn spawn(
        size:          usize,
        dataset:       Arc<GeoDataset>,
        sink:          Arc<dyn LocationSink>,
        max_radius_km: f64,
    ) -> Self {
        Self::spawn_with(size, dataset, sink, max_radius_km, MovementAgent::advance)
    }

    pub(crate) fn spawn_with(
        size:          usize,
        dataset:       Arc<GeoDataset>,
        sink:          Arc<dyn LocationSink>,
        max_radius_km: f64,
        step:          Step,
    ) -> Self {
        let size = size.max(1);
        let (job_tx, job_rx) = mpsc::channel::<MovementAgent>(size);
        let (result_tx, result_rx) = mpsc::unbounded_channel();

        let job_rx = Arc::new(Mutex::new(job_rx));
        let ctx = Arc::new(WorkerContext { dataset, sink, max_radius_km, step });

        let workers = (0..size)
            .map(|_| {
                let jobs = Arc::clone(&job_rx);
                let results = result_tx.clone();
                let ctx = Arc::clone(&ctx);
                tokio::spawn(worker_loop(jobs, results, ctx))
            })
            .collect();

        Self { jobs: job_tx, results: result_rx, workers }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Queue one agent.  Waits while the queue is full.
    pub async fn submit(&self, agent: MovementAgent) -> SimResult<()> {
        self.jobs.send(agent).await.map_err(|_| SimError::PoolClosed)
    }

    /// The next finished agent, in completion order.
    pub async fn next_completed(&mut self) -> SimResult<Completed> {
        self.results.recv().await.ok_or(SimError::PoolClosed)
    }

    /// Stop accepting work and wait for every worker to exit.
    pub async fn close(self) {
        let WorkerPool { jobs, results, workers } = self;
        drop(jobs);
        for handle in workers {
            let _ = handle.await;
        }
        drop(results);
    }
}

async fn worker_loop(
    jobs:    Arc<Mutex<mpsc::Receiver<MovementAgent>>>,
    results: mpsc::UnboundedSender<Completed>,
    ctx:     Arc<WorkerContext>,
) {
    loop {
        // Only the lock holder waits on the queue; the guard drops as soon
        // as a job (or closure) is received.
        let next = jobs.lock().await.recv().await;
        let Some(agent) = next else { break };

        let completed = process(agent, &ctx).await;
        if results.send(completed).is_err() {
            break;
        }
    }
}

/// `advance` then `report`.  A panic in either is reported as a failed
/// delivery so the agent still comes back to the scheduler.
async fn process(mut agent: MovementAgent, ctx: &WorkerContext) -> Completed {
    let started = Instant::now();

    let stepped = panic::catch_unwind(AssertUnwindSafe(|| {
        (ctx.step)(&mut agent, &ctx.dataset, ctx.max_radius_km)
    }));
    let (moved, delivery) = match stepped {
        Ok(true) => {
            let snapshot = agent.snapshot();
            let outcome = AssertUnwindSafe(ctx.sink.report(&snapshot))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Outcome::failed("location sink panicked"));
            (true, Some(outcome))
        }
        Ok(false) => (false, None),
        Err(_) => (false, Some(Outcome::failed("agent movement panicked"))),
    };

    let outcome = TickOutcome {
        agent:    agent.id(),
        identity: agent.identity().to_owned(),
        position: agent.position(),
        delivery,
        hop:      if moved { agent.last_hop().map(|h| h.kind) } else { None },
        latency:  started.elapsed(),
    };

    Completed { agent, outcome }
}
