//! `fleet-sim`: the simulation scheduler.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──prime()──▶ Priming ──run()/run_ticks()──▶ Running ──shutdown──▶ Stopped
//!
//! Priming: every agent advances and reports once.
//! Running, per tick:
//!   ① Sample   up to max_parallel agents, without replacement
//!   ② Dispatch agents are moved into the long-lived worker pool
//!   ③ Barrier  all dispatched agents come back before anything else
//!   ④ Pace     sleep out the rest of the interval; overruns start
//!              the next tick immediately (no catch-up)
//! ```
//!
//! # Crate layout
//!
//! | Module         | Contents                                                 |
//! |----------------|----------------------------------------------------------|
//! | [`scheduler`]  | `Scheduler` (state machine and tick loop)                |
//! | [`builder`]    | `SchedulerBuilder`                                       |
//! | [`pool`]       | `WorkerPool` (bounded, reused across ticks)              |
//! | [`observer`]   | `SimObserver`, `NoopObserver`, `LogObserver`             |
//! | [`report`]     | `SchedulerState`, `TickOutcome`, `TickReport`, `RunTotals` |
//! | [`shutdown`]   | cooperative cancellation (`Shutdown`, `ShutdownTrigger`) |
//! | [`error`]      | `SimError`, `SimResult<T>`                               |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fleet_sim::{LogObserver, SchedulerBuilder};
//!
//! let mut scheduler = SchedulerBuilder::new(config, dataset, Arc::new(client))
//!     .roster(roster)
//!     .build()?;
//! let (trigger, mut shutdown) = fleet_sim::shutdown::channel();
//! let mut observer = LogObserver::new(tracing::info_span!("sim"), 10);
//! scheduler.run(&mut shutdown, &mut observer).await?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod pool;
pub mod report;
pub mod scheduler;
pub mod shutdown;

#[cfg(test)]
mod tests;

pub use builder::SchedulerBuilder;
pub use error::{SimError, SimResult};
pub use observer::{LogObserver, NoopObserver, SimObserver};
pub use report::{Phase, RunTotals, SchedulerState, TickOutcome, TickReport};
pub use scheduler::Scheduler;
pub use shutdown::{Shutdown, ShutdownTrigger};
