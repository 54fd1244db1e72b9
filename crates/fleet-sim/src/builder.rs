//! Fluent builder for constructing a [`Scheduler`].

use std::sync::Arc;

use fleet_agent::{AgentError, AgentStore, AgentStoreBuilder, Roster};
use fleet_core::{SimConfig, SimRng, Tick};
use fleet_ingest::LocationSink;
use fleet_spatial::GeoDataset;

use crate::pool::WorkerPool;
use crate::{RunTotals, Scheduler, SchedulerState, SimError, SimResult};

/// Where the agent population comes from.
enum Population {
    None,
    Roster(Roster),
    Identities(Vec<String>),
    Store(AgentStore),
}

/// Fluent builder for [`Scheduler`].
///
/// # Required inputs
///
/// - [`SimConfig`]: interval, parallelism, agent count, radius, seed, …
/// - [`GeoDataset`]: shared read-only by every worker
/// - a [`LocationSink`]: usually an `HttpIngestClient`
/// - a population: exactly one of `.roster(r)`, `.identities(v)` or
///   `.agents(store)`
///
/// # Example
///
/// ```rust,ignore
/// let mut scheduler = SchedulerBuilder::new(config, dataset, Arc::new(client))
///     .roster(roster)
///     .build()?;
/// scheduler.run(&mut shutdown, &mut observer).await?;
/// ```
pub struct SchedulerBuilder {
    config:     SimConfig,
    dataset:    Arc<GeoDataset>,
    sink:       Arc<dyn LocationSink>,
    population: Population,
}

impl SchedulerBuilder {
    pub fn new(
        config:  SimConfig,
        dataset: impl Into<Arc<GeoDataset>>,
        sink:    Arc<dyn LocationSink>,
    ) -> Self {
        Self {
            config,
            dataset: dataset.into(),
            sink,
            population: Population::None,
        }
    }

    /// Draw `config.agent_count` operators from `roster` at build time.
    pub fn roster(mut self, roster: Roster) -> Self {
        self.population = Population::Roster(roster);
        self
    }

    /// Use exactly these identities, one agent each.
    pub fn identities(mut self, identities: Vec<String>) -> Self {
        self.population = Population::Identities(identities);
        self
    }

    /// Use a pre-built store as is.
    pub fn agents(mut self, store: AgentStore) -> Self {
        self.population = Population::Store(store);
        self
    }

    /// Spawn the worker pool and assemble the scheduler in state `Idle`.
    ///
    /// The pool has `min(max_parallel, agents)` workers.
    ///
    /// # Errors
    ///
    /// - [`SimError::NoRuntime`] if called outside a tokio runtime.
    /// - [`SimError::Agent`] with [`AgentError::NoOperators`] if the
    ///   population is missing or empty.
    pub fn build(self) -> SimResult<Scheduler> {
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(SimError::NoRuntime);
        }

        let seed = self.config.seed.unwrap_or_else(rand::random);
        let mut rng = SimRng::new(seed);

        let agents = match self.population {
            Population::Store(store) => store,
            Population::Roster(roster) => {
                let picked = roster.select(self.config.agent_count, &mut rng);
                spawn_agents(&self.config, seed, picked, &self.dataset, &mut rng)
            }
            Population::Identities(ids) => {
                spawn_agents(&self.config, seed, ids, &self.dataset, &mut rng)
            }
            Population::None => AgentStore::default(),
        };
        if agents.is_empty() {
            return Err(AgentError::NoOperators.into());
        }

        // No tick ever has more agents in flight than there are agents.
        let pool = WorkerPool::spawn(
            self.config.max_parallel.min(agents.len()),
            Arc::clone(&self.dataset),
            self.sink,
            self.config.max_radius_km,
        );

        tracing::debug!(
            seed,
            agents = agents.len(),
            workers = pool.size(),
            nodes = self.dataset.len(),
            "scheduler built"
        );

        Ok(Scheduler {
            config:  self.config,
            state:   SchedulerState::Idle,
            agents,
            dataset: self.dataset,
            pool,
            rng,
            seed,
            tick:    Tick::ZERO,
            totals:  RunTotals::default(),
        })
    }
}

fn spawn_agents(
    config:     &SimConfig,
    seed:       u64,
    identities: Vec<String>,
    dataset:    &GeoDataset,
    rng:        &mut SimRng,
) -> AgentStore {
    AgentStoreBuilder::new(seed)
        .city(config.city.clone())
        .identities(identities)
        .build(dataset, rng)
}
