//! Fluent builder that spawns the agent population.
//!
//! # Usage
//!
//! ```ignore
//! use fleet_agent::AgentStoreBuilder;
//!
//! let store = AgentStoreBuilder::new(/*seed=*/ 42)
//!     .city("delhi")
//!     .identities(roster.select(10, &mut sim_rng))
//!     .build(&dataset, &mut sim_rng);
//!
//! assert_eq!(store.len(), 10);
//! ```
//!
//! Each agent gets a uniformly random vehicle class and a uniformly random
//! start node, both drawn from the scheduler's `SimRng`, plus its own
//! `AgentRng` seeded from `seed` and its ID.

use fleet_core::{AgentId, AgentRng, SimRng, VehicleClass};
use fleet_spatial::GeoDataset;

use crate::{AgentStore, MovementAgent};

/// City label used when none is given.
pub const DEFAULT_CITY: &str = "delhi";

/// Fluent builder for [`AgentStore`].
pub struct AgentStoreBuilder {
    seed:       u64,
    city:       String,
    identities: Vec<String>,
}

impl AgentStoreBuilder {
    /// `seed` is the global seed the per-agent RNGs are derived from.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            city:       DEFAULT_CITY.to_owned(),
            identities: Vec::new(),
        }
    }

    /// City label reported by every agent.
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    /// One agent is created per identity, in order; the first gets
    /// `AgentId(0)`.
    pub fn identities(mut self, identities: impl IntoIterator<Item = String>) -> Self {
        self.identities.extend(identities);
        self
    }

    pub fn build(self, dataset: &GeoDataset, rng: &mut SimRng) -> AgentStore {
        let agents = self
            .identities
            .into_iter()
            .zip(0u32..)
            .map(|(identity, i)| {
                let id = AgentId(i);
                let class = VehicleClass::random(rng.inner());
                let start = dataset.random(rng.inner());
                MovementAgent::new(
                    id,
                    identity,
                    self.city.clone(),
                    class,
                    start,
                    AgentRng::new(self.seed, id),
                )
            })
            .collect();

        AgentStore::new(agents)
    }
}
