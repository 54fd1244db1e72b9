//! Deterministic per-agent and scheduler-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each agent owns an independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive agent IDs uniformly across the seed space.
//!
//! - The RNG travels with the agent record into whichever worker moves it,
//!   so an agent's walk does not depend on which worker ran it or in what
//!   order the batch completed.
//! - The scheduler's own draws (batch sampling, vehicle classes, start
//!   positions) come from a separate `SimRng`.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::AgentId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG, owned by the agent record.
#[derive(Clone, Debug)]
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and an agent ID.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` APIs and with
    /// functions generic over `R: Rng`.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Scheduler-level RNG for global operations: roster sampling, agent
/// initialisation and per-tick batch sampling.
///
/// Used only from the scheduler's own task; workers never touch it.
#[derive(Clone, Debug)]
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Draw `amount` distinct indices from `0..len` (all of them, in random
    /// order, if `amount >= len`).
    pub fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.0, len, amount.min(len)).into_vec()
    }
}
