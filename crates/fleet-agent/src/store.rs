//! Agent arena: every `MovementAgent`, indexed by its stable `AgentId`.
//!
//! # Check-out / check-in
//!
//! Workers need exclusive, owned access to an agent for the length of one
//! `advance` + `report`.  Rather than locking, the scheduler *checks out*
//! the record (its slot becomes empty), sends it to a worker, and *checks
//! it back in* when the worker returns it:
//!
//! ```ignore
//! let agent = store.checkout(id).ok_or(SimError::AgentMissing(id))?;
//! pool.submit(Job { agent, .. }).await?;
//! // ...
//! store.checkin(done.agent);
//! ```
//!
//! An agent that is checked out cannot be checked out a second time, so a
//! tick can never mutate the same agent twice concurrently.

use fleet_core::AgentId;

use crate::MovementAgent;

/// Owns all agents.  `AgentId(i)` always refers to slot `i`.
#[derive(Default)]
pub struct AgentStore {
    slots: Vec<Option<MovementAgent>>,
}

impl AgentStore {
    /// Build from agents, each placed in the slot named by its ID.
    ///
    /// IDs are expected to be dense (`0..n`); a gap leaves an empty slot
    /// that behaves like a checked-out agent.
    pub fn new(agents: Vec<MovementAgent>) -> Self {
        let mut slots: Vec<Option<MovementAgent>> = Vec::with_capacity(agents.len());
        for agent in agents {
            let i = agent.id().index();
            if slots.len() <= i {
                slots.resize_with(i + 1, || None);
            }
            slots[i] = Some(agent);
        }
        Self { slots }
    }

    /// Number of agents, including any currently checked out.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.slots.len() as u32).map(AgentId)
    }

    /// Agents currently in the store (not checked out).
    pub fn iter(&self) -> impl Iterator<Item = &MovementAgent> + '_ {
        self.slots.iter().flatten()
    }

    pub fn get(&self, id: AgentId) -> Option<&MovementAgent> {
        self.slots.get(id.index())?.as_ref()
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut MovementAgent> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    /// Take an agent out of its slot.  `None` if the ID is unknown or the
    /// agent is already checked out.
    pub fn checkout(&mut self, id: AgentId) -> Option<MovementAgent> {
        self.slots.get_mut(id.index())?.take()
    }

    /// Return an agent to its slot.
    ///
    /// Returns the agent back as `Err` if its slot is out of range or
    /// occupied, which means it was not checked out of this store.
    pub fn checkin(&mut self, agent: MovementAgent) -> Result<(), MovementAgent> {
        match self.slots.get_mut(agent.id().index()) {
            Some(slot @ None) => {
                *slot = Some(agent);
                Ok(())
            }
            _ => Err(agent),
        }
    }

    /// `true` when no agent is checked out.
    pub fn is_settled(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Set an agent's activity flag.  Returns `false` if the agent is
    /// unknown or currently checked out.
    pub fn set_active(&mut self, id: AgentId, active: bool) -> bool {
        match self.get_mut(id) {
            Some(agent) => {
                agent.set_active(active);
                true
            }
            None => false,
        }
    }
}
