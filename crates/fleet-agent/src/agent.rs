//! A single simulated vehicle and the snapshot it reports.
//!
//! # Ownership
//!
//! A `MovementAgent` is plain owned data.  The scheduler moves the whole
//! record into the worker that advances it and receives it back when the
//! work is done, so at most one task can mutate an agent at a time without
//! any locking.  The agent's RNG travels with it for the same reason.

use serde::{Deserialize, Serialize};

use fleet_core::{AgentId, AgentRng, AgentStatus, Coordinate, Direction, VehicleClass};
use fleet_spatial::{GeoDataset, Hop, HopKind, select_hop};

// ── LocationReport ────────────────────────────────────────────────────────────

/// Read-only value snapshot of an agent, in the shape the ingestion service
/// accepts.
///
/// ```json
/// { "driver_id": "a@b.c", "city": "delhi", "latitude": 26.28,
///   "longitude": 73.03, "vehicle_type": "STANDARD", "status": "ACTIVE" }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationReport {
    #[serde(rename = "driver_id")]
    pub identity:      String,
    pub city:          String,
    pub latitude:      f64,
    pub longitude:     f64,
    #[serde(rename = "vehicle_type")]
    pub vehicle_class: VehicleClass,
    pub status:        AgentStatus,
}

impl LocationReport {
    pub fn position(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

// ── MovementAgent ─────────────────────────────────────────────────────────────

/// Mutable per-vehicle state.
#[derive(Clone, Debug)]
pub struct MovementAgent {
    id:             AgentId,
    identity:       String,
    city:           String,
    vehicle_class:  VehicleClass,
    status:         AgentStatus,
    position:       Coordinate,
    /// `None` until the first move.
    last_direction: Option<Direction>,
    active:         bool,
    update_count:   u64,
    last_hop:       Option<Hop>,
    rng:            AgentRng,
}

impl MovementAgent {
    /// Create an active agent at `position` that has not moved yet.
    pub fn new(
        id:            AgentId,
        identity:      impl Into<String>,
        city:          impl Into<String>,
        vehicle_class: VehicleClass,
        position:      Coordinate,
        rng:           AgentRng,
    ) -> Self {
        Self {
            id,
            identity: identity.into(),
            city: city.into(),
            vehicle_class,
            status: AgentStatus::Active,
            position,
            last_direction: None,
            active: true,
            update_count: 0,
            last_hop: None,
            rng,
        }
    }

    /// Move to the next node chosen by the selector.
    ///
    /// Returns `false` without touching any state when the agent is
    /// inactive.  Otherwise records the heading of the move, bumps the
    /// update counter, and returns `true`.
    pub fn advance(&mut self, dataset: &GeoDataset, max_radius_km: f64) -> bool {
        if !self.active {
            return false;
        }

        let hop = select_hop(
            self.position,
            dataset,
            self.last_direction,
            max_radius_km,
            self.rng.inner(),
        );

        self.last_direction = Some(self.position.direction_to(hop.to));
        self.position = hop.to;
        self.update_count += 1;
        self.last_hop = Some(hop);
        true
    }

    /// The payload handed to the ingestion client.
    pub fn snapshot(&self) -> LocationReport {
        LocationReport {
            identity:      self.identity.clone(),
            city:          self.city.clone(),
            latitude:      self.position.lat,
            longitude:     self.position.lon,
            vehicle_class: self.vehicle_class,
            status:        self.status,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn vehicle_class(&self) -> VehicleClass {
        self.vehicle_class
    }

    pub fn status(&self) -> AgentStatus {
        self.status
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn last_direction(&self) -> Option<Direction> {
        self.last_direction
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Externally driven; nothing inside the simulator deactivates agents.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Number of successful `advance` calls.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// The most recent hop, if the agent has moved.
    pub fn last_hop(&self) -> Option<Hop> {
        self.last_hop
    }

    /// `true` if the most recent hop used the whole-dataset fallback.
    pub fn teleported(&self) -> bool {
        matches!(self.last_hop, Some(Hop { kind: HopKind::Teleport, .. }))
    }
}
