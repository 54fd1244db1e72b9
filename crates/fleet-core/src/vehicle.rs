//! Vehicle class and status labels carried on every location report.
//!
//! Both serialize to the upper-case labels the ingestion service expects.

use rand::Rng;

/// The class of a simulated vehicle.  Chosen once when the agent is
/// created and fixed for its lifetime.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum VehicleClass {
    #[default]
    Standard,
    Premium,
    Compact,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 3] = [
        VehicleClass::Standard,
        VehicleClass::Premium,
        VehicleClass::Compact,
    ];

    /// Uniformly random class.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleClass::Standard => "STANDARD",
            VehicleClass::Premium  => "PREMIUM",
            VehicleClass::Compact  => "COMPACT",
        }
    }
}

impl std::fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operational status reported for an agent.
///
/// Agents driven by the simulator always report `Active`; whether an agent
/// moves at all is governed by its activity flag, not by this label.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[non_exhaustive]
pub enum AgentStatus {
    #[default]
    Active,
}

impl AgentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentStatus::Active => "ACTIVE",
        }
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
