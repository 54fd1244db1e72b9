//! `fleet-core`: foundational types for the fleet movement simulator.
//!
//! This crate is a dependency of every other `fleet-*` crate.  It has no
//! `fleet-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                 |
//! |-----------------|----------------------------------------------------------|
//! | [`ids`]         | `AgentId`                                                |
//! | [`geo`]         | `Coordinate`, `Direction`, haversine distance            |
//! | [`time`]        | `Tick`, `pacing_delay`                                   |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (scheduler)             |
//! | [`vehicle`]     | `VehicleClass`, `AgentStatus`                            |
//! | [`config`]      | `SimConfig`, `SimConfig::resolve`                        |
//! | [`error`]       | `ConfigError`                                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required by `fleet-agent` for the wire payload.            |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;
pub mod vehicle;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SimConfig;
pub use error::ConfigError;
pub use geo::{Coordinate, Direction, EARTH_RADIUS_KM, distance_km};
pub use ids::AgentId;
pub use rng::{AgentRng, SimRng};
pub use time::{Tick, pacing_delay};
pub use vehicle::{AgentStatus, VehicleClass};
