//! `fleet-agent`: per-vehicle movement state for the fleet simulator.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`agent`]     | `MovementAgent`, `LocationReport` (wire snapshot)           |
//! | [`store`]     | `AgentStore` (arena indexed by `AgentId`)                   |
//! | [`builder`]   | `AgentStoreBuilder` (spawn agents from a roster + dataset)  |
//! | [`roster`]    | `Roster`, `load_roster_path`, `load_roster_reader`          |
//! | [`error`]     | `AgentError`, `AgentResult<T>`                              |
//!
//! Agents never reference each other or the dataset; the scheduler owns the
//! store and lends the shared `GeoDataset` to each move.

pub mod agent;
pub mod builder;
pub mod error;
pub mod roster;
pub mod store;


pub use agent::{LocationReport, MovementAgent};
pub use builder::AgentStoreBuilder;
pub use error::{AgentError, AgentResult};
pub use roster::{Roster, load_roster_path, load_roster_reader, load_roster_str};
pub use store::AgentStore;
