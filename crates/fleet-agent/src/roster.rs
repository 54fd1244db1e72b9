//! Operator roster: the identity feed agents are created from.
//!
//! The feed is a JSON array of registered users.  Only records whose
//! `user_type` is `"driver"` become vehicle operators; their `email` is the
//! agent identity.  Other fields are ignored.
//!
//! ```json
//! [ { "name": "A", "email": "a@x.io", "user_type": "driver" },
//!   { "name": "B", "email": "b@x.io", "user_type": "customer" } ]
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use fleet_core::SimRng;

use crate::{AgentError, AgentResult};

/// Role tag marking a vehicle operator.
pub const OPERATOR_ROLE: &str = "driver";

#[derive(Deserialize)]
struct UserRecord {
    #[serde(default)]
    email:     Option<String>,
    #[serde(default)]
    user_type: String,
}

/// Identities of every vehicle operator in the feed, in feed order.
/// Never empty.
#[derive(Clone, Debug)]
pub struct Roster {
    operators: Vec<String>,
}

impl Roster {
    /// # Errors
    ///
    /// [`AgentError::NoOperators`] if `operators` is empty.
    pub fn new(operators: Vec<String>) -> AgentResult<Self> {
        if operators.is_empty() {
            return Err(AgentError::NoOperators);
        }
        Ok(Self { operators })
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    pub fn operators(&self) -> &[String] {
        &self.operators
    }

    /// Draw `n` distinct operators uniformly at random, or all of them (in
    /// random order) if the roster is smaller.
    pub fn select(&self, n: usize, rng: &mut SimRng) -> Vec<String> {
        rng.sample_indices(self.operators.len(), n)
            .into_iter()
            .map(|i| self.operators[i].clone())
            .collect()
    }
}

/// Load a [`Roster`] from a JSON user file.
///
/// # Errors
///
/// [`AgentError::DataUnavailable`] if the file cannot be opened or parsed,
/// [`AgentError::NoOperators`] if no record is an operator with an email.
pub fn load_roster_path(path: &Path) -> AgentResult<Roster> {
    let file = File::open(path)?;
    load_roster_reader(BufReader::new(file))
}

/// Like [`load_roster_path`] but accepts any `Read` source.
pub fn load_roster_reader<R: Read>(reader: R) -> AgentResult<Roster> {
    let users: Vec<UserRecord> = serde_json::from_reader(reader)?;
    Roster::new(operator_identities(users))
}

/// Like [`load_roster_path`] but parses an in-memory string.
pub fn load_roster_str(json: &str) -> AgentResult<Roster> {
    let users: Vec<UserRecord> = serde_json::from_str(json)?;
    Roster::new(operator_identities(users))
}

fn operator_identities(users: Vec<UserRecord>) -> Vec<String> {
    users
        .into_iter()
        .filter(|u| u.user_type == OPERATOR_ROLE)
        .filter_map(|u| u.email)
        .collect()
}
