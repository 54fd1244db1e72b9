//! Agent-subsystem error type.

use thiserror::Error;

/// Errors produced by `fleet-agent`.
///
/// Both are start-up failures: without operators there is nothing to
/// simulate.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("operator roster unavailable: {0}")]
    DataUnavailable(String),

    #[error("operator roster contains no vehicle operators")]
    NoOperators,
}

impl From<std::io::Error> for AgentError {
    fn from(e: std::io::Error) -> Self {
        AgentError::DataUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(e: serde_json::Error) -> Self {
        AgentError::DataUnavailable(format!("parse error: {e}"))
    }
}

pub type AgentResult<T> = Result<T, AgentError>;
