//! Configuration error type.
//!
//! Configuration problems are never fatal: each one is reported as a
//! warning and the affected setting reverts to its default.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for `{key}` ({reason}); using default {default}")]
    InvalidConfiguration {
        key:     &'static str,
        value:   String,
        reason:  &'static str,
        default: String,
    },
}

impl ConfigError {
    /// The setting this warning is about.
    pub fn key(&self) -> &'static str {
        match self {
            ConfigError::InvalidConfiguration { key, .. } => key,
        }
    }
}
