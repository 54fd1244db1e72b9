//! Spatial-subsystem error type.
//!
//! Both variants are fatal for a simulation run: they are raised while
//! loading, before the scheduler starts.

use thiserror::Error;

/// Errors produced by `fleet-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("geo dataset unavailable: {0}")]
    DataUnavailable(String),

    #[error("geo dataset contains no usable nodes")]
    EmptyDataset,
}

impl From<std::io::Error> for SpatialError {
    fn from(e: std::io::Error) -> Self {
        SpatialError::DataUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for SpatialError {
    fn from(e: serde_json::Error) -> Self {
        SpatialError::DataUnavailable(format!("parse error: {e}"))
    }
}

pub type SpatialResult<T> = Result<T, SpatialError>;
