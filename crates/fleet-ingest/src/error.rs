//! Ingestion client construction errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("invalid ingestion endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

pub type IngestResult<T> = Result<T, IngestError>;
