use fleet_agent::AgentError;
use fleet_core::AgentId;
use fleet_ingest::IngestError;
use fleet_spatial::SpatialError;
use thiserror::Error;

use crate::SchedulerState;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("cannot {op} while the scheduler is {state}")]
    InvalidState {
        op:    &'static str,
        state: SchedulerState,
    },

    #[error("{0} is unknown or already dispatched")]
    AgentMissing(AgentId),

    #[error("worker pool closed unexpectedly")]
    PoolClosed,

    #[error("the scheduler must be built inside a tokio runtime")]
    NoRuntime,
}

pub type SimResult<T> = Result<T, SimError>;
