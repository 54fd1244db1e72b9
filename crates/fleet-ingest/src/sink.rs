//! The delivery seam between the scheduler and the outside world.

use std::sync::Arc;

use async_trait::async_trait;

use fleet_agent::LocationReport;

use crate::Outcome;

/// Anything that can accept an agent's current location.
///
/// Implementations must not panic or return early with an error: every
/// failure is reported through the returned [`Outcome`].  They hold no
/// per-agent state and are called concurrently from the worker pool.
/// There is no retry at this level.
#[async_trait]
pub trait LocationSink: Send + Sync {
    async fn report(&self, report: &LocationReport) -> Outcome;
}

#[async_trait]
impl<S: LocationSink + ?Sized> LocationSink for Arc<S> {
    async fn report(&self, report: &LocationReport) -> Outcome {
        (**self).report(report).await
    }
}
