//! Result of one delivery attempt.

use std::fmt;

/// How a single location report fared.  Failure is a value, not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The service acknowledged with a 2xx status.
    Delivered { status: u16 },
    /// Transport error, timeout, or non-2xx status.  Sub-causes are only
    /// distinguished in `reason`.
    DeliveryFailed { reason: String },
}

impl Outcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Outcome::DeliveryFailed { reason: reason.into() }
    }

    #[inline]
    pub fn is_delivered(&self) -> bool {
        matches!(self, Outcome::Delivered { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Delivered { status }      => write!(f, "delivered ({status})"),
            Outcome::DeliveryFailed { reason } => write!(f, "delivery failed: {reason}"),
        }
    }
}
