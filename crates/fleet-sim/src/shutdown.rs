//! Cooperative cancellation.
//!
//! A [`ShutdownTrigger`] flips a shared flag once; every [`Shutdown`] handle
//! observes it.  The scheduler checks the flag between ticks and races it
//! against the pacing sleep, so a tick that has started always finishes.
//!
//! ```ignore
//! let (trigger, mut shutdown) = fleet_sim::shutdown::channel();
//! tokio::spawn(async move {
//!     let _ = tokio::signal::ctrl_c().await;
//!     trigger.trigger();
//! });
//! scheduler.run(&mut shutdown, &mut observer).await?;
//! ```

use tokio::sync::watch;

/// Create a linked trigger / listener pair.
pub fn channel() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger(tx), Shutdown(rx))
}

/// Sending half.  Triggering is idempotent.
#[derive(Debug)]
pub struct ShutdownTrigger(watch::Sender<bool>);

impl ShutdownTrigger {
    pub fn trigger(&self) {
        self.0.send_replace(true);
    }
}

/// Listening half; cheap to clone.
#[derive(Clone, Debug)]
pub struct Shutdown(watch::Receiver<bool>);

impl Shutdown {
    pub fn is_triggered(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once the trigger fires.  Never resolves if the trigger is
    /// dropped without firing.
    pub async fn triggered(&mut self) {
        if self.0.wait_for(|&fired| fired).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
