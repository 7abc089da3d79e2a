use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Limits how many metadata fetches run at once.
///
/// Call [`Throttler::acquire`] before each unit of work and hold the returned permit
/// until the work is done. At most `max_concurrent` permits are outstanding.
#[derive(Debug)]
pub struct Throttler {
    semaphore: Arc<Semaphore>,
}

impl Throttler {
    /// Create a throttler allowing `max_concurrent` tasks at a time (at least one).
    #[must_use]
    pub fn new(max_concurrent: usize) -> Arc<Self> {
        Arc::new(Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
        })
    }

    /// Wait for a free slot.
    pub async fn acquire(&self) -> OwnedSemaphorePermit {
        Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .expect("semaphore is never closed")
    }
}
