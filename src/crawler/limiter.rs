//! Worker-slot pool bounding simultaneous fetches

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

/// Bounded pool of worker slots
///
/// Capacity equals the configured worker count. A slot is held only for the
/// network phase of a fetch.
#[derive(Debug, Clone)]
pub struct Limiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// A held worker slot; the slot returns to the pool when this is dropped
#[derive(Debug)]
pub struct WorkerSlot {
    _permit: OwnedSemaphorePermit,
}

impl WorkerSlot {
    /// Returns the slot to the pool
    pub fn release(self) {
        drop(self);
    }
}

impl Limiter {
    pub fn new(workers: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(workers)),
            capacity: workers,
        }
    }

    /// Waits for a free slot
    ///
    /// Returns None if `cancel` fires before a slot becomes available.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Option<WorkerSlot> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            permit = self.semaphore.clone().acquire_owned() => {
                permit.ok().map(|permit| WorkerSlot { _permit: permit })
            }
        }
    }

    /// Total number of slots
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots not currently held
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Slots currently held
    pub fn in_use(&self) -> usize {
        self.capacity.saturating_sub(self.available())
    }
}
