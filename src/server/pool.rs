//! Bounded worker pool
//!
//! Each admitted connection holds one permit for its whole lifetime.
//! Admission is non-queuing: when all permits are taken the submission
//! fails immediately and the caller answers with 503.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};

/// Returned when the pool is at its concurrency ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Saturated;

/// Fixed-size pool of connection workers.
#[derive(Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
}

impl WorkerPool {
    /// Create a pool with `max_workers` concurrent slots.
    pub fn new(max_workers: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_workers)),
        }
    }

    /// Try to admit one connection.
    ///
    /// Never blocks: returns the worker's permit, or `Saturated` when
    /// every slot is in flight. The permit must be held by the worker
    /// task until the connection is closed.
    pub fn try_admit(&self) -> Result<OwnedSemaphorePermit, Saturated> {
        self.permits
            .clone()
            .try_acquire_owned()
            .map_err(|_: TryAcquireError| Saturated)
    }

    /// Number of free worker slots.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}
