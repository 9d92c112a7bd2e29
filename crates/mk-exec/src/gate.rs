use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

use crate::error::ExecError;

/// Counting admission gate bounding simultaneous invocations.
///
/// At no instant are more than `capacity` [`GatePermit`]s alive.
#[derive(Debug)]
pub struct Gate {
    sem: Arc<Semaphore>,
    capacity: usize,
    admitted: AtomicU64,
}

/// One held execution slot; the slot is returned when the permit is dropped.
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl Gate {
    pub fn new(capacity: usize) -> Self {
        Self {
            sem: Arc::new(Semaphore::new(capacity)),
            capacity,
            admitted: AtomicU64::new(0),
        }
    }

    /// Wait for a slot or for `cancel` to fire, whichever comes first.
    ///
    /// Cancellation wins over a simultaneously available slot and grants nothing.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<GatePermit, ExecError> {
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ExecError::AdmissionCancelled),
            permit = Arc::clone(&self.sem).acquire_owned() => {
                permit.map_err(|_| ExecError::GateClosed)?
            }
        };
        self.admitted.fetch_add(1, Ordering::Relaxed);
        Ok(GatePermit { _permit: permit })
    }

    /// Stop admitting. Waiters and later callers get [`ExecError::GateClosed`];
    /// permits already held stay valid until dropped.
    pub fn close(&self) {
        self.sem.close();
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.sem.is_closed()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn available(&self) -> usize {
        self.sem.available_permits()
    }

    #[inline]
    pub fn in_use(&self) -> usize {
        self.capacity.saturating_sub(self.available())
    }

    /// Total number of successful acquisitions since construction.
    #[inline]
    pub fn admitted(&self) -> u64 {
        self.admitted.load(Ordering::Relaxed)
    }
}
