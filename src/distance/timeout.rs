//! Deadline wrapper for blocking distance lookups
//!
//! The inner estimator runs on a short-lived worker thread while the caller
//! waits on a channel with `recv_timeout`. When the deadline passes the caller
//! gets `DistanceError::Timeout` straight away. The worker is detached and its
//! late result is dropped.
//!
//! Detached workers still count against `max_in_flight`. Once that many
//! lookups are running, further calls fail fast with `Unavailable` instead of
//! piling threads onto a hung backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::{DistanceError, DistanceEstimator};

pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// Bounds any estimator with a deadline
pub struct TimeoutEstimator<E> {
    inner: Arc<E>,
    timeout: Duration,
    max_in_flight: usize,
    in_flight: Arc<AtomicUsize>,
}

impl<E: DistanceEstimator + 'static> TimeoutEstimator<E> {
    pub fn new(inner: E, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            timeout,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Limit on concurrently running lookups, abandoned ones included
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Lookups currently running, including ones whose caller already timed out
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Releases a lookup slot when the worker finishes, even by panicking
struct SlotGuard(Arc<AtomicUsize>);

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl<E: DistanceEstimator + 'static> DistanceEstimator for TimeoutEstimator<E> {
    fn distance_km(&self, origin: &str, destination: &str) -> Result<f64, DistanceError> {
        if self.in_flight.fetch_add(1, Ordering::AcqRel) >= self.max_in_flight {
            self.in_flight.fetch_sub(1, Ordering::AcqRel);
            tracing::warn!("{} distance lookups already in flight", self.max_in_flight);
            return Err(DistanceError::Unavailable(format!(
                "{} lookups already in flight",
                self.max_in_flight
            )));
        }
        let slot = SlotGuard(Arc::clone(&self.in_flight));

        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let (origin, destination) = (origin.to_string(), destination.to_string());

        // On spawn failure the closure is dropped, and the slot with it
        thread::Builder::new()
            .name("distance-lookup".to_string())
            .spawn(move || {
                let _slot = slot;
                // Receiver is gone after a timeout
                let _ = tx.send(inner.distance_km(&origin, &destination));
            })
            .map_err(|e| DistanceError::Unavailable(format!("failed to start lookup: {}", e)))?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!("Distance lookup exceeded {:?}", self.timeout);
                Err(DistanceError::Timeout(self.timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(DistanceError::Unavailable(
                "lookup worker exited without a result".to_string(),
            )),
        }
    }
}
