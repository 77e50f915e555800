//! Introspection surface and the external monitor contract.
//!
//! A buffering sink exposes three pollable values: its fixed capacity, the
//! number of records currently queued, and the total number of records
//! dropped under the drop policy. An optional [`Monitor`] receives a
//! cloneable [`Inspector`] handle over those values when the sink is built
//! and is told to stop observing during shutdown.

use std::fmt;
use std::sync::Arc;

/// Read-only view over a buffering sink's health counters.
///
/// # Thread Safety
///
/// All three accessors may be polled concurrently from any thread; they
/// never block, never fail, and never mutate state.
pub trait Inspect: Send + Sync {
    /// The fixed buffer capacity set at construction.
    fn capacity(&self) -> usize;

    /// The number of records currently waiting in the buffer.
    fn queued(&self) -> usize;

    /// Total records discarded because the buffer was full under the drop
    /// policy. Monotonically non-decreasing.
    fn dropped(&self) -> u64;
}

/// Cloneable handle a [`Monitor`] polls to observe a buffering sink.
#[derive(Clone)]
pub struct Inspector {
    inner: Arc<dyn Inspect>,
}

impl Inspector {
    /// Wrap a shared introspection source.
    pub fn new(inner: Arc<dyn Inspect>) -> Self {
        Self { inner }
    }

    /// The fixed buffer capacity.
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Records currently queued.
    pub fn queued(&self) -> usize {
        self.inner.queued()
    }

    /// Total records dropped so far.
    pub fn dropped(&self) -> u64 {
        self.inner.dropped()
    }
}

impl fmt::Debug for Inspector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inspector")
            .field("capacity", &self.capacity())
            .field("queued", &self.queued())
            .field("dropped", &self.dropped())
            .finish()
    }
}

/// External observer of a buffering sink.
///
/// Supplying a monitor is optional; when present, the sink calls
/// [`start_observing`](Monitor::start_observing) once at construction and
/// [`stop_observing`](Monitor::stop_observing) once during shutdown, in that
/// order. The monitor only observes — it never owns the sink.
pub trait Monitor: Send + Sync {
    /// Begin observing; the inspector stays valid for polling until
    /// `stop_observing` is called.
    fn start_observing(&self, inspector: Inspector);

    /// Stop observing the given sink.
    fn stop_observing(&self, inspector: &Inspector);
}
