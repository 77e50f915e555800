//! The public buffering sink facade and its builder.
//!
//! `BufferedSink` wraps one downstream [`Sink`] behind a bounded queue
//! engine and owns the engine's worker lifetime. Producers call
//! [`emit`](BufferedSink::emit) from any thread; [`close`](BufferedSink::close)
//! stops intake, drains the backlog, joins the worker, and notifies the
//! optional [`Monitor`].

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use weir_core::{Error, Inspector, Monitor, OverflowPolicy, Result, Sink};
use weir_engine::{ChannelEngine, Engine, SwapEngine};

/// Default buffer capacity when none is configured.
const DEFAULT_CAPACITY: usize = 10_000;

/// A bounded buffering sink draining into a wrapped [`Sink`] on a dedicated
/// worker thread.
///
/// # Thread Safety
///
/// `emit` may be called concurrently from any number of threads. `close` is
/// intended to be called once from one thread; it is idempotent, and `Drop`
/// performs the same shutdown if `close` was never called.
pub struct BufferedSink<R> {
    engine: Box<dyn Engine<R>>,
    inspector: Inspector,
    monitor: Option<Arc<dyn Monitor>>,
    closed: AtomicBool,
}

impl<R: Send + 'static> BufferedSink<R> {
    /// Start configuring a buffering sink.
    pub fn builder() -> BufferedSinkBuilder<R> {
        BufferedSinkBuilder::new()
    }

    /// Enqueue one record for background delivery.
    ///
    /// Applies the configured [`OverflowPolicy`] when the buffer is full.
    /// After shutdown has begun this is a silent no-op, which makes the race
    /// between a final `emit` and a concurrent `close` benign. Never returns
    /// or panics with an error toward the producer.
    pub fn emit(&self, record: R) {
        self.engine.enqueue(record);
    }

    /// Shut down: stop accepting records, drain everything enqueued so far,
    /// join the worker, run the wrapped sink's shutdown hook, and unregister
    /// the monitor.
    ///
    /// Blocks until the worker has exited — an unbounded wait by design.
    pub fn close(&self) {
        self.close_inner();
    }
}

impl<R> BufferedSink<R> {
    /// The fixed buffer capacity.
    pub fn capacity(&self) -> usize {
        self.inspector.capacity()
    }

    /// Records currently waiting in the buffer.
    pub fn queued(&self) -> usize {
        self.inspector.queued()
    }

    /// Total records dropped under the drop policy so far.
    pub fn dropped(&self) -> u64 {
        self.inspector.dropped()
    }

    /// A cloneable introspection handle, identical to the one handed to a
    /// configured [`Monitor`].
    pub fn inspector(&self) -> Inspector {
        self.inspector.clone()
    }

    fn close_inner(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.engine.close();
        if let Some(monitor) = &self.monitor {
            monitor.stop_observing(&self.inspector);
        }
    }
}

impl<R> Drop for BufferedSink<R> {
    fn drop(&mut self) {
        self.close_inner();
    }
}

/// Builder for [`BufferedSink`].
///
/// Defaults: capacity 10 000, [`OverflowPolicy::Drop`], no monitor.
pub struct BufferedSinkBuilder<R> {
    capacity: usize,
    policy: OverflowPolicy,
    monitor: Option<Arc<dyn Monitor>>,
    _records: PhantomData<fn(R)>,
}

impl<R: Send + 'static> BufferedSinkBuilder<R> {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            policy: OverflowPolicy::default(),
            monitor: None,
            _records: PhantomData,
        }
    }

    /// Set the buffer capacity. Must be positive; validated at build time.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Select what `emit` does when the buffer is full.
    pub fn on_full(mut self, policy: OverflowPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Attach an external monitor. Its `start_observing` hook runs once
    /// during build, `stop_observing` once during shutdown.
    pub fn monitor(mut self, monitor: Arc<dyn Monitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Build with the bounded-channel engine.
    pub fn build<S>(self, sink: S) -> Result<BufferedSink<R>>
    where
        S: Sink<R> + 'static,
    {
        self.validate()?;
        let engine = ChannelEngine::spawn(sink, self.capacity, self.policy)?;
        Ok(Self::finish(Box::new(engine), self.monitor))
    }

    /// Build with the lock-free swap engine.
    ///
    /// Requires `R: Clone + Sync`: each compare-and-swap attempt
    /// materializes a new sequence containing the record, and the published
    /// sequence is shared across threads.
    pub fn build_swap<S>(self, sink: S) -> Result<BufferedSink<R>>
    where
        R: Clone + Sync,
        S: Sink<R> + 'static,
    {
        self.validate()?;
        let engine = SwapEngine::spawn(sink, self.capacity, self.policy)?;
        Ok(Self::finish(Box::new(engine), self.monitor))
    }

    fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::InvalidCapacity(self.capacity));
        }
        Ok(())
    }

    fn finish(engine: Box<dyn Engine<R>>, monitor: Option<Arc<dyn Monitor>>) -> BufferedSink<R> {
        let inspector = engine.inspector();
        if let Some(monitor) = &monitor {
            monitor.start_observing(inspector.clone());
        }
        BufferedSink {
            engine,
            inspector,
            monitor,
            closed: AtomicBool::new(false),
        }
    }
}

impl<R: Send + 'static> Default for BufferedSinkBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weir_core::SinkError;

    struct Discard;

    impl Sink<u32> for Discard {
        fn consume(&mut self, _record: u32) -> std::result::Result<(), SinkError> {
            Ok(())
        }
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let err = BufferedSink::builder().capacity(0).build(Discard).err();
        assert!(matches!(err, Some(Error::InvalidCapacity(0))));

        let err = BufferedSink::builder().capacity(0).build_swap(Discard).err();
        assert!(matches!(err, Some(Error::InvalidCapacity(0))));
    }

    #[test]
    fn test_builder_defaults() {
        let sink = BufferedSink::builder().build(Discard).unwrap();
        assert_eq!(sink.capacity(), DEFAULT_CAPACITY);
        assert_eq!(sink.dropped(), 0);
        sink.close();
    }
}
