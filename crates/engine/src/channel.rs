//! Channel queue engine.
//!
//! A fixed-capacity FIFO channel with a dedicated worker thread that
//! suspends when the channel is empty and resumes when a record arrives.
//! Shutdown pushes a sentinel through the channel, so everything enqueued
//! before `close` is drained ahead of it and the worker exits exactly once
//! the backlog is flushed.
//!
//! # Design
//!
//! - Producers reach the channel directly; no lock is held while a blocked
//!   producer waits for space, so the worker can always drain past it.
//! - The worker owns the receiver. When the worker exits (sentinel or fatal
//!   fault), dropping the receiver disconnects the channel: later sends fail
//!   immediately and are treated as the benign post-shutdown no-op, and
//!   `close` never hangs on a worker that is already gone.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;

use weir_core::{Inspect, Inspector, OverflowPolicy, Result, Sink};

use crate::worker;
use crate::Engine;

/// One message on the channel: a record, or the shutdown sentinel that ends
/// the drain loop.
enum Slot<R> {
    Record(R),
    Shutdown,
}

/// Counters shared with [`Inspector`] handles.
struct ChannelShared<R> {
    capacity: usize,
    dropped: AtomicU64,
    /// Sender clone used only for queue-length introspection. Holding a
    /// sender here never keeps the worker alive: the worker exits on the
    /// sentinel, not on disconnect.
    probe: Sender<Slot<R>>,
}

impl<R: Send> Inspect for ChannelShared<R> {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn queued(&self) -> usize {
        self.probe.len()
    }

    fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<R> ChannelShared<R> {
    fn note_drop(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(
            target: "weir::channel",
            capacity = self.capacity,
            "buffer full; dropping record"
        );
    }
}

/// Bounded-channel queue engine.
///
/// FIFO within the channel: drain order matches the order in which enqueues
/// were observed to complete by the channel.
pub struct ChannelEngine<R> {
    tx: Sender<Slot<R>>,
    shared: Arc<ChannelShared<R>>,
    policy: OverflowPolicy,
    closing: AtomicBool,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl<R: Send + 'static> ChannelEngine<R> {
    /// Spawn the engine and its drain worker around a wrapped sink.
    ///
    /// Fails fast on a zero capacity; nothing is spawned in that case.
    pub fn spawn<S>(sink: S, capacity: usize, policy: OverflowPolicy) -> Result<Self>
    where
        S: Sink<R> + 'static,
    {
        if capacity == 0 {
            return Err(weir_core::Error::InvalidCapacity(capacity));
        }
        let (tx, rx) = bounded(capacity);
        let shared = Arc::new(ChannelShared {
            capacity,
            dropped: AtomicU64::new(0),
            probe: tx.clone(),
        });
        let handle = thread::Builder::new()
            .name("weir-drain".into())
            .spawn(move || worker::run(sink, move |sink| pump(&rx, sink)))?;
        Ok(Self {
            tx,
            shared,
            policy,
            closing: AtomicBool::new(false),
            handle: Mutex::new(Some(handle)),
        })
    }
}

impl<R: Send + 'static> Engine<R> for ChannelEngine<R> {
    fn enqueue(&self, record: R) {
        if self.closing.load(Ordering::Acquire) {
            return;
        }
        match self.policy {
            OverflowPolicy::Block => match self.tx.try_send(Slot::Record(record)) {
                Ok(()) => {}
                Err(TrySendError::Full(slot)) => {
                    // Suspend until space; a disconnect means the worker is
                    // gone and the record is silently discarded.
                    let _ = self.tx.send(slot);
                }
                Err(TrySendError::Disconnected(_)) => {}
            },
            OverflowPolicy::Drop => match self.tx.try_send(Slot::Record(record)) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => self.shared.note_drop(),
                Err(TrySendError::Disconnected(_)) => {}
            },
        }
    }

    fn inspector(&self) -> Inspector {
        Inspector::new(self.shared.clone())
    }

    fn close(&self) {
        if !self.closing.swap(true, Ordering::AcqRel) {
            // May block while the worker drains the backlog down; if the
            // worker already exited the channel is disconnected and this
            // returns at once.
            let _ = self.tx.send(Slot::Shutdown);
        }
        if let Some(handle) = self.handle.lock().take() {
            let _ = handle.join();
        }
    }
}

/// Drain loop: deliver records one at a time until the shutdown sentinel.
///
/// `recv` suspends cooperatively while the channel is empty; everything
/// enqueued ahead of the sentinel is FIFO-ordered before it and therefore
/// flushed before the loop ends.
fn pump<R, S>(rx: &Receiver<Slot<R>>, sink: &mut S)
where
    S: Sink<R>,
{
    for slot in rx.iter() {
        match slot {
            Slot::Record(record) => worker::deliver(sink, record),
            Slot::Shutdown => break,
        }
    }
}
