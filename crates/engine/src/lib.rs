//! Bounded queue engines for the weir buffering sink
//!
//! Two interchangeable implementations of the same contract:
//!
//! - [`ChannelEngine`]: a fixed-capacity FIFO channel drained by a
//!   cooperatively-suspending worker thread
//! - [`SwapEngine`]: an atomically-swapped immutable sequence drained in
//!   whole-batch swaps by a worker woken through a manual signal
//!
//! Both provide identical externally observable semantics: the enqueue
//! policies, drain ordering, no-loss shutdown, and introspection described
//! by the [`Engine`] contract. They differ only in the concurrency
//! primitives underneath.
//!
//! # Thread Safety
//!
//! An engine is shared between any number of producer threads (via
//! `enqueue`) and owns exactly one dedicated, non-pooled worker thread that
//! performs all draining and all calls into the wrapped sink. The worker is
//! joined during `close`.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod channel;
mod swap;
mod worker;

pub use channel::ChannelEngine;
pub use swap::SwapEngine;

use weir_core::Inspector;

/// The bounded queue contract both engines implement.
///
/// `enqueue` never errors and never panics toward the producer; the full
/// buffer behavior is governed by the engine's overflow policy. `close`
/// stops intake, drains the backlog present when it was called, joins the
/// worker, and is idempotent.
pub trait Engine<R>: Send + Sync {
    /// Enqueue one record, applying the configured overflow policy.
    ///
    /// A no-op once shutdown has begun; a successful enqueue is visible to
    /// the worker before this call returns.
    fn enqueue(&self, record: R);

    /// A cloneable handle over this engine's capacity / queued / dropped
    /// counters.
    fn inspector(&self) -> Inspector;

    /// Stop accepting records, drain the backlog, and join the worker.
    ///
    /// An unbounded wait by design; callers needing bounded shutdown must
    /// layer a timeout externally. Safe to call more than once.
    fn close(&self);
}
