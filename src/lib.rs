//! # Weir
//!
//! A bounded, asynchronous buffering sink: producers hand records to an
//! in-memory buffer and a single dedicated worker thread drains them into a
//! downstream [`Sink`] whose latency or failures must never block or crash
//! the producer.
//!
//! ## Quick Start
//!
//! ```ignore
//! use weir::prelude::*;
//!
//! struct Stdout;
//!
//! impl Sink<String> for Stdout {
//!     fn consume(&mut self, record: String) -> Result<(), SinkError> {
//!         println!("{record}");
//!         Ok(())
//!     }
//! }
//!
//! let sink = BufferedSink::builder()
//!     .capacity(1024)
//!     .on_full(OverflowPolicy::Block)
//!     .build(Stdout)?;
//!
//! sink.emit("hello".to_string());
//! sink.close(); // drains everything already enqueued, then returns
//! ```
//!
//! ## Backpressure
//!
//! When the buffer is full, `emit` either suspends the producer until room
//! exists ([`OverflowPolicy::Block`]) or discards the record and counts it
//! ([`OverflowPolicy::Drop`], the default). Either way producers never see
//! an error; drops surface through [`BufferedSink::dropped`] and `tracing`
//! diagnostics.
//!
//! ## Engines
//!
//! Two interchangeable queue engines provide the same observable semantics:
//! a bounded-channel engine ([`BufferedSinkBuilder::build`]) and a lock-free
//! swap engine draining in whole-batch compare-and-swap snapshots
//! ([`BufferedSinkBuilder::build_swap`]). The swap engine guarantees order
//! only within a single producer's sequential emits.

#![warn(missing_docs)]

mod buffered;

pub mod prelude;

// Re-export main entry points
pub use buffered::{BufferedSink, BufferedSinkBuilder};

// Re-export contract types
pub use weir_core::{
    Error, Inspect, Inspector, Monitor, OverflowPolicy, Result, Sink, SinkError,
};

// Re-export the engines for callers that want to drive them directly
pub use weir_engine::{ChannelEngine, Engine, SwapEngine};
