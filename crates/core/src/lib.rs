//! Contract types for the weir buffering sink
//!
//! This crate defines the seams between the buffering core and its
//! collaborators:
//! - [`Sink`]: the wrapped downstream consumer the buffer protects
//!   producers from
//! - [`Monitor`] / [`Inspector`]: the optional external observer and the
//!   read-only introspection surface it polls
//! - [`OverflowPolicy`]: the backpressure behavior when the buffer is full
//! - [`Error`]: construction-time configuration errors
//!
//! No concurrency lives here; the engines in `weir-engine` implement the
//! behavior these contracts describe.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod monitor;
mod policy;
mod sink;

pub use error::{Error, Result};
pub use monitor::{Inspect, Inspector, Monitor};
pub use policy::OverflowPolicy;
pub use sink::{Sink, SinkError};
