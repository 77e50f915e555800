//! Configuration errors raised at construction time.
//!
//! A buffering sink either constructs fully or not at all; there is no
//! partially-built state. Once built, producers never observe errors from
//! `emit` — the only runtime signals are the dropped counter and tracing
//! diagnostics.

use thiserror::Error;

/// Errors raised while building a buffering sink.
#[derive(Debug, Error)]
pub enum Error {
    /// The buffer capacity must be a positive number of records.
    #[error("invalid capacity: {0} (must be > 0)")]
    InvalidCapacity(usize),

    /// The dedicated drain worker thread could not be spawned.
    #[error("failed to spawn drain worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}

/// Result type for weir operations.
///
/// The error type defaults to the construction [`Error`] but can be
/// overridden, so `Result<(), SinkError>` also reads naturally.
pub type Result<T, E = Error> = std::result::Result<T, E>;
