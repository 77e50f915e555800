//! The wrapped-sink contract.
//!
//! A [`Sink`] is the downstream consumer a buffering sink protects producers
//! from. It is only ever invoked from the single drain worker, so
//! implementations take `&mut self` and need no internal synchronization of
//! their own.

use std::error::Error;

/// Failure reported by a wrapped sink for a single record.
///
/// Consume failures are caught by the drain worker, reported through
/// `tracing`, and never propagated to producers; the failing record is
/// considered lost (not retried, not requeued).
pub type SinkError = Box<dyn Error + Send + Sync + 'static>;

/// A downstream consumer of records.
///
/// # Thread Safety
///
/// All calls are made from the buffering sink's dedicated worker thread:
/// `consume` one record at a time during normal operation, then `shutdown`
/// exactly once after the worker's loop has exited. The wrapped sink is
/// therefore effectively single-threaded.
pub trait Sink<R>: Send {
    /// Consume one record.
    ///
    /// An `Err` is recovered locally by the worker: it is reported and the
    /// loop continues with the next record. A panic is treated as a fatal
    /// worker fault and permanently stops draining.
    fn consume(&mut self, record: R) -> std::result::Result<(), SinkError>;

    /// Release resources held by the sink.
    ///
    /// Runs on the worker thread after the drain loop has exited, before the
    /// shutdown call on the buffering sink returns. The default is a no-op.
    fn shutdown(&mut self) {}
}

impl<R, F> Sink<R> for F
where
    F: FnMut(R) -> std::result::Result<(), SinkError> + Send,
{
    fn consume(&mut self, record: R) -> std::result::Result<(), SinkError> {
        self(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_a_sink() {
        let mut seen = Vec::new();
        let mut sink = |record: u32| -> Result<(), SinkError> {
            seen.push(record);
            Ok(())
        };
        Sink::consume(&mut sink, 7).unwrap();
        assert_eq!(seen, vec![7]);
    }
}
