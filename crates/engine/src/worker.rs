//! Shared drain-worker plumbing: per-record failure isolation and the
//! fatal-fault boundary both engines run their loops inside.

use std::panic::{self, AssertUnwindSafe};

use weir_core::Sink;

/// Run an engine's drain loop to completion on the worker thread.
///
/// The loop body runs inside a `catch_unwind` boundary: a panic escaping the
/// per-record isolation in [`deliver`] is reported as fatal and the worker
/// exits permanently, leaving the sink inert. The wrapped sink's shutdown
/// hook runs after the loop either way, still on the worker thread.
pub(crate) fn run<R, S>(mut sink: S, pump: impl FnOnce(&mut S))
where
    S: Sink<R>,
{
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| pump(&mut sink))) {
        tracing::error!(
            target: "weir::worker",
            fault = panic_message(&payload),
            "fatal fault in drain worker; the buffering sink is now inert"
        );
    }
    sink.shutdown();
}

/// Hand one record to the wrapped sink, recovering locally from failure.
///
/// A consume `Err` is reported and swallowed; the record is lost and the
/// drain loop continues. Panics are deliberately not caught here — they are
/// the fatal path handled in [`run`].
pub(crate) fn deliver<R, S>(sink: &mut S, record: R)
where
    S: Sink<R>,
{
    if let Err(error) = sink.consume(record) {
        tracing::warn!(
            target: "weir::worker",
            %error,
            "wrapped sink failed to consume record; record lost"
        );
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "<non-string panic payload>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weir_core::SinkError;

    struct FlakySink {
        delivered: Vec<u32>,
        shutdown_calls: u32,
    }

    impl Sink<u32> for &mut FlakySink {
        fn consume(&mut self, record: u32) -> Result<(), SinkError> {
            if record % 2 == 1 {
                return Err("odd records are rejected".into());
            }
            self.delivered.push(record);
            Ok(())
        }

        fn shutdown(&mut self) {
            self.shutdown_calls += 1;
        }
    }

    #[test]
    fn test_consume_failure_does_not_stop_the_loop() {
        let mut sink = FlakySink {
            delivered: Vec::new(),
            shutdown_calls: 0,
        };
        run(&mut sink, |sink| {
            for record in [0, 1, 2, 3, 4] {
                deliver(sink, record);
            }
        });
        assert_eq!(sink.delivered, vec![0, 2, 4]);
        assert_eq!(sink.shutdown_calls, 1);
    }

    #[test]
    fn test_panic_is_contained_and_shutdown_still_runs() {
        let mut sink = FlakySink {
            delivered: Vec::new(),
            shutdown_calls: 0,
        };
        run(&mut sink, |sink| {
            deliver(sink, 0);
            panic!("wait primitive failed");
        });
        assert_eq!(sink.delivered, vec![0]);
        assert_eq!(sink.shutdown_calls, 1);
    }
}
