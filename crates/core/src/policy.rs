//! Backpressure policy for a full buffer.

/// What `emit` does when the buffer has reached its capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Suspend the producer until room exists. Never drops, never errors.
    ///
    /// The channel engine waits on the channel; the swap engine busy-waits
    /// on the published length. Either way the producer's wait holds no lock
    /// that would prevent the worker from draining.
    Block,

    /// Discard the record, increment the dropped counter, and report the
    /// drop. The producer never blocks and never observes an error.
    #[default]
    Drop,
}

impl OverflowPolicy {
    /// Whether this policy suspends producers on a full buffer.
    pub fn blocks(&self) -> bool {
        matches!(self, OverflowPolicy::Block)
    }
}
