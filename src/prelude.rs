//! Convenience re-exports for typical use.
//!
//! ```ignore
//! use weir::prelude::*;
//! ```

pub use crate::{
    BufferedSink, BufferedSinkBuilder, Error, Inspector, Monitor, OverflowPolicy, Result, Sink,
    SinkError,
};
