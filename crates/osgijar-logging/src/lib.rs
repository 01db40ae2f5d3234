//! osgijar-logging - Tracing to host build log bridge
//!
//! This crate provides:
//! - [`HostLoggingLayer`] tracing layer that forwards events to the host
//! - [`LogSink`] type for the host's log function
//! - Dynamic log level filtering through [`LogForwarder`]

mod callback;
mod layer;

pub use callback::{LogForwarder, LogSink};
pub use layer::{HostLoggingLayer, init_logging};
pub use osgijar_core::LogLevel;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{HostLoggingLayer, LogForwarder, LogLevel, LogSink, init_logging};
}
