//! Host log sink management

use osgijar_core::LogLevel;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Host log function
///
/// Receives the level, the log target (module path) and the rendered
/// message. The host decides how to display them, e.g. as build-tool
/// warnings and errors.
pub type LogSink = Arc<dyn Fn(LogLevel, &str, &str) + Send + Sync>;

/// Forwards log records to the host sink above a minimum level
pub struct LogForwarder {
    sink: RwLock<Option<LogSink>>,
    level: AtomicU8,
}

impl LogForwarder {
    /// Create a forwarder with no sink and the `Info` level
    pub fn new() -> Self {
        Self {
            sink: RwLock::new(None),
            level: AtomicU8::new(LogLevel::Info as u8),
        }
    }

    /// Create a forwarder writing to `sink`
    pub fn with_sink(sink: LogSink) -> Self {
        let forwarder = Self::new();
        forwarder.set_sink(Some(sink));
        forwarder
    }

    /// Replace the sink, or detach it with `None`
    pub fn set_sink(&self, sink: Option<LogSink>) {
        *self.sink.write() = sink;
    }

    pub fn has_sink(&self) -> bool {
        self.sink.read().is_some()
    }

    /// Set the minimum level
    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::SeqCst);
    }

    /// Get the minimum level
    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::SeqCst))
    }

    /// Check if a log level is enabled
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::Off && level >= self.level()
    }

    /// Hand a record to the sink if one is set and the level is enabled
    pub fn log(&self, level: LogLevel, target: &str, message: &str) {
        if !self.is_enabled(level) {
            return;
        }

        // Clone out of the lock so a sink that logs again cannot deadlock.
        let sink = self.sink.read().clone();
        if let Some(sink) = sink {
            sink(level, target, message);
        }
    }
}

impl Default for LogForwarder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LogForwarder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogForwarder")
            .field("level", &self.level())
            .field("has_sink", &self.has_sink())
            .finish()
    }
}
