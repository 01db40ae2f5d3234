//! Tracing layer that forwards to the host build log

use crate::callback::LogForwarder;
use osgijar_core::LogLevel;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Tracing layer that forwards log events to a [`LogForwarder`]
///
/// Structured fields are appended to the message as `name=value`, so the
/// host sees e.g. `packaging pass finished archive=... errors=1`.
#[derive(Debug, Clone)]
pub struct HostLoggingLayer {
    forwarder: Arc<LogForwarder>,
}

impl HostLoggingLayer {
    pub fn new(forwarder: Arc<LogForwarder>) -> Self {
        Self { forwarder }
    }

    pub fn forwarder(&self) -> &Arc<LogForwarder> {
        &self.forwarder
    }

    fn convert_level(level: &Level) -> LogLevel {
        match *level {
            Level::TRACE => LogLevel::Trace,
            Level::DEBUG => LogLevel::Debug,
            Level::INFO => LogLevel::Info,
            Level::WARN => LogLevel::Warn,
            Level::ERROR => LogLevel::Error,
        }
    }
}

impl<S> Layer<S> for HostLoggingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Self::convert_level(metadata.level());
        if !self.forwarder.is_enabled(level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        self.forwarder
            .log(level, metadata.target(), &visitor.finish());
    }

    fn enabled(&self, metadata: &tracing::Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        self.forwarder
            .is_enabled(Self::convert_level(metadata.level()))
    }
}

/// Renders an event as its message followed by its fields
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn push_field(&mut self, name: &str, value: std::fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        self.fields.push_str(&format!("{name}={value}"));
    }

    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_field(field.name(), format_args!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field.name(), format_args!("{value}"));
        }
    }
}

/// Install the host logging layer as the global subscriber
///
/// Call once when the host loads the packager. If a global subscriber is
/// already installed this does nothing.
pub fn init_logging(forwarder: Arc<LogForwarder>) {
    use tracing_subscriber::prelude::*;

    let subscriber = tracing_subscriber::registry().with(HostLoggingLayer::new(forwarder));

    let _ = tracing::subscriber::set_global_default(subscriber);
}
