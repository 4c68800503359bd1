/*!
 * Command Tracing
 * Structured tracing for simulator commands using the tracing crate
 *
 * Every command runs inside a span carrying a unique trace ID; slow
 * commands are reported at WARN level when the span closes.
 */

use crate::core::config::HeapConfig;
use crate::core::limits::SLOW_COMMAND_MS;
use std::time::Instant;
use tracing::{debug, span, warn, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use uuid::Uuid;

/// Initialize structured tracing
///
/// `RUST_LOG` wins over the configured filter. Output goes to stderr so
/// command results on stdout stay clean. Calling this twice is a no-op.
pub fn init_tracing(config: &HeapConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if config.trace_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .compact(),
            )
            .try_init()
    };

    if installed.is_ok() {
        debug!(json = config.trace_json, filter = %config.log_filter, "Tracing initialized");
    }
}

/// Generate a unique trace ID for command correlation
pub fn generate_trace_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span covering one simulator command
pub struct CommandSpan {
    span: Span,
    start: Instant,
    command: String,
    trace_id: String,
}

impl CommandSpan {
    pub fn new(command: &str) -> Self {
        let trace_id = generate_trace_id();

        let span = span!(
            Level::DEBUG,
            "command",
            trace_id = %trace_id,
            command = command,
            duration_us = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
            result = tracing::field::Empty,
            error = tracing::field::Empty,
        );

        span.in_scope(|| debug!(command, "command started"));

        Self {
            span,
            start: Instant::now(),
            command: command.to_string(),
            trace_id,
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn record_result(&self, success: bool) {
        self.span
            .record("result", if success { "success" } else { "error" });
    }

    pub fn record_error(&self, error: &str) {
        self.span.record("error", error);
        self.span.record("result", "error");
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for CommandSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let _entered = self.span.enter();

        if duration.as_millis() > SLOW_COMMAND_MS {
            self.span.record("duration_ms", duration.as_millis());
            warn!(
                trace_id = %self.trace_id,
                command = %self.command,
                duration_ms = duration.as_millis(),
                slow = true,
                "slow command detected"
            );
        } else {
            self.span.record("duration_us", duration.as_micros());
            debug!(
                trace_id = %self.trace_id,
                command = %self.command,
                duration_us = duration.as_micros(),
                "command completed"
            );
        }
    }
}

#[inline]
pub fn span_command(name: &str) -> CommandSpan {
    CommandSpan::new(name)
}
