/*!
 * Structured Tracing
 * Subscriber setup and per-command spans using the tracing crate
 *
 * Features:
 * - Human-readable or JSON-formatted output
 * - `log` records from the scheduler forwarded into the same subscriber
 * - Command spans with duration recording and slow-command warnings
 */

use crate::core::limits::ENV_TRACE_JSON;
use std::time::{Duration, Instant};
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Commands slower than this are logged at warn level
const SLOW_COMMAND: Duration = Duration::from_millis(10);

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - KERNEL_TRACE_JSON: Enable JSON output (default: false)
///
/// Does nothing if a global subscriber is already installed.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    };

    if result.is_ok() {
        info!(json = use_json, "Structured tracing initialized");
    }
}

/// Span covering one host command and the scheduling step that follows it
pub struct CommandSpan {
    span: tracing::Span,
    start: Instant,
    command: String,
}

impl CommandSpan {
    pub fn new(command: &str, seq: u64) -> Self {
        let span = span!(
            Level::DEBUG,
            "command",
            seq = seq,
            command = command,
            duration_us = tracing::field::Empty,
            outcome = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            command: command.to_string(),
        }
    }

    /// Record the scheduling outcome of the tick
    pub fn record_outcome<V: std::fmt::Debug>(&self, outcome: V) {
        self.span.record("outcome", format!("{:?}", outcome).as_str());
    }

    /// Enter the span context
    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for CommandSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        self.span.record("duration_us", duration.as_micros() as u64);
        let _entered = self.span.enter();

        if duration > SLOW_COMMAND {
            warn!(
                command = %self.command,
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow command detected"
            );
        } else {
            debug!(
                command = %self.command,
                duration_us = duration.as_micros() as u64,
                "command completed"
            );
        }
    }
}

/// Helper to create a command span
#[inline]
pub fn span_command(command: &str, seq: u64) -> CommandSpan {
    CommandSpan::new(command, seq)
}
