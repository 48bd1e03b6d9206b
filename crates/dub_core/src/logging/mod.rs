//! Logging infrastructure.
//!
//! Two layers: a global `tracing` subscriber for service-wide events, and a
//! per-task file logger ([`TaskLogger`]) so each run leaves a standalone
//! log with phases, progress, and a tail buffer for error diagnosis.

mod task_logger;
mod types;

pub use task_logger::TaskLogger;
pub use types::{LogConfig, LogLevel, LogSink};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Respects RUST_LOG; falls back to the configured default level.
/// Call once at service startup.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();
}
