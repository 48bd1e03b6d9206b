//! Logging types and configuration.

use crate::config::LoggingSettings;

/// Log level for filtering per-task messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Debug information.
    Debug,
    /// General information.
    #[default]
    Info,
    /// Warnings.
    Warn,
    /// Errors.
    Error,
}

impl LogLevel {
    /// Prefix written into the task log file.
    pub fn prefix(self) -> &'static str {
        match self {
            LogLevel::Debug => "[DEBUG]",
            LogLevel::Info => "",
            LogLevel::Warn => "[WARNING]",
            LogLevel::Error => "[ERROR]",
        }
    }
}

/// Configuration for per-task logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum level written to the file.
    pub level: LogLevel,
    /// Compact mode: drop repeated progress lines.
    pub compact: bool,
    /// Progress step percentage in compact mode.
    pub progress_step: u32,
    /// Number of recent lines kept for error diagnosis.
    pub error_tail: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            compact: true,
            progress_step: 20,
            error_tail: 20,
        }
    }
}

impl From<&LoggingSettings> for LogConfig {
    fn from(settings: &LoggingSettings) -> Self {
        let level = match settings.level.as_str() {
            "debug" | "trace" => LogLevel::Debug,
            "warn" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        };
        Self {
            level,
            compact: settings.compact,
            progress_step: settings.progress_step.max(1),
            error_tail: settings.error_tail as usize,
        }
    }
}

/// Callback receiving each formatted log line, e.g. for API streaming.
pub type LogSink = Box<dyn Fn(&str) + Send + Sync>;
