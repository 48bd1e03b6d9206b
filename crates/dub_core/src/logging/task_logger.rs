//! Per-task logger with file and callback output.
//!
//! Each task run gets its own logger that writes to a dedicated log file,
//! optionally forwards lines to a sink (for API streaming), and keeps a
//! tail buffer of recent lines for error diagnosis.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use parking_lot::Mutex;

use super::types::{LogConfig, LogLevel, LogSink};

/// Per-task logger with dual output (file + optional sink).
pub struct TaskLogger {
    /// Task identifier, included in every line.
    task_id: String,
    /// Path to the log file.
    log_path: PathBuf,
    /// Buffered file writer; `None` for a disabled (no-file) logger.
    file_writer: Mutex<Option<BufWriter<File>>>,
    /// Optional line sink.
    sink: Mutex<Option<LogSink>>,
    /// Logging configuration.
    config: LogConfig,
    /// Recent lines for error diagnosis.
    tail: Mutex<VecDeque<String>>,
    /// Last progress value logged (compact-mode filtering).
    last_progress: Mutex<u32>,
}

impl TaskLogger {
    /// Create a logger writing to `<log_dir>/task-<task_id>.log`.
    pub fn new(
        task_id: impl Into<String>,
        log_dir: impl AsRef<Path>,
        config: LogConfig,
        sink: Option<LogSink>,
    ) -> std::io::Result<Self> {
        let task_id = task_id.into();
        let log_dir = log_dir.as_ref();
        fs::create_dir_all(log_dir)?;

        let log_path = log_dir.join(format!("task-{}.log", sanitize_filename(&task_id)));
        let file = File::create(&log_path)?;

        Ok(Self {
            task_id,
            log_path,
            file_writer: Mutex::new(Some(BufWriter::new(file))),
            sink: Mutex::new(sink),
            config,
            tail: Mutex::new(VecDeque::with_capacity(64)),
            last_progress: Mutex::new(0),
        })
    }

    /// Create a logger that only keeps the tail buffer, writing no file.
    pub fn disabled(task_id: impl Into<String>, config: LogConfig) -> Self {
        Self {
            task_id: task_id.into(),
            log_path: PathBuf::new(),
            file_writer: Mutex::new(None),
            sink: Mutex::new(None),
            config,
            tail: Mutex::new(VecDeque::with_capacity(64)),
            last_progress: Mutex::new(0),
        }
    }

    /// The task this logger belongs to.
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Path of the log file (empty for a disabled logger).
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Log a debug message.
    pub fn debug(&self, message: &str) {
        self.write_line(LogLevel::Debug, message);
    }

    /// Log an informational message.
    pub fn info(&self, message: &str) {
        self.write_line(LogLevel::Info, message);
    }

    /// Log a warning.
    pub fn warn(&self, message: &str) {
        self.write_line(LogLevel::Warn, message);
    }

    /// Log an error.
    pub fn error(&self, message: &str) {
        self.write_line(LogLevel::Error, message);
    }

    /// Log a success marker.
    pub fn success(&self, message: &str) {
        self.write_raw(&format!("[SUCCESS] {}", message));
    }

    /// Log a phase marker for a pipeline stage.
    pub fn phase(&self, name: &str) {
        self.write_raw(&format!("=== {} ===", name));
    }

    /// Log a progress update.
    ///
    /// In compact mode only multiples of the configured step are written.
    pub fn progress(&self, percent: u32) {
        if self.config.compact {
            let mut last = self.last_progress.lock();
            let step = self.config.progress_step;
            if percent < 100 && percent < *last + step {
                return;
            }
            *last = percent;
        }
        self.write_raw(&format!("Progress: {}%", percent));
    }

    /// Recent log lines, oldest first.
    pub fn tail(&self) -> Vec<String> {
        self.tail.lock().iter().cloned().collect()
    }

    /// Flush buffered output to disk.
    pub fn flush(&self) {
        if let Some(writer) = self.file_writer.lock().as_mut() {
            let _ = writer.flush();
        }
    }

    fn write_line(&self, level: LogLevel, message: &str) {
        if level < self.config.level {
            return;
        }
        let prefix = level.prefix();
        if prefix.is_empty() {
            self.write_raw(message);
        } else {
            self.write_raw(&format!("{} {}", prefix, message));
        }
    }

    fn write_raw(&self, message: &str) {
        let line = format!(
            "{} [{}] {}",
            Local::now().format("%H:%M:%S%.3f"),
            self.task_id,
            message
        );

        {
            let mut tail = self.tail.lock();
            if tail.len() >= self.config.error_tail {
                tail.pop_front();
            }
            tail.push_back(line.clone());
        }

        if let Some(writer) = self.file_writer.lock().as_mut() {
            let _ = writeln!(writer, "{}", line);
        }

        if let Some(sink) = self.sink.lock().as_ref() {
            sink(&line);
        }
    }
}

impl Drop for TaskLogger {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Strip characters that are unsafe in file names.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_lines_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let logger = TaskLogger::new("t1", dir.path(), LogConfig::default(), None).unwrap();

        logger.phase("Fetch");
        logger.info("reading transcript");
        logger.flush();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("=== Fetch ==="));
        assert!(content.contains("reading transcript"));
        assert!(content.contains("[t1]"));
    }

    #[test]
    fn tail_keeps_recent_lines_only() {
        let config = LogConfig {
            error_tail: 3,
            ..LogConfig::default()
        };
        let logger = TaskLogger::disabled("t1", config);

        for i in 0..5 {
            logger.info(&format!("line {}", i));
        }

        let tail = logger.tail();
        assert_eq!(tail.len(), 3);
        assert!(tail[0].contains("line 2"));
        assert!(tail[2].contains("line 4"));
    }

    #[test]
    fn compact_mode_filters_progress() {
        let config = LogConfig {
            compact: true,
            progress_step: 20,
            ..LogConfig::default()
        };
        let logger = TaskLogger::disabled("t1", config);

        logger.progress(5);
        logger.progress(10);
        logger.progress(25);
        logger.progress(100);

        let progress_lines = logger
            .tail()
            .into_iter()
            .filter(|l| l.contains("Progress"))
            .count();
        assert_eq!(progress_lines, 2);
    }

    #[test]
    fn debug_lines_respect_level() {
        let logger = TaskLogger::disabled("t1", LogConfig::default());
        logger.debug("hidden");
        logger.info("shown");

        let tail = logger.tail();
        assert_eq!(tail.len(), 1);
        assert!(tail[0].contains("shown"));
    }

    #[test]
    fn sink_receives_lines() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let dir = tempfile::tempdir().unwrap();
        let count = Arc::new(AtomicUsize::new(0));
        let sink_count = Arc::clone(&count);
        let sink: LogSink = Box::new(move |_| {
            sink_count.fetch_add(1, Ordering::SeqCst);
        });

        let logger = TaskLogger::new("t1", dir.path(), LogConfig::default(), Some(sink)).unwrap();
        logger.info("one");
        logger.warn("two");

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
