//! Settings struct with TOML-based sections.
//!
//! Each section maps to a TOML table and carries serde defaults so a
//! partial config file loads cleanly.

use serde::{Deserialize, Serialize};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Transcript validation settings.
    #[serde(default)]
    pub transcript: TranscriptSettings,

    /// Synthesis and duration-fitting settings.
    #[serde(default)]
    pub synthesis: SynthesisSettings,

    /// Retry policy for storage and collaborator calls.
    #[serde(default)]
    pub retry: RetrySettings,
}

/// Path configuration for workspaces and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Root folder for per-task workspaces.
    #[serde(default = "default_work_root")]
    pub work_root: String,

    /// Folder for per-task log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_work_root() -> String {
    ".work".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            work_root: default_work_root(),
            logs_folder: default_logs_folder(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default tracing filter when RUST_LOG is unset.
    #[serde(default = "default_level")]
    pub level: String,

    /// Write a dedicated log file per task.
    #[serde(default = "default_true")]
    pub per_task_files: bool,

    /// Use compact per-task logs (filter progress lines).
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Number of tail lines kept for error diagnosis.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Progress update step percentage.
    #[serde(default = "default_progress_step")]
    pub progress_step: u32,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_error_tail() -> u32 {
    20
}

fn default_progress_step() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            per_task_files: true,
            compact: true,
            error_tail: default_error_tail(),
            progress_step: default_progress_step(),
        }
    }
}

/// Transcript validation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSettings {
    /// First expected sequence number.
    #[serde(default = "default_sequence_base")]
    pub sequence_base: u32,
}

fn default_sequence_base() -> u32 {
    1
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            sequence_base: default_sequence_base(),
        }
    }
}

/// Synthesis and duration-fitting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisSettings {
    /// Budget stretch factor over the original cue window.
    ///
    /// Dubbed speech commonly runs longer than the source, so a segment is
    /// accepted up to `tolerance x` its original duration.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Synthesis attempts per segment before accepting overflow.
    #[serde(default = "default_max_fit_attempts")]
    pub max_fit_attempts: u32,

    /// Concurrent synthesis calls.
    ///
    /// Matches the engine's accelerator count; 1 for a single shared
    /// accelerator.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Output sample rate of the synthesis engine.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

fn default_tolerance() -> f64 {
    1.2
}

fn default_max_fit_attempts() -> u32 {
    2
}

fn default_concurrency() -> usize {
    1
}

fn default_sample_rate() -> u32 {
    24_000
}

impl Default for SynthesisSettings {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_fit_attempts: default_max_fit_attempts(),
            concurrency: default_concurrency(),
            sample_rate: default_sample_rate(),
        }
    }
}

/// Retry policy for storage and collaborator calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Total attempts, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Delay multiplier between attempts.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    1_000
}

fn default_multiplier() -> f64 {
    2.0
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            multiplier: default_multiplier(),
        }
    }
}

/// Named configuration sections, for section-level updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Paths,
    Logging,
    Transcript,
    Synthesis,
    Retry,
}

impl ConfigSection {
    /// The TOML table key for this section.
    pub fn key(self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Logging => "logging",
            ConfigSection::Transcript => "transcript",
            ConfigSection::Synthesis => "synthesis",
            ConfigSection::Retry => "retry",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let settings = Settings::default();
        assert_eq!(settings.transcript.sequence_base, 1);
        assert!(settings.synthesis.tolerance > 1.0);
        assert_eq!(settings.synthesis.concurrency, 1);
        assert_eq!(settings.retry.max_attempts, 3);
    }

    #[test]
    fn partial_toml_fills_missing_fields() {
        let settings: Settings = toml::from_str(
            r#"
            [synthesis]
            concurrency = 4
            "#,
        )
        .unwrap();

        assert_eq!(settings.synthesis.concurrency, 4);
        assert_eq!(settings.synthesis.max_fit_attempts, 2);
        assert_eq!(settings.paths.work_root, ".work");
    }

    #[test]
    fn settings_round_trip_through_toml() {
        let settings = Settings::default();
        let text = toml::to_string(&settings).unwrap();
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back.synthesis.sample_rate, settings.synthesis.sample_rate);
        assert_eq!(back.paths.work_root, settings.paths.work_root);
    }
}
