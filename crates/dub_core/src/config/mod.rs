//! Configuration loading and persistence.
//!
//! Settings are TOML-backed, organized into sections that can be updated
//! independently. The manager writes atomically (temp file + rename) and
//! preserves unrelated sections when updating one.

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    ConfigSection, LoggingSettings, PathSettings, RetrySettings, Settings, SynthesisSettings,
    TranscriptSettings,
};
