//! Media references and intermediate audio artifacts.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Object-store references for a task's source media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPaths {
    /// Reference to the source audio track (vocals).
    pub audio_ref: String,
    /// Reference to the silent source video.
    pub video_ref: String,
}

/// Reference audio for one speaker, cut from the source track.
///
/// Fed to the synthesis engine for voice cloning. One sample per segment,
/// aligned by index with the fetched segment list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerSample {
    /// Mono reference samples.
    pub samples: Vec<f32>,
    /// Sample rate of the reference clip.
    pub sample_rate: u32,
}

/// Mixed audio/video produced by the mixing collaborator.
///
/// Lives inside the task workspace; gone when the workspace is released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixedMedia {
    /// Path to the mixed file inside the workspace.
    pub path: PathBuf,
    /// Total duration of the mixed media.
    pub duration_ms: u64,
}
