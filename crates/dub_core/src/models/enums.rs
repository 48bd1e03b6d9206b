//! Core enums used throughout the crate.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a dubbing task.
///
/// Mirrors the status column in the relational task store. The pipeline
/// persists one transition per stage; `Completed` and `Error` are terminal
/// and outlive the in-memory task context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Task created, pipeline not started.
    #[default]
    Pending,
    /// Reading transcript and media from the stores.
    Fetching,
    /// Cutting speaker reference audio from the source track.
    Segmenting,
    /// Synthesizing speech per segment.
    Synthesizing,
    /// Repairing the timeline into a non-overlapping schedule.
    Aligning,
    /// Mixing dubbed audio with the source video.
    Mixing,
    /// Packaging the mixed media for streaming.
    Packaging,
    /// Terminal: output locator available.
    Completed,
    /// Terminal: error detail available.
    Error,
}

impl TaskStatus {
    /// Whether this status ends the task's lifecycle.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Error)
    }

    /// The lowercase string persisted to the task store.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Fetching => "fetching",
            TaskStatus::Segmenting => "segmenting",
            TaskStatus::Synthesizing => "synthesizing",
            TaskStatus::Aligning => "aligning",
            TaskStatus::Mixing => "mixing",
            TaskStatus::Packaging => "packaging",
            TaskStatus::Completed => "completed",
            TaskStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
