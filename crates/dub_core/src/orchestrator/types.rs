//! Context and state threaded through a task's pipeline run.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Settings;
use crate::logging::TaskLogger;
use crate::models::{MediaPaths, MixedMedia, Segment, SpeakerSample, TaskStatus, TimedSegment};
use crate::timing::{DriftSummary, FittedSegment};
use crate::workspace::Workspace;

/// Progress callback type: (step_name, percent_complete, message).
pub type ProgressCallback = Box<dyn Fn(&str, u32, &str) + Send + Sync>;

/// Read-only context for one task run.
///
/// Holds configuration and shared resources steps can read but not
/// modify. Mutable pipeline data goes in [`TaskState`]. Dropping the
/// context releases the workspace, on every exit path.
pub struct TaskContext {
    /// Task identifier.
    pub task_id: String,
    /// Service settings snapshot for this run.
    pub settings: Settings,
    /// Ephemeral storage scope, released when the run ends.
    pub workspace: Workspace,
    /// Per-task logger.
    pub logger: Arc<TaskLogger>,
    /// Optional progress callback.
    progress_callback: Option<ProgressCallback>,
}

impl TaskContext {
    /// Create a new context for a task run.
    pub fn new(
        task_id: impl Into<String>,
        settings: Settings,
        workspace: Workspace,
        logger: Arc<TaskLogger>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            settings,
            workspace,
            logger,
            progress_callback: None,
        }
    }

    /// Set the progress callback.
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Report progress to the callback (if set) and the task log.
    pub fn report_progress(&self, step_name: &str, percent: u32, message: &str) {
        self.logger.progress(percent);
        if let Some(ref callback) = self.progress_callback {
            callback(step_name, percent, message);
        }
    }
}

/// Mutable state accumulated across pipeline steps.
///
/// Each stage writes its output into its own field; later stages read what
/// earlier ones produced. Nothing here is shared between tasks.
#[derive(Default)]
pub struct TaskState {
    /// In-memory mirror of the persisted status, set by the executor.
    pub status: TaskStatus,
    /// Failure description, present iff `status` is `error`.
    pub error_detail: Option<String>,
    /// Transcript segments, ordered by sequence.
    pub segments: Vec<Segment>,
    /// Object-store references for the source media.
    pub media_paths: Option<MediaPaths>,
    /// Downloaded source audio (vocals), fed to the segmenter.
    pub source_audio: Option<Vec<u8>>,
    /// Downloaded source video inside the workspace, fed to the mixer.
    pub source_video_path: Option<PathBuf>,
    /// Speaker reference clips, aligned by index with `segments`.
    pub speaker_samples: Vec<SpeakerSample>,
    /// Synthesis output per segment, ordered by sequence.
    pub fitted: Vec<FittedSegment>,
    /// Final timeline placements, ordered by sequence.
    pub timed: Vec<TimedSegment>,
    /// Drift observability from the repair sweep.
    pub drift: Option<DriftSummary>,
    /// Mixed media from the mixing collaborator.
    pub mixed: Option<MixedMedia>,
    /// Locator of the packaged output.
    pub output_locator: Option<String>,
}

impl TaskState {
    /// Create empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the transcript has been fetched.
    pub fn has_segments(&self) -> bool {
        !self.segments.is_empty()
    }

    /// Number of segments flagged as overflow so far.
    pub fn overflow_count(&self) -> usize {
        self.fitted.iter().filter(|f| f.overflow).count()
    }
}
