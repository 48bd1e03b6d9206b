//! Error types for the pipeline and its steps.
//!
//! Step failures bubble unchanged to the pipeline executor; the executor
//! is the single place a failure is mapped to the persisted `error`
//! status. No stage swallows a fatal error.

use std::io;

use thiserror::Error;

use crate::models::TaskStatus;
use crate::services::ServiceError;
use crate::timing::RepairError;

/// Failure of a single pipeline step.
#[derive(Error, Debug)]
pub enum StepError {
    /// Transcript or media could not be fetched or was malformed.
    #[error("failed to fetch task data: {0}")]
    Fetch(String),

    /// The transcript contains no segments.
    #[error("transcript is empty: no segments to synthesize")]
    EmptyTranscript,

    /// Segment sequence numbers are not contiguous.
    #[error("transcript sequence is not contiguous: expected {expected}, found {found}")]
    SequenceGap { expected: u32, found: u32 },

    /// The synthesis engine failed beyond the local retry budget.
    #[error("speech synthesis failed: {0}")]
    SynthesisEngine(String),

    /// Timeline repair rejected its input; an ordering invariant was
    /// broken upstream.
    #[error("timeline repair rejected its input: {0}")]
    RepairInput(#[from] RepairError),

    /// Media mixing failed.
    #[error("media mixing failed: {0}")]
    Mix(String),

    /// Packaging failed.
    #[error("packaging failed: {0}")]
    Package(String),

    /// A storage call failed after bounded retries.
    #[error("{operation} failed: {source}")]
    Storage {
        operation: String,
        #[source]
        source: ServiceError,
    },

    /// A collaborator answered with unusable data.
    #[error("{service} produced unusable output: {message}")]
    CollaboratorOutput { service: String, message: String },

    /// File I/O inside the workspace failed.
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },

    /// A step ran before the context held what it needs.
    #[error("precondition not met: {0}")]
    Precondition(String),
}

impl StepError {
    /// Create a fetch error.
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch(message.into())
    }

    /// Create a synthesis-engine error.
    pub fn synthesis_engine(message: impl Into<String>) -> Self {
        Self::SynthesisEngine(message.into())
    }

    /// Create a mix error.
    pub fn mix(message: impl Into<String>) -> Self {
        Self::Mix(message.into())
    }

    /// Create a package error.
    pub fn package(message: impl Into<String>) -> Self {
        Self::Package(message.into())
    }

    /// Create a storage error with the failed operation named.
    pub fn storage(operation: impl Into<String>, source: ServiceError) -> Self {
        Self::Storage {
            operation: operation.into(),
            source,
        }
    }

    /// Create a collaborator-output error.
    pub fn collaborator_output(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CollaboratorOutput {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error with context.
    pub fn io_error(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create a precondition error.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }
}

/// Top-level pipeline error with task context.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A step failed during execution.
    #[error("task '{task_id}' failed at stage '{stage}': {source}")]
    StepFailed {
        task_id: String,
        stage: TaskStatus,
        #[source]
        source: StepError,
    },

    /// A status transition could not be persisted.
    #[error("task '{task_id}' could not persist status '{status}': {source}")]
    StatusPersist {
        task_id: String,
        status: TaskStatus,
        #[source]
        source: ServiceError,
    },

    /// Failed to set up the task run (workspace, logger).
    #[error("task '{task_id}' setup failed: {message}")]
    SetupFailed { task_id: String, message: String },
}

impl PipelineError {
    /// Create a step failed error.
    pub fn step_failed(task_id: impl Into<String>, stage: TaskStatus, source: StepError) -> Self {
        Self::StepFailed {
            task_id: task_id.into(),
            stage,
            source,
        }
    }

    /// Create a status-persist error.
    pub fn status_persist(
        task_id: impl Into<String>,
        status: TaskStatus,
        source: ServiceError,
    ) -> Self {
        Self::StatusPersist {
            task_id: task_id.into(),
            status,
            source,
        }
    }

    /// Create a setup failed error.
    pub fn setup_failed(task_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SetupFailed {
            task_id: task_id.into(),
            message: message.into(),
        }
    }

    /// One-line description persisted as the task's error detail.
    pub fn detail(&self) -> String {
        match self {
            PipelineError::StepFailed { source, .. } => source.to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type for step operations.
pub type StepResult<T> = Result<T, StepError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_error_displays_context() {
        let err = StepError::SequenceGap {
            expected: 3,
            found: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("expected 3"));
        assert!(msg.contains("found 5"));
    }

    #[test]
    fn pipeline_error_chains_context() {
        let step_err = StepError::fetch("no media paths for task");
        let pipeline_err = PipelineError::step_failed("task-9", TaskStatus::Fetching, step_err);

        let msg = pipeline_err.to_string();
        assert!(msg.contains("task-9"));
        assert!(msg.contains("fetching"));
    }

    #[test]
    fn detail_strips_the_task_prefix() {
        let err = PipelineError::step_failed(
            "task-9",
            TaskStatus::Mixing,
            StepError::mix("ffmpeg exited with 1"),
        );
        let detail = err.detail();
        assert!(detail.contains("ffmpeg exited with 1"));
        assert!(!detail.contains("task-9"));
    }

    #[test]
    fn repair_error_converts_into_step_error() {
        let err: StepError = crate::timing::RepairError::EmptyInput.into();
        assert!(matches!(err, StepError::RepairInput(_)));
    }
}
