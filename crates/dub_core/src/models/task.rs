//! Task-level records exchanged with the caller and the task store.

use serde::{Deserialize, Serialize};

use super::TaskStatus;

/// Outcome of a start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartOutcome {
    /// The pipeline was launched for this task.
    Accepted,
    /// A pipeline for this task id is already executing.
    AlreadyRunning,
}

/// The persisted mirror of a task, as read back from the task store.
///
/// This record outlives the in-memory task context; `status()` readers see
/// it at any time, including after the run finished and the workspace was
/// released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Task identifier.
    pub task_id: String,
    /// Last persisted status.
    pub status: TaskStatus,
    /// One-line failure description, present iff `status` is `error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    /// Locator of the packaged output, present once `completed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_locator: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_outcome_serializes_snake_case() {
        let json = serde_json::to_string(&StartOutcome::AlreadyRunning).unwrap();
        assert_eq!(json, "\"already_running\"");
    }

    #[test]
    fn record_omits_absent_fields() {
        let record = TaskRecord {
            task_id: "t1".to_string(),
            status: TaskStatus::Fetching,
            error_detail: None,
            output_locator: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("error_detail"));
        assert!(!json.contains("output_locator"));
    }
}
