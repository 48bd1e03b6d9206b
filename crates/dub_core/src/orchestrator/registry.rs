//! In-memory registry of running tasks.
//!
//! Enforces at most one concurrent pipeline run per task id. Registration
//! is an atomic check-and-insert under one lock; the returned guard frees
//! the slot when dropped, so a finished, failed, or panicked run always
//! releases its id.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

/// Registry of task ids with a pipeline currently executing.
///
/// This is the only process-wide mutable state in the core; everything
/// else lives in per-task contexts or the external task store.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    running: Mutex<HashSet<String>>,
}

impl TaskRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claim a task id.
    ///
    /// Returns `None` if a run for this id is already registered.
    pub fn try_register(self: &Arc<Self>, task_id: &str) -> Option<RegistrationGuard> {
        let mut running = self.running.lock();
        if !running.insert(task_id.to_string()) {
            return None;
        }
        Some(RegistrationGuard {
            registry: Arc::clone(self),
            task_id: task_id.to_string(),
        })
    }

    /// Whether a run is currently registered for this id.
    pub fn is_running(&self, task_id: &str) -> bool {
        self.running.lock().contains(task_id)
    }

    /// Number of currently registered runs.
    pub fn len(&self) -> usize {
        self.running.lock().len()
    }

    /// Whether no runs are registered.
    pub fn is_empty(&self) -> bool {
        self.running.lock().is_empty()
    }
}

/// Releases a claimed task id on drop.
#[derive(Debug)]
pub struct RegistrationGuard {
    registry: Arc<TaskRegistry>,
    task_id: String,
}

impl RegistrationGuard {
    /// The claimed task id.
    pub fn task_id(&self) -> &str {
        &self.task_id
    }
}

impl Drop for RegistrationGuard {
    fn drop(&mut self) {
        self.registry.running.lock().remove(&self.task_id);
    }
}
