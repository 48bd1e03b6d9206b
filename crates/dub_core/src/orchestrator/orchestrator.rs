//! Task orchestrator owning the pipeline template and the run registry.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Settings;
use crate::logging::{LogConfig, TaskLogger};
use crate::models::{StartOutcome, TaskRecord, TaskStatus};
use crate::services::{ServiceResult, Services};
use crate::workspace::Workspace;

use super::errors::{PipelineError, PipelineResult};
use super::registry::TaskRegistry;
use super::types::{TaskContext, TaskState};
use super::create_dubbing_pipeline;

/// Entry point for the caller layer.
///
/// Owns one pipeline template, the collaborator bundle, and the in-memory
/// registry enforcing at most one concurrent run per task id. Task-level
/// concurrency across distinct ids is unbounded here; the synthesis
/// stage's semaphore is the real throttle.
///
/// On process restart any task left in a non-terminal status is abandoned;
/// there is no mid-pipeline resume. The caller must start the task again.
pub struct Orchestrator {
    settings: Settings,
    services: Services,
    registry: Arc<TaskRegistry>,
}

impl Orchestrator {
    /// Create an orchestrator over the given settings and collaborators.
    pub fn new(settings: Settings, services: Services) -> Self {
        Self {
            settings,
            services,
            registry: Arc::new(TaskRegistry::new()),
        }
    }

    /// Launch the pipeline for a task and return immediately.
    ///
    /// Returns `AlreadyRunning` without side effects if a run for this id
    /// is executing. Must be called within a tokio runtime; the run itself
    /// proceeds on a spawned task and persists its own terminal status.
    pub fn start(&self, task_id: &str) -> PipelineResult<StartOutcome> {
        let Some(guard) = self.registry.try_register(task_id) else {
            tracing::info!("task {} is already running, rejecting start", task_id);
            return Ok(StartOutcome::AlreadyRunning);
        };

        // Setup failures free the slot via the guard before returning.
        let ctx = self
            .build_context(task_id)
            .map_err(|e| PipelineError::setup_failed(task_id, e.to_string()))?;

        let pipeline = create_dubbing_pipeline(&self.services);
        let store = Arc::clone(&self.services.task_store);
        let task_id = task_id.to_string();

        tokio::spawn(async move {
            let _guard = guard;
            let mut state = TaskState::new();

            match pipeline.run(&ctx, &mut state).await {
                Ok(()) => {
                    state.status = TaskStatus::Completed;
                    let locator = state.output_locator.as_deref();
                    if let Err(err) = store
                        .update_status(&task_id, TaskStatus::Completed, None, locator)
                        .await
                    {
                        ctx.logger
                            .error(&format!("failed to persist completed status: {}", err));
                        tracing::error!(
                            "task {}: failed to persist completed status: {}",
                            task_id,
                            err
                        );
                    }
                    ctx.logger.success("task completed");
                }
                Err(err) => {
                    // The pipeline already persisted the error status.
                    ctx.logger.error(&format!("task failed: {}", err));
                    tracing::warn!("task {} failed: {}", task_id, err);
                }
            }
            // Dropping the context here releases the workspace.
        });

        Ok(StartOutcome::Accepted)
    }

    /// Read the persisted task record.
    ///
    /// A pure read against the task store, valid from any number of
    /// callers at any time, including after the run's in-memory state is
    /// gone.
    pub async fn status(&self, task_id: &str) -> ServiceResult<Option<TaskRecord>> {
        self.services.task_store.status(task_id).await
    }

    /// Whether a pipeline for this id is currently executing.
    pub fn is_running(&self, task_id: &str) -> bool {
        self.registry.is_running(task_id)
    }

    fn build_context(&self, task_id: &str) -> std::io::Result<TaskContext> {
        let workspace = Workspace::create(&PathBuf::from(&self.settings.paths.work_root), task_id)?;

        let log_config = LogConfig::from(&self.settings.logging);
        let logger = if self.settings.logging.per_task_files {
            TaskLogger::new(
                task_id,
                &self.settings.paths.logs_folder,
                log_config,
                None,
            )?
        } else {
            TaskLogger::disabled(task_id, log_config)
        };

        Ok(TaskContext::new(
            task_id,
            self.settings.clone(),
            workspace,
            Arc::new(logger),
        ))
    }
}
