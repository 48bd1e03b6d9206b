//! Pipeline runner that executes steps in sequence.

use std::sync::Arc;

use super::errors::{PipelineError, PipelineResult};
use super::step::PipelineStep;
use super::types::{TaskContext, TaskState};
use crate::models::TaskStatus;
use crate::services::TaskStore;

/// Pipeline that runs a sequence of steps for one task.
///
/// Steps execute in declared order. Before each step the step's stage is
/// persisted to the task store; on the first failure the executor persists
/// `error` with the failure's message and halts. Nothing from the failing
/// stage is committed, and later steps never run.
pub struct Pipeline {
    /// Steps to execute in order.
    steps: Vec<Box<dyn PipelineStep>>,
    /// Store receiving status transitions.
    task_store: Arc<dyn TaskStore>,
}

impl Pipeline {
    /// Create a new empty pipeline persisting transitions to `task_store`.
    pub fn new(task_store: Arc<dyn TaskStore>) -> Self {
        Self {
            steps: Vec::new(),
            task_store,
        }
    }

    /// Add a step to the pipeline.
    pub fn add_step<S: PipelineStep + 'static>(&mut self, step: S) -> &mut Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Add a step (builder pattern).
    pub fn with_step<S: PipelineStep + 'static>(mut self, step: S) -> Self {
        self.add_step(step);
        self
    }

    /// Get the number of steps in the pipeline.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Get step names in order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run the pipeline with the given context and state.
    ///
    /// On failure the `error` status (with a one-line detail) has already
    /// been persisted when this returns; the caller persists `completed`
    /// on success so the locator from the final step can ride along.
    pub async fn run(&self, ctx: &TaskContext, state: &mut TaskState) -> PipelineResult<()> {
        match self.run_steps(ctx, state).await {
            Ok(()) => Ok(()),
            Err(err) => {
                let detail = err.detail();
                state.status = TaskStatus::Error;
                state.error_detail = Some(detail.clone());
                if let Err(persist_err) = self
                    .task_store
                    .update_status(&ctx.task_id, TaskStatus::Error, Some(&detail), None)
                    .await
                {
                    ctx.logger.error(&format!(
                        "failed to persist error status: {}",
                        persist_err
                    ));
                }
                Err(err)
            }
        }
    }

    async fn run_steps(&self, ctx: &TaskContext, state: &mut TaskState) -> PipelineResult<()> {
        let total_steps = self.steps.len();

        for (i, step) in self.steps.iter().enumerate() {
            let stage = step.stage();
            ctx.logger.phase(step.name());

            let percent = ((i as f64 / total_steps as f64) * 100.0) as u32;
            ctx.report_progress(step.name(), percent, &format!("Starting {}", step.name()));

            state.status = stage;
            self.task_store
                .update_status(&ctx.task_id, stage, None, None)
                .await
                .map_err(|e| PipelineError::status_persist(&ctx.task_id, stage, e))?;

            step.execute(ctx, state).await.map_err(|e| {
                ctx.logger.error(&format!("{} failed: {}", step.name(), e));
                PipelineError::step_failed(&ctx.task_id, stage, e)
            })?;

            ctx.logger.success(&format!("{} completed", step.name()));
        }

        ctx.report_progress("Complete", 100, "Pipeline finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::errors::{StepError, StepResult};
    use crate::orchestrator::testing::{test_context, RecordingStore};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingStep {
        name: &'static str,
        stage: TaskStatus,
        execute_count: Arc<AtomicUsize>,
        fail: bool,
    }

    impl CountingStep {
        fn new(name: &'static str, stage: TaskStatus) -> (Self, Arc<AtomicUsize>) {
            let count = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    name,
                    stage,
                    execute_count: Arc::clone(&count),
                    fail: false,
                },
                count,
            )
        }

        fn failing(name: &'static str, stage: TaskStatus) -> Self {
            Self {
                name,
                stage,
                execute_count: Arc::new(AtomicUsize::new(0)),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl PipelineStep for CountingStep {
        fn name(&self) -> &str {
            self.name
        }

        fn stage(&self) -> TaskStatus {
            self.stage
        }

        async fn execute(&self, _ctx: &TaskContext, _state: &mut TaskState) -> StepResult<()> {
            self.execute_count.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(StepError::fetch("boom"))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn pipeline_builds_correctly() {
        let store = Arc::new(RecordingStore::default());
        let (step1, _) = CountingStep::new("Fetch", TaskStatus::Fetching);
        let (step2, _) = CountingStep::new("Mix", TaskStatus::Mixing);
        let pipeline = Pipeline::new(store).with_step(step1).with_step(step2);

        assert_eq!(pipeline.step_count(), 2);
        assert_eq!(pipeline.step_names(), vec!["Fetch", "Mix"]);
    }

    #[tokio::test]
    async fn persists_one_status_per_stage() {
        let store = Arc::new(RecordingStore::default());
        let (step1, count1) = CountingStep::new("Fetch", TaskStatus::Fetching);
        let (step2, count2) = CountingStep::new("Mix", TaskStatus::Mixing);
        let pipeline = Pipeline::new(store.clone()).with_step(step1).with_step(step2);

        let ctx = test_context("t1");
        let mut state = TaskState::new();
        pipeline.run(&ctx, &mut state).await.unwrap();

        assert_eq!(count1.load(Ordering::SeqCst), 1);
        assert_eq!(count2.load(Ordering::SeqCst), 1);
        assert_eq!(
            store.status_history(),
            vec![TaskStatus::Fetching, TaskStatus::Mixing]
        );
    }

    #[tokio::test]
    async fn failure_halts_and_persists_error() {
        let store = Arc::new(RecordingStore::default());
        let failing = CountingStep::failing("Fetch", TaskStatus::Fetching);
        let (never_runs, never_count) = CountingStep::new("Mix", TaskStatus::Mixing);
        let pipeline = Pipeline::new(store.clone())
            .with_step(failing)
            .with_step(never_runs);

        let ctx = test_context("t1");
        let mut state = TaskState::new();
        let err = pipeline.run(&ctx, &mut state).await.unwrap_err();

        assert!(matches!(err, PipelineError::StepFailed { .. }));
        assert_eq!(never_count.load(Ordering::SeqCst), 0);
        assert_eq!(
            store.status_history(),
            vec![TaskStatus::Fetching, TaskStatus::Error]
        );
        let detail = store.last_detail().unwrap();
        assert!(detail.contains("boom"));
        assert_eq!(state.status, TaskStatus::Error);
        assert!(state.error_detail.is_some());
    }
}
