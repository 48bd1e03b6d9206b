//! Pipeline step trait definition.
//!
//! Each stage of a task run implements this trait. Steps communicate only
//! through the shared context and state, which makes every step testable
//! in isolation with a hand-built context.

use async_trait::async_trait;

use super::errors::StepResult;
use super::types::{TaskContext, TaskState};
use crate::models::TaskStatus;

/// One unit of pipeline work.
///
/// The executor persists `stage()` to the task store before calling
/// `execute`, so the persisted status always names the stage currently
/// running. A returned error halts the pipeline; later steps never run.
#[async_trait]
pub trait PipelineStep: Send + Sync {
    /// Step name, for logging and error context.
    fn name(&self) -> &str;

    /// The status persisted when this step starts.
    fn stage(&self) -> TaskStatus;

    /// Perform the step's work, reading and writing `state`.
    async fn execute(&self, ctx: &TaskContext, state: &mut TaskState) -> StepResult<()>;

    /// Human-readable description of what this step does.
    fn description(&self) -> &str {
        self.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockStep;

    #[async_trait]
    impl PipelineStep for MockStep {
        fn name(&self) -> &str {
            "Mock"
        }

        fn stage(&self) -> TaskStatus {
            TaskStatus::Fetching
        }

        async fn execute(&self, _ctx: &TaskContext, _state: &mut TaskState) -> StepResult<()> {
            Ok(())
        }
    }

    #[test]
    fn step_trait_object_works() {
        let step: Box<dyn PipelineStep> = Box::new(MockStep);
        assert_eq!(step.name(), "Mock");
        assert_eq!(step.stage(), TaskStatus::Fetching);
        assert_eq!(step.description(), "Mock");
    }
}
