//! Mix step - combines the dubbed timeline with the source video.

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::TaskStatus;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{TaskContext, TaskState};
use crate::services::MediaMixer;

/// Mix step handing the placed segments to the mixing collaborator.
pub struct MixStep {
    mixer: Arc<dyn MediaMixer>,
}

impl MixStep {
    pub fn new(mixer: Arc<dyn MediaMixer>) -> Self {
        Self { mixer }
    }
}

#[async_trait]
impl PipelineStep for MixStep {
    fn name(&self) -> &str {
        "Mix"
    }

    fn stage(&self) -> TaskStatus {
        TaskStatus::Mixing
    }

    fn description(&self) -> &str {
        "Mix dubbed audio with the source video"
    }

    async fn execute(&self, ctx: &TaskContext, state: &mut TaskState) -> StepResult<()> {
        let video_path = state
            .source_video_path
            .as_deref()
            .ok_or_else(|| StepError::precondition("no source video downloaded"))?;
        if state.timed.is_empty() {
            return Err(StepError::precondition("no placed segments to mix"));
        }

        let mixed = self
            .mixer
            .mix(video_path, &state.timed, ctx.workspace.mix_dir())
            .await
            .map_err(|e| StepError::mix(e.to_string()))?;

        ctx.logger.info(&format!(
            "mixed media written to {} ({}ms)",
            mixed.path.display(),
            mixed.duration_ms
        ));
        state.mixed = Some(mixed);
        Ok(())
    }
}
