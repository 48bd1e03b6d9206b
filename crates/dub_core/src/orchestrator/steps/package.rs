//! Package step - publishes the mixed media for streaming.

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::TaskStatus;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{TaskContext, TaskState};
use crate::services::Packager;

/// Package step producing the streamable output locator.
pub struct PackageStep {
    packager: Arc<dyn Packager>,
}

impl PackageStep {
    pub fn new(packager: Arc<dyn Packager>) -> Self {
        Self { packager }
    }
}

#[async_trait]
impl PipelineStep for PackageStep {
    fn name(&self) -> &str {
        "Package"
    }

    fn stage(&self) -> TaskStatus {
        TaskStatus::Packaging
    }

    fn description(&self) -> &str {
        "Package mixed media for progressive playback"
    }

    async fn execute(&self, ctx: &TaskContext, state: &mut TaskState) -> StepResult<()> {
        let mixed = state
            .mixed
            .as_ref()
            .ok_or_else(|| StepError::precondition("no mixed media to package"))?;

        let locator = self
            .packager
            .package(mixed, &ctx.task_id)
            .await
            .map_err(|e| StepError::package(e.to_string()))?;

        if locator.is_empty() {
            return Err(StepError::package("packager returned an empty locator"));
        }

        ctx.logger
            .info(&format!("packaged output available at {}", locator));
        state.output_locator = Some(locator);
        Ok(())
    }
}
