//! Synthesize step - runs the duration fitter across all segments.
//!
//! Segments are fitted independently under a semaphore sized to the
//! synthesis engine's concurrency ceiling (1 for a single shared
//! accelerator). Completions land out of order and are re-sorted by
//! sequence before the repair sweep. Overflow is contained per segment;
//! an engine failure is fatal for the task.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::models::TaskStatus;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{TaskContext, TaskState};
use crate::services::{ServiceError, SpeechSynthesizer, TextSimplifier};
use crate::timing::DurationFitter;

/// Synthesize step fitting every segment's audio to its budget.
pub struct SynthesizeStep {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    simplifier: Arc<dyn TextSimplifier>,
}

impl SynthesizeStep {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        simplifier: Arc<dyn TextSimplifier>,
    ) -> Self {
        Self {
            synthesizer,
            simplifier,
        }
    }
}

#[async_trait]
impl PipelineStep for SynthesizeStep {
    fn name(&self) -> &str {
        "Synthesize"
    }

    fn stage(&self) -> TaskStatus {
        TaskStatus::Synthesizing
    }

    fn description(&self) -> &str {
        "Synthesize speech per segment, fitted to each budget"
    }

    async fn execute(&self, ctx: &TaskContext, state: &mut TaskState) -> StepResult<()> {
        if state.segments.is_empty() {
            return Err(StepError::precondition("no segments fetched"));
        }
        if state.speaker_samples.len() != state.segments.len() {
            return Err(StepError::precondition(
                "speaker references missing or misaligned",
            ));
        }

        let fitter = Arc::new(DurationFitter::new(
            Arc::clone(&self.synthesizer),
            Arc::clone(&self.simplifier),
            &ctx.settings.synthesis,
        ));
        let permits = ctx.settings.synthesis.concurrency.max(1);
        let semaphore = Arc::new(Semaphore::new(permits));
        ctx.logger.info(&format!(
            "synthesizing {} segments ({} concurrent)",
            state.segments.len(),
            permits
        ));

        let mut tasks = JoinSet::new();
        for (segment, speaker) in state.segments.iter().zip(&state.speaker_samples) {
            let fitter = Arc::clone(&fitter);
            let semaphore = Arc::clone(&semaphore);
            let segment = segment.clone();
            let speaker = speaker.clone();

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.map_err(|_| {
                    ServiceError::unavailable("synthesis engine", "scheduler shut down")
                })?;
                fitter.fit(&segment, &speaker).await
            });
        }

        let mut fitted = Vec::with_capacity(state.segments.len());
        while let Some(joined) = tasks.join_next().await {
            let result = joined.map_err(|e| {
                StepError::synthesis_engine(format!("synthesis worker panicked: {}", e))
            })?;
            fitted.push(result.map_err(|e| StepError::synthesis_engine(e.to_string()))?);
        }

        // Completion order is arbitrary under the semaphore.
        fitted.sort_by_key(|f| f.segment.sequence);

        let overflow = fitted.iter().filter(|f| f.overflow).count();
        if overflow > 0 {
            ctx.logger.warn(&format!(
                "{} of {} segments exceed their budget after fitting",
                overflow,
                fitted.len()
            ));
        }

        state.fitted = fitted;
        Ok(())
    }
}
