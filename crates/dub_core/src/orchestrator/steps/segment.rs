//! Segment step - cuts speaker reference audio from the source track.
//!
//! The synthesis engine clones each segment's voice from a reference clip
//! of that speaker; this step asks the audio-segmenter collaborator for
//! one clip per segment, aligned by index with the transcript.

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::TaskStatus;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{TaskContext, TaskState};
use crate::services::AudioSegmenter;

/// Segment step producing per-segment speaker references.
pub struct SegmentStep {
    segmenter: Arc<dyn AudioSegmenter>,
}

impl SegmentStep {
    pub fn new(segmenter: Arc<dyn AudioSegmenter>) -> Self {
        Self { segmenter }
    }
}

#[async_trait]
impl PipelineStep for SegmentStep {
    fn name(&self) -> &str {
        "Segment"
    }

    fn stage(&self) -> TaskStatus {
        TaskStatus::Segmenting
    }

    fn description(&self) -> &str {
        "Cut speaker reference audio per segment"
    }

    async fn execute(&self, ctx: &TaskContext, state: &mut TaskState) -> StepResult<()> {
        let audio = state
            .source_audio
            .as_deref()
            .ok_or_else(|| StepError::precondition("no source audio fetched"))?;
        if state.segments.is_empty() {
            return Err(StepError::precondition("no segments fetched"));
        }

        let samples = self
            .segmenter
            .extract_references(audio, &state.segments)
            .await
            .map_err(|e| StepError::storage("segment reference audio", e))?;

        if samples.len() != state.segments.len() {
            return Err(StepError::collaborator_output(
                "audio segmenter",
                format!(
                    "{} reference clips for {} segments",
                    samples.len(),
                    state.segments.len()
                ),
            ));
        }

        ctx.logger
            .info(&format!("cut {} speaker reference clips", samples.len()));
        state.speaker_samples = samples;
        Ok(())
    }
}
