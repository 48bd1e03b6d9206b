//! Fetch step - reads the transcript and source media for a task.
//!
//! Validates the transcript before anything expensive runs: an empty or
//! non-contiguous segment list fails the task here, before any synthesis.
//! Storage calls retry transient failures with bounded backoff.

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{Segment, TaskStatus};
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{TaskContext, TaskState};
use crate::services::{ObjectStore, TaskStore};
use crate::util::retry::{retry_with_backoff, RetryConfig};

/// Fetch step for transcript and media retrieval.
pub struct FetchStep {
    store: Arc<dyn TaskStore>,
    objects: Arc<dyn ObjectStore>,
}

impl FetchStep {
    pub fn new(store: Arc<dyn TaskStore>, objects: Arc<dyn ObjectStore>) -> Self {
        Self { store, objects }
    }
}

#[async_trait]
impl PipelineStep for FetchStep {
    fn name(&self) -> &str {
        "Fetch"
    }

    fn stage(&self) -> TaskStatus {
        TaskStatus::Fetching
    }

    fn description(&self) -> &str {
        "Read transcript and download source media"
    }

    async fn execute(&self, ctx: &TaskContext, state: &mut TaskState) -> StepResult<()> {
        let retry = RetryConfig::from(&ctx.settings.retry);
        let task_id = ctx.task_id.as_str();

        let segments = retry_with_backoff("fetch segments", &retry, || {
            self.store.segments(task_id)
        })
        .await
        .map_err(|e| StepError::storage("fetch segments", e))?;

        if segments.is_empty() {
            return Err(StepError::EmptyTranscript);
        }
        validate_segments(&segments, ctx.settings.transcript.sequence_base)?;
        ctx.logger
            .info(&format!("fetched {} transcript segments", segments.len()));

        let media = retry_with_backoff("fetch media paths", &retry, || {
            self.store.media_paths(task_id)
        })
        .await
        .map_err(|e| StepError::storage("fetch media paths", e))?;

        let audio = retry_with_backoff("download source audio", &retry, || {
            self.objects.download(&media.audio_ref)
        })
        .await
        .map_err(|e| StepError::storage("download source audio", e))?;

        let video = retry_with_backoff("download source video", &retry, || {
            self.objects.download(&media.video_ref)
        })
        .await
        .map_err(|e| StepError::storage("download source video", e))?;

        let video_path = ctx
            .workspace
            .write_media("source_video", &video)
            .map_err(|e| StepError::io_error("write source video", e))?;

        ctx.logger.info(&format!(
            "downloaded source media: {} audio bytes, {} video bytes",
            audio.len(),
            video.len()
        ));

        state.segments = segments;
        state.media_paths = Some(media);
        state.source_audio = Some(audio);
        state.source_video_path = Some(video_path);
        Ok(())
    }
}

/// Check sequence contiguity and cue-window sanity.
fn validate_segments(segments: &[Segment], sequence_base: u32) -> StepResult<()> {
    let mut expected = sequence_base;
    for segment in segments {
        if segment.sequence != expected {
            return Err(StepError::SequenceGap {
                expected,
                found: segment.sequence,
            });
        }
        if segment.end_ms <= segment.start_ms {
            return Err(StepError::fetch(format!(
                "segment {} has an empty time window ({}ms..{}ms)",
                segment.sequence, segment.start_ms, segment.end_ms
            )));
        }
        expected += 1;
    }
    Ok(())
}
