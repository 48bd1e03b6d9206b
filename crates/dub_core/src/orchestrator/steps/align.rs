//! Align step - repairs the global timeline.
//!
//! Feeds the fitted segments through the repair sweep and records the
//! drift summary. Cannot fail on well-formed input; an error here means a
//! fetch or ordering invariant was broken upstream.

use async_trait::async_trait;

use crate::models::TaskStatus;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{TaskContext, TaskState};
use crate::timing::{repair_timeline, RepairError};

/// Align step placing all segments on the output timeline.
pub struct AlignStep;

impl AlignStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AlignStep {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PipelineStep for AlignStep {
    fn name(&self) -> &str {
        "Align"
    }

    fn stage(&self) -> TaskStatus {
        TaskStatus::Aligning
    }

    fn description(&self) -> &str {
        "Repair the timeline into a non-overlapping schedule"
    }

    async fn execute(&self, ctx: &TaskContext, state: &mut TaskState) -> StepResult<()> {
        let fitted = std::mem::take(&mut state.fitted);

        let (timed, summary) = repair_timeline(fitted).map_err(|e| match e {
            RepairError::EmptyInput => StepError::EmptyTranscript,
            other => StepError::from(other),
        })?;

        ctx.logger.info(&format!(
            "timeline repaired: {} segments, {} drifted, max drift {}ms, ends at {}ms",
            timed.len(),
            summary.drifted_segments,
            summary.max_drift_ms,
            summary.timeline_end_ms
        ));

        state.timed = timed;
        state.drift = Some(summary);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Segment, SynthesisResult};
    use crate::orchestrator::testing::test_context;
    use crate::timing::FittedSegment;

    fn fitted(sequence: u32, start_ms: u64, duration_ms: u64) -> FittedSegment {
        FittedSegment {
            segment: Segment {
                sequence,
                start_ms,
                end_ms: start_ms + 1000,
                speaker: "s".to_string(),
                original_text: String::new(),
                translated_text: String::new(),
            },
            result: SynthesisResult {
                samples: Vec::new(),
                duration_ms,
                attempt_count: 1,
            },
            overflow: false,
        }
    }

    #[tokio::test]
    async fn places_segments_and_records_drift() {
        let step = AlignStep::new();
        let ctx = test_context("t1");
        let mut state = TaskState::new();
        state.fitted = vec![fitted(1, 0, 1500), fitted(2, 1000, 800)];

        step.execute(&ctx, &mut state).await.unwrap();

        assert_eq!(state.timed.len(), 2);
        assert_eq!(state.timed[1].final_start_ms, 1500);
        assert_eq!(state.drift.as_ref().unwrap().max_drift_ms, 500);
    }

    #[tokio::test]
    async fn empty_input_surfaces_as_empty_transcript() {
        let step = AlignStep::new();
        let ctx = test_context("t1");
        let mut state = TaskState::new();

        let err = step.execute(&ctx, &mut state).await.unwrap_err();
        assert!(matches!(err, StepError::EmptyTranscript));
    }

    #[tokio::test]
    async fn out_of_order_cues_are_a_repair_input_error() {
        let step = AlignStep::new();
        let ctx = test_context("t1");
        let mut state = TaskState::new();
        state.fitted = vec![fitted(1, 2000, 500), fitted(2, 1000, 500)];

        let err = step.execute(&ctx, &mut state).await.unwrap_err();
        assert!(matches!(err, StepError::RepairInput(_)));
    }
}
