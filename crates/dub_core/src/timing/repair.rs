//! Global timeline repair.
//!
//! Takes the fitted segments in sequence order and places them on the
//! output timeline without overlaps. A segment never starts earlier than
//! its original cue and never before the previous segment ends; when
//! synthesized audio overran its window, the following segments are pushed
//! forward. Drift accumulates rather than being clawed back by compressing
//! audio, which would alter pitch and intelligibility. The sweep is a
//! single O(n) pass and is deterministic: the same input always produces
//! the same placement.

use thiserror::Error;

use crate::models::TimedSegment;

use super::fitter::FittedSegment;

/// Errors from the repair sweep.
///
/// Given well-formed input the sweep cannot fail; both variants indicate
/// an invariant broken upstream of this pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepairError {
    /// No segments to place on the timeline.
    #[error("no segments to place on the timeline")]
    EmptyInput,

    /// Original cues were not in non-decreasing start order.
    #[error(
        "segment {sequence} starts at {start_ms}ms, before segment {prev_sequence} at {prev_start_ms}ms"
    )]
    NonMonotonicStart {
        sequence: u32,
        start_ms: u64,
        prev_sequence: u32,
        prev_start_ms: u64,
    },
}

/// Per-run drift observability, logged after the sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriftSummary {
    /// Number of segments placed later than their original cue.
    pub drifted_segments: usize,
    /// Largest drift observed.
    pub max_drift_ms: u64,
    /// Sequence of the segment with the largest drift.
    pub max_drift_sequence: Option<u32>,
    /// End of the last placement.
    pub timeline_end_ms: u64,
}

impl DriftSummary {
    fn observe(&mut self, sequence: u32, drift_ms: u64) {
        if drift_ms > 0 {
            self.drifted_segments += 1;
        }
        if drift_ms > self.max_drift_ms {
            self.max_drift_ms = drift_ms;
            self.max_drift_sequence = Some(sequence);
        }
    }
}

/// Place fitted segments on the output timeline.
///
/// Input must be ordered by sequence with non-decreasing original starts.
/// Every input segment appears in the output exactly once; zero-duration
/// segments are retained to keep sequence alignment with the video.
pub fn repair_timeline(
    fitted: Vec<FittedSegment>,
) -> Result<(Vec<TimedSegment>, DriftSummary), RepairError> {
    let first = fitted.first().ok_or(RepairError::EmptyInput)?;

    for pair in fitted.windows(2) {
        let (prev, next) = (&pair[0].segment, &pair[1].segment);
        if next.start_ms < prev.start_ms {
            return Err(RepairError::NonMonotonicStart {
                sequence: next.sequence,
                start_ms: next.start_ms,
                prev_sequence: prev.sequence,
                prev_start_ms: prev.start_ms,
            });
        }
    }

    let mut cursor_ms = first.segment.start_ms;
    let mut timed = Vec::with_capacity(fitted.len());
    let mut summary = DriftSummary::default();

    for item in fitted {
        let final_start_ms = item.segment.start_ms.max(cursor_ms);
        let final_end_ms = final_start_ms + item.result.duration_ms;
        let drift_ms = final_start_ms - item.segment.start_ms;

        summary.observe(item.segment.sequence, drift_ms);
        cursor_ms = final_end_ms;

        timed.push(TimedSegment {
            segment: item.segment,
            result: item.result,
            final_start_ms,
            final_end_ms,
            drift_ms,
            overflow: item.overflow,
        });
    }

    summary.timeline_end_ms = cursor_ms;
    Ok((timed, summary))
}
