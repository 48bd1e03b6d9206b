//! Transcript segments and their synthesized/placed counterparts.

use serde::{Deserialize, Serialize};

/// One transcript unit with its original timing and translated text.
///
/// Segments arrive from the task store ordered by `sequence`, contiguous
/// from the configured base (a gap is a fetch-stage failure). They are
/// immutable after fetch except for the simplifier's rewrite of
/// `translated_text` during duration fitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Position in the transcript, contiguous from the configured base.
    pub sequence: u32,
    /// Original cue start in the source media.
    pub start_ms: u64,
    /// Original cue end, always greater than `start_ms`.
    pub end_ms: u64,
    /// Opaque speaker identifier from the transcription layer.
    pub speaker: String,
    /// Text in the source language.
    pub original_text: String,
    /// Text to synthesize.
    pub translated_text: String,
}

impl Segment {
    /// Length of the original time window.
    pub fn source_duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

/// Measured output of the synthesis engine for one segment.
///
/// `duration_ms` is measured from the produced samples, never requested up
/// front; the fitter and the repair sweep treat it as ground truth. The
/// samples stay owned here until the mixer consumes the placed segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisResult {
    /// Mono samples at the configured sample rate.
    pub samples: Vec<f32>,
    /// Measured duration of the synthesized audio.
    pub duration_ms: u64,
    /// How many synthesis attempts the fit loop used.
    pub attempt_count: u32,
}

/// A segment with its final placement on the output timeline.
///
/// Produced by the repair sweep, consumed by mixing and packaging. Adjacent
/// placements never overlap and `final_start_ms` never precedes the
/// original cue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedSegment {
    /// The fetched segment, with `translated_text` as actually synthesized.
    pub segment: Segment,
    /// The accepted synthesis output.
    pub result: SynthesisResult,
    /// Placement start on the output timeline.
    pub final_start_ms: u64,
    /// Placement end, `final_start_ms + result.duration_ms`.
    pub final_end_ms: u64,
    /// How far the placement slipped past the original cue.
    pub drift_ms: u64,
    /// The synthesized audio never fit the segment's budget.
    pub overflow: bool,
}

impl TimedSegment {
    /// Length of the placed audio.
    pub fn final_duration_ms(&self) -> u64 {
        self.final_end_ms.saturating_sub(self.final_start_ms)
    }
}
