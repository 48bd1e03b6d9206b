//! Per-segment duration fitting.
//!
//! Fits one segment's synthesized audio into its budget: synthesize, and
//! if the result runs long, ask the simplifier for shorter text and
//! synthesize again, up to a bounded number of attempts. A segment that
//! never fits is accepted with its shortest attempt and flagged as
//! overflow - one stubborn segment must not abort the task.

use std::sync::Arc;

use crate::config::SynthesisSettings;
use crate::models::{Segment, SpeakerSample, SynthesisResult};
use crate::services::{ServiceError, SpeechSynthesizer, SynthesizedAudio, TextSimplifier};

/// A segment with accepted synthesis output, before timeline placement.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedSegment {
    /// The segment, `translated_text` replaced by what was synthesized.
    pub segment: Segment,
    /// The accepted synthesis output.
    pub result: SynthesisResult,
    /// No attempt fit the budget; the shortest one was kept.
    pub overflow: bool,
}

/// Greedy per-segment fit loop.
///
/// Segments are fitted independently, without knowledge of their siblings'
/// outcomes; the repair sweep reconciles the results globally.
pub struct DurationFitter {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    simplifier: Arc<dyn TextSimplifier>,
    tolerance: f64,
    max_attempts: u32,
}

impl DurationFitter {
    /// Create a fitter from the synthesis settings.
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        simplifier: Arc<dyn TextSimplifier>,
        settings: &SynthesisSettings,
    ) -> Self {
        Self {
            synthesizer,
            simplifier,
            tolerance: settings.tolerance.max(1.0),
            max_attempts: settings.max_fit_attempts.max(1),
        }
    }

    /// The duration a segment's audio is allowed to reach.
    pub fn budget_ms(&self, segment: &Segment) -> u64 {
        (segment.source_duration_ms() as f64 * self.tolerance).round() as u64
    }

    /// Fit one segment.
    ///
    /// A retryable synthesis failure (timeout, engine busy) consumes one
    /// attempt; a non-retryable one fails the fit outright. Simplifier
    /// failures stop the loop early and keep the best attempt so far.
    pub async fn fit(
        &self,
        segment: &Segment,
        speaker: &SpeakerSample,
    ) -> Result<FittedSegment, ServiceError> {
        let budget = self.budget_ms(segment);
        let mut text = segment.translated_text.clone();
        let mut best: Option<(String, SynthesizedAudio)> = None;
        let mut attempts = 0u32;

        for attempt in 1..=self.max_attempts {
            attempts = attempt;

            let audio = match self.synthesizer.synthesize(&text, speaker).await {
                Ok(audio) => audio,
                Err(err) if err.is_retryable() => {
                    tracing::warn!(
                        "segment {}: synthesis attempt {}/{} failed: {}",
                        segment.sequence,
                        attempt,
                        self.max_attempts,
                        err
                    );
                    continue;
                }
                Err(err) => return Err(err),
            };

            if audio.duration_ms <= budget {
                return Ok(self.accept(segment, text, audio, attempt, false));
            }

            let is_shorter = best
                .as_ref()
                .map(|(_, b)| audio.duration_ms < b.duration_ms)
                .unwrap_or(true);
            let current_duration = audio.duration_ms;
            if is_shorter {
                best = Some((text.clone(), audio));
            }

            if attempt == self.max_attempts {
                break;
            }

            match self.simplifier.simplify(&text, budget, current_duration).await {
                Ok(shorter) if !shorter.trim().is_empty() => text = shorter,
                Ok(_) => {
                    tracing::warn!(
                        "segment {}: simplifier returned empty text, keeping best attempt",
                        segment.sequence
                    );
                    break;
                }
                Err(err) => {
                    tracing::warn!(
                        "segment {}: simplifier failed, keeping best attempt: {}",
                        segment.sequence,
                        err
                    );
                    break;
                }
            }
        }

        match best {
            Some((final_text, audio)) => {
                tracing::info!(
                    "segment {}: no attempt fit budget {}ms, accepting {}ms as overflow",
                    segment.sequence,
                    budget,
                    audio.duration_ms
                );
                Ok(self.accept(segment, final_text, audio, attempts, true))
            }
            None => Err(ServiceError::unavailable(
                "synthesis engine",
                format!(
                    "no synthesis attempt produced audio for segment {}",
                    segment.sequence
                ),
            )),
        }
    }

    fn accept(
        &self,
        segment: &Segment,
        text: String,
        audio: SynthesizedAudio,
        attempts: u32,
        overflow: bool,
    ) -> FittedSegment {
        let mut segment = segment.clone();
        segment.translated_text = text;
        FittedSegment {
            segment,
            result: SynthesisResult {
                samples: audio.samples,
                duration_ms: audio.duration_ms,
                attempt_count: attempts,
            },
            overflow,
        }
    }
}
