//! Shared mock collaborators and fixtures for orchestrator tests.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::logging::{LogConfig, TaskLogger};
use crate::models::{
    MediaPaths, MixedMedia, Segment, SpeakerSample, SynthesisResult, TaskRecord, TaskStatus,
    TimedSegment,
};
use crate::services::{
    AudioSegmenter, MediaMixer, ObjectStore, Packager, ServiceError, ServiceResult, Services,
    SpeechSynthesizer, SynthesizedAudio, TaskStore, TextSimplifier,
};
use crate::workspace::Workspace;

use super::types::TaskContext;

/// Build a segment with boilerplate fields filled in.
pub fn make_segment(sequence: u32, start_ms: u64, end_ms: u64) -> Segment {
    Segment {
        sequence,
        start_ms,
        end_ms,
        speaker: "spk_0".to_string(),
        original_text: "source text".to_string(),
        translated_text: "translated".to_string(),
    }
}

/// Build a placed segment for mix/package tests.
pub fn make_timed_segment(sequence: u32, final_start_ms: u64, duration_ms: u64) -> TimedSegment {
    TimedSegment {
        segment: make_segment(sequence, final_start_ms, final_start_ms + duration_ms),
        result: SynthesisResult {
            samples: vec![0.0; 8],
            duration_ms,
            attempt_count: 1,
        },
        final_start_ms,
        final_end_ms: final_start_ms + duration_ms,
        drift_ms: 0,
        overflow: false,
    }
}

/// Build a context with default settings, a silent logger, and a real
/// workspace under the system temp dir.
pub fn test_context(task_id: &str) -> TaskContext {
    let workspace = Workspace::create(&std::env::temp_dir(), task_id).unwrap();
    let logger = Arc::new(TaskLogger::disabled(task_id, LogConfig::default()));
    TaskContext::new(task_id, crate::config::Settings::default(), workspace, logger)
}

/// Task store that records every status transition.
#[derive(Default)]
pub struct RecordingStore {
    segments: Mutex<Vec<Segment>>,
    history: Mutex<Vec<(TaskStatus, Option<String>, Option<String>)>>,
    segments_delay: Option<Duration>,
}

impl RecordingStore {
    pub fn with_segments(segments: Vec<Segment>) -> Self {
        Self {
            segments: Mutex::new(segments),
            ..Self::default()
        }
    }

    /// Like `with_segments`, but each transcript read takes `delay`.
    pub fn slow(segments: Vec<Segment>, delay: Duration) -> Self {
        Self {
            segments: Mutex::new(segments),
            history: Mutex::new(Vec::new()),
            segments_delay: Some(delay),
        }
    }

    /// Statuses persisted, in order.
    pub fn status_history(&self) -> Vec<TaskStatus> {
        self.history.lock().iter().map(|(s, _, _)| *s).collect()
    }

    /// Detail from the most recent transition that carried one.
    pub fn last_detail(&self) -> Option<String> {
        self.history
            .lock()
            .iter()
            .rev()
            .find_map(|(_, detail, _)| detail.clone())
    }

    /// Locator from the most recent transition that carried one.
    pub fn last_locator(&self) -> Option<String> {
        self.history
            .lock()
            .iter()
            .rev()
            .find_map(|(_, _, locator)| locator.clone())
    }

    fn current_record(&self, task_id: &str) -> Option<TaskRecord> {
        self.history.lock().last().map(|(status, detail, locator)| TaskRecord {
            task_id: task_id.to_string(),
            status: *status,
            error_detail: detail.clone(),
            output_locator: locator.clone(),
        })
    }
}

#[async_trait]
impl TaskStore for RecordingStore {
    async fn segments(&self, _task_id: &str) -> ServiceResult<Vec<Segment>> {
        if let Some(delay) = self.segments_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.segments.lock().clone())
    }

    async fn media_paths(&self, task_id: &str) -> ServiceResult<MediaPaths> {
        Ok(MediaPaths {
            audio_ref: format!("media/{}/audio.wav", task_id),
            video_ref: format!("media/{}/video.mp4", task_id),
        })
    }

    async fn update_status(
        &self,
        _task_id: &str,
        status: TaskStatus,
        detail: Option<&str>,
        output_locator: Option<&str>,
    ) -> ServiceResult<()> {
        self.history.lock().push((
            status,
            detail.map(str::to_string),
            output_locator.map(str::to_string),
        ));
        Ok(())
    }

    async fn status(&self, task_id: &str) -> ServiceResult<Option<TaskRecord>> {
        Ok(self.current_record(task_id))
    }
}

/// Object store serving fixed bytes for any reference.
#[derive(Default)]
pub struct MemoryObjectStore {
    downloads: AtomicUsize,
}

impl MemoryObjectStore {
    pub fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn download(&self, reference: &str) -> ServiceResult<Vec<u8>> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        Ok(reference.as_bytes().to_vec())
    }

    async fn upload(&self, _bytes: Vec<u8>, reference: &str) -> ServiceResult<String> {
        Ok(reference.to_string())
    }
}

/// Synthesizer whose duration is 100ms per character of input text.
#[derive(Default)]
pub struct CharDurationSynthesizer {
    calls: AtomicUsize,
}

impl CharDurationSynthesizer {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for CharDurationSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        _speaker: &SpeakerSample,
    ) -> ServiceResult<SynthesizedAudio> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let chars = text.chars().count();
        Ok(SynthesizedAudio {
            samples: vec![0.0; chars],
            duration_ms: chars as u64 * 100,
        })
    }
}

/// Simplifier that halves the text on every call.
pub struct HalvingSimplifier;

#[async_trait]
impl TextSimplifier for HalvingSimplifier {
    async fn simplify(
        &self,
        text: &str,
        _target_duration_ms: u64,
        _current_duration_ms: u64,
    ) -> ServiceResult<String> {
        let keep = (text.chars().count() / 2).max(1);
        Ok(text.chars().take(keep).collect())
    }
}

/// Simplifier that never shortens anything.
pub struct EchoSimplifier;

#[async_trait]
impl TextSimplifier for EchoSimplifier {
    async fn simplify(
        &self,
        text: &str,
        _target_duration_ms: u64,
        _current_duration_ms: u64,
    ) -> ServiceResult<String> {
        Ok(text.to_string())
    }
}

/// Segmenter returning one short reference clip per segment.
pub struct FixedSegmenter;

#[async_trait]
impl AudioSegmenter for FixedSegmenter {
    async fn extract_references(
        &self,
        _audio: &[u8],
        segments: &[Segment],
    ) -> ServiceResult<Vec<SpeakerSample>> {
        Ok(segments
            .iter()
            .map(|_| SpeakerSample {
                samples: vec![0.0; 16],
                sample_rate: 24_000,
            })
            .collect())
    }
}

/// Mixer writing a placeholder file into the given output directory.
pub struct WorkspaceMixer;

#[async_trait]
impl MediaMixer for WorkspaceMixer {
    async fn mix(
        &self,
        _video: &Path,
        segments: &[TimedSegment],
        output_dir: &Path,
    ) -> ServiceResult<MixedMedia> {
        let duration_ms = segments.last().map(|s| s.final_end_ms).unwrap_or(0);
        let path = output_dir.join("mixed.mp4");
        std::fs::write(&path, b"mixed")
            .map_err(|e| ServiceError::unavailable("media mixer", e.to_string()))?;
        Ok(MixedMedia { path, duration_ms })
    }
}

/// Packager returning a deterministic locator.
pub struct LocatorPackager;

#[async_trait]
impl Packager for LocatorPackager {
    async fn package(&self, _media: &MixedMedia, task_id: &str) -> ServiceResult<String> {
        Ok(format!("streams/{}/playlist.m3u8", task_id))
    }
}

/// Wire a full mock service bundle around the given store.
pub fn test_services(task_store: Arc<RecordingStore>) -> Services {
    Services {
        task_store,
        object_store: Arc::new(MemoryObjectStore::default()),
        synthesizer: Arc::new(CharDurationSynthesizer::default()),
        simplifier: Arc::new(HalvingSimplifier),
        segmenter: Arc::new(FixedSegmenter),
        mixer: Arc::new(WorkspaceMixer),
        packager: Arc::new(LocatorPackager),
    }
}
