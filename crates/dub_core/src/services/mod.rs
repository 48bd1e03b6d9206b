//! Collaborator interfaces consumed by the pipeline.
//!
//! The core owns no network or media code; every external system is reached
//! through one of these traits. Concrete clients (relational store, object
//! storage, the synthesis engine, the simplifier, ffmpeg-backed mixing and
//! packaging) are wired by the caller at startup and handed to the
//! orchestrator as a [`Services`] bundle.

mod error;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{
    MediaPaths, MixedMedia, Segment, SpeakerSample, TaskRecord, TaskStatus, TimedSegment,
};

pub use error::{ServiceError, ServiceResult};

/// Relational store holding transcripts and the persisted task mirror.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Read the transcript for a task, ordered by sequence.
    async fn segments(&self, task_id: &str) -> ServiceResult<Vec<Segment>>;

    /// Read the object-store references for the task's source media.
    async fn media_paths(&self, task_id: &str) -> ServiceResult<MediaPaths>;

    /// Persist a status transition.
    ///
    /// `detail` carries the failure message for `error`; `output_locator`
    /// carries the packaged-output locator for `completed`.
    async fn update_status(
        &self,
        task_id: &str,
        status: TaskStatus,
        detail: Option<&str>,
        output_locator: Option<&str>,
    ) -> ServiceResult<()>;

    /// Read the persisted task record, `None` if the task is unknown.
    async fn status(&self, task_id: &str) -> ServiceResult<Option<TaskRecord>>;
}

/// Object storage for media blobs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Download the object behind a reference.
    async fn download(&self, reference: &str) -> ServiceResult<Vec<u8>>;

    /// Upload bytes under a reference, returning the stored reference.
    async fn upload(&self, bytes: Vec<u8>, reference: &str) -> ServiceResult<String>;
}

/// Audio produced by one synthesis call.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedAudio {
    /// Mono samples at the engine's output rate.
    pub samples: Vec<f32>,
    /// Duration measured from the produced samples.
    pub duration_ms: u64,
}

/// Neural speech synthesis engine.
///
/// Invoked many times per task; its concurrency ceiling is respected by the
/// synthesis stage's semaphore, not by this trait.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` in the voice of the given reference clip.
    async fn synthesize(
        &self,
        text: &str,
        speaker: &SpeakerSample,
    ) -> ServiceResult<SynthesizedAudio>;
}

/// Rewrites translated text into a shorter, semantically equivalent form.
#[async_trait]
pub trait TextSimplifier: Send + Sync {
    /// Ask for text whose synthesis should fit `target_duration_ms`,
    /// given that the current text measured `current_duration_ms`.
    async fn simplify(
        &self,
        text: &str,
        target_duration_ms: u64,
        current_duration_ms: u64,
    ) -> ServiceResult<String>;
}

/// Cuts per-segment speaker reference clips from the source audio.
#[async_trait]
pub trait AudioSegmenter: Send + Sync {
    /// Extract one reference clip per segment, aligned by index.
    async fn extract_references(
        &self,
        audio: &[u8],
        segments: &[Segment],
    ) -> ServiceResult<Vec<SpeakerSample>>;
}

/// Mixes the dubbed timeline with the silent source video.
#[async_trait]
pub trait MediaMixer: Send + Sync {
    /// Produce mixed media in `output_dir` from the placed segments.
    async fn mix(
        &self,
        video: &Path,
        segments: &[TimedSegment],
        output_dir: &Path,
    ) -> ServiceResult<MixedMedia>;
}

/// Packages mixed media for progressive playback.
#[async_trait]
pub trait Packager: Send + Sync {
    /// Package and publish, returning the streamable locator.
    async fn package(&self, media: &MixedMedia, task_id: &str) -> ServiceResult<String>;
}

/// The full collaborator bundle handed to the orchestrator.
#[derive(Clone)]
pub struct Services {
    pub task_store: Arc<dyn TaskStore>,
    pub object_store: Arc<dyn ObjectStore>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub simplifier: Arc<dyn TextSimplifier>,
    pub segmenter: Arc<dyn AudioSegmenter>,
    pub mixer: Arc<dyn MediaMixer>,
    pub packager: Arc<dyn Packager>,
}
