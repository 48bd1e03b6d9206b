//! Pipeline orchestration for dubbing tasks.
//!
//! One task run is a fixed sequence of steps executed over a shared
//! context and state; the orchestrator creates a context per task,
//! enforces at most one concurrent run per task id, and persists status
//! transitions to the external task store.
//!
//! # Architecture
//!
//! ```text
//! Orchestrator
//!     └── Pipeline
//!         ├── Step: Fetch        (fetching)
//!         ├── Step: Segment      (segmenting)
//!         ├── Step: Synthesize   (synthesizing)
//!         ├── Step: Align        (aligning)
//!         ├── Step: Mix          (mixing)
//!         └── Step: Package      (packaging)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use dub_core::orchestrator::Orchestrator;
//!
//! let orchestrator = Orchestrator::new(settings, services);
//! match orchestrator.start("task-42")? {
//!     StartOutcome::Accepted => {}
//!     StartOutcome::AlreadyRunning => println!("still busy"),
//! }
//! let record = orchestrator.status("task-42").await?;
//! ```

mod errors;
#[allow(clippy::module_inception)]
mod orchestrator;
mod pipeline;
mod registry;
mod step;
pub mod steps;
#[cfg(test)]
pub(crate) mod testing;
mod types;

pub use errors::{PipelineError, PipelineResult, StepError, StepResult};
pub use orchestrator::Orchestrator;
pub use pipeline::Pipeline;
pub use registry::{RegistrationGuard, TaskRegistry};
pub use step::PipelineStep;
pub use steps::{AlignStep, FetchStep, MixStep, PackageStep, SegmentStep, SynthesizeStep};
pub use types::{ProgressCallback, TaskContext, TaskState};

use std::sync::Arc;

use crate::services::Services;

/// Create the standard dubbing pipeline with all steps in stage order.
///
/// 1. Fetch - read transcript, download source media
/// 2. Segment - cut speaker reference audio per segment
/// 3. Synthesize - fit synthesized speech to each segment's budget
/// 4. Align - repair the global timeline
/// 5. Mix - combine dubbed audio with the source video
/// 6. Package - publish the streamable output
pub fn create_dubbing_pipeline(services: &Services) -> Pipeline {
    Pipeline::new(Arc::clone(&services.task_store))
        .with_step(FetchStep::new(
            Arc::clone(&services.task_store),
            Arc::clone(&services.object_store),
        ))
        .with_step(SegmentStep::new(Arc::clone(&services.segmenter)))
        .with_step(SynthesizeStep::new(
            Arc::clone(&services.synthesizer),
            Arc::clone(&services.simplifier),
        ))
        .with_step(AlignStep::new())
        .with_step(MixStep::new(Arc::clone(&services.mixer)))
        .with_step(PackageStep::new(Arc::clone(&services.packager)))
}

#[cfg(test)]
mod tests {
    use super::testing::{test_services, RecordingStore};
    use super::*;

    #[test]
    fn standard_pipeline_has_all_stages_in_order() {
        let services = test_services(Arc::new(RecordingStore::default()));
        let pipeline = create_dubbing_pipeline(&services);

        assert_eq!(
            pipeline.step_names(),
            vec!["Fetch", "Segment", "Synthesize", "Align", "Mix", "Package"]
        );
    }
}
