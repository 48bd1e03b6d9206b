//! Pipeline step implementations.
//!
//! Each step handles one stage of the dubbing pipeline.

mod align;
mod fetch;
mod mix;
mod package;
mod segment;
mod synthesize;

pub use align::AlignStep;
pub use fetch::FetchStep;
pub use mix::MixStep;
pub use package::PackageStep;
pub use segment::SegmentStep;
pub use synthesize::SynthesizeStep;
