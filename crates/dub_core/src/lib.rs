//! DubFlow Core - backend logic for the DubFlow dubbing service.
//!
//! This crate contains the task pipeline and timing-repair engine with no
//! API-layer dependencies. It turns a translated transcript into a globally
//! consistent dubbed timeline: speech is synthesized per segment, fitted to
//! each segment's original time window, swept into a non-overlapping
//! timeline, then handed to the mixing and packaging collaborators.
//!
//! External systems (task store, object storage, synthesis engine, text
//! simplifier, mixer, packager) are consumed through the traits in
//! [`services`]; the caller wires concrete clients at startup.

pub mod config;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod timing;
pub mod util;
pub mod workspace;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
