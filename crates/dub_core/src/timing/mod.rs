//! Duration fitting and timeline repair.
//!
//! Synthesis duration cannot be requested up front, so fitting happens
//! after the fact in two passes: a greedy per-segment loop that simplifies
//! and re-synthesizes text until it fits the segment's budget
//! ([`DurationFitter`]), and a global left-to-right sweep that removes
//! overlaps from the resulting durations ([`repair_timeline`]).

mod fitter;
mod repair;

pub use fitter::{DurationFitter, FittedSegment};
pub use repair::{repair_timeline, DriftSummary, RepairError};
