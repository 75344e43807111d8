//! Roster reconciliation: one tick diffs the fetched roster against the
//! persisted baseline and subscribes new profiles to every target list.
//!
//! The baseline only advances when a tick finds nothing new (or on the
//! first run). A tick that pushes additions keeps the old baseline.

mod engine;
mod report;

pub use engine::{EngineError, ReconciliationEngine};
pub use report::{FanOutReport, TargetFailure, TargetReport, TickOutcome};
