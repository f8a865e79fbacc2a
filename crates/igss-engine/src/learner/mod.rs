//! Iterating GSS: complexity escalation, usefulness tests and reweighting.

pub mod controller;
pub mod report;
pub mod reweight;
pub mod usefulness;

pub use controller::{IgssLearner, LearnerOutput};
pub use report::{RoundOutcome, RoundRecord, RunId, RunReport, Termination};
pub use reweight::{reweight, ReweightSummary};
pub use usefulness::{ComplexityTracker, UsefulnessTest};
