//! # igss-engine
//!
//! Rule discovery by iterating generalized sequential sampling (IGSS).
//!
//! Each round draws weighted examples until the best rule hypothesis can be
//! told apart from the rest with accuracy `epsilon` at confidence `delta`,
//! then either accepts it into an additive ensemble (reweighting the data so
//! the next round looks for something new) or moves to longer rules.
//!
//! ## Architecture
//!
//! ```text
//!   LearnerConfig ──► IgssLearner ──────────────────────────► LearnerOutput
//!                        │                                  (model, results,
//!          DeltaBudget ◄─┤                                       report)
//!                        ▼
//!                  SequentialSelector ◄── UtilityFunction ◄── Priors
//!                        │       ▲
//!        ExampleStream ──┘       └── HypothesisPool (arena of Hypothesis)
//!                        │
//!                        ▼
//!   RuleResult ──► EnsembleBuilder ──► reweight (via ModelEvaluator)
//!                        │
//!                        └──► ResultStore ──► diversity
//! ```
//!
//! Runs are single-threaded and deterministic for a given seed. A
//! [`StopHandle`] cancels at the next round or checkpoint.

#![deny(unsafe_code)]

pub mod budget;
pub mod config;
pub mod error;
pub mod gss;
pub mod hypothesis;
pub mod learner;
pub mod results;
pub mod stop;
pub mod stream;
pub mod utility;

// ── Re-exports ──────────────────────────────────────────────────────────

pub use budget::{per_checkpoint, per_hypothesis, DeltaBudget, RoundAllotment};
pub use config::{LearnerConfig, SamplingMode, UsefulnessCriterion, UtilityKind};
pub use error::{EngineError, EngineResult};
pub use gss::{BestSet, RuleResult, Selection, SelectionExit, SelectionParams, SequentialSelector};
pub use hypothesis::{Hypothesis, HypothesisId, HypothesisPool};
pub use learner::{
    reweight, ComplexityTracker, IgssLearner, LearnerOutput, ReweightSummary, RoundOutcome,
    RoundRecord, RunId, RunReport, Termination, UsefulnessTest,
};
pub use results::{diversity, ResultStore};
pub use stop::StopHandle;
pub use stream::{Draw, ExampleStream};
pub use utility::{Coverage, UtilityFunction, MAX_RADIUS};

// ── Collaborator re-exports ─────────────────────────────────────────────

pub use igss_evaluation::{EvaluationError, LocalEvaluator, ModelEvaluator};
pub use igss_types::{Condition, Dataset, DatasetBuilder, EnsembleModel, Label, Priors, Rule};
