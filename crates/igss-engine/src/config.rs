//! Learner configuration.
//!
//! Every field has a default, so partial JSON documents are accepted.
//! `validate()` runs before any sampling and rejects inconsistent settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Default accuracy parameter.
pub const DEFAULT_EPSILON: f64 = 0.05;

/// Default confidence parameter.
pub const DEFAULT_DELTA: f64 = 0.1;

/// Default checkpoint spacing, in accumulated weight units.
pub const DEFAULT_STEP_SIZE: f64 = 100.0;

/// Coverage above which the Binomial utility uses the normal approximation.
pub const DEFAULT_BINOMIAL_LARGE_THRESHOLD: f64 = 100.0;

/// Draw cap for a single selection.
pub const DEFAULT_MAX_DRAWS: u64 = 5_000_000;

// ── Enumerations ────────────────────────────────────────────────────────

/// Scoring function used to rank hypotheses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilityKind {
    /// Accuracy of the rule read as a two-class classifier.
    Accuracy,
    /// `g·(p − p0)` with the global prior.
    Linear,
    /// `g²·(p − p0)`.
    Squared,
    /// `√g·(p − p0)`.
    Binomial,
    /// `g·(p − p̂0)` with the prior estimated from the sample.
    Wracc,
}

impl std::fmt::Display for UtilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UtilityKind::Accuracy => "accuracy",
            UtilityKind::Linear => "linear",
            UtilityKind::Squared => "squared",
            UtilityKind::Binomial => "binomial",
            UtilityKind::Wracc => "wracc",
        };
        write!(f, "{}", name)
    }
}

/// Test deciding whether a round's best hypothesis joins the ensemble.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsefulnessCriterion {
    /// `utility − radius ≥ min_utility_useful`.
    WorstCase,
    /// `utility ≥ min_utility_useful`.
    Utility,
    /// `utility + radius ≥ min_utility_useful`.
    BestCase,
    /// The round's total weight is not far below the running average of
    /// accepted rounds at the current complexity.
    ExampleCount,
}

/// How a drawn example enters the statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    /// Accept with probability equal to the weight, then count with weight 1.
    Rejection,
    /// Always accept and count with the example's weight.
    Weighted,
}

// ── Learner Configuration ───────────────────────────────────────────────

/// Configuration of a learning run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerConfig {
    /// Accuracy of the utility guarantee.
    pub epsilon: f64,
    /// Total confidence mass for the run.
    pub delta: f64,
    /// Checkpoint spacing in accumulated weight.
    pub step_size: f64,
    /// Complexity of the seed hypotheses.
    pub min_complexity: usize,
    /// Highest complexity the controller escalates to.
    pub max_complexity: usize,
    /// Number of rounds.
    pub iterations: usize,
    /// Reweight examples after each accepted rule.
    pub use_kbs: bool,
    /// Run one Binomial confirmation pass before escalating.
    pub use_binomial_confirmation: bool,
    /// Rejection sampling instead of weighted accumulation.
    pub rejection_sampling: bool,
    /// Usefulness test applied to each round's best hypothesis.
    pub usefulness: UsefulnessCriterion,
    /// Pruning threshold on the optimistic utility bound.
    pub min_utility_pruning: f64,
    /// Threshold for the utility-based usefulness criteria.
    pub min_utility_useful: f64,
    /// Tolerance factor of the example-count criterion.
    pub example_factor: f64,
    /// Accepted rounds required before the example-count criterion applies.
    pub min_rounds_for_example_criterion: usize,
    /// Keep iterating at max complexity instead of stopping early.
    pub force_iterations: bool,
    /// Reset weights to uniform whenever complexity increases.
    pub reset_weights_on_escalation: bool,
    /// Divide weights by their maximum after reweighting.
    pub normalize_weights: bool,
    /// Scoring function.
    pub utility: UtilityKind,
    /// Coverage above which the Binomial utility switches to the normal approximation.
    pub binomial_large_threshold: f64,
    /// Draw cap per selection.
    pub max_draws: u64,
    /// Optional wall-clock cap per selection.
    pub max_selection_time: Option<Duration>,
    /// Seed of the sampling random source.
    pub seed: u64,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            delta: DEFAULT_DELTA,
            step_size: DEFAULT_STEP_SIZE,
            min_complexity: 1,
            max_complexity: 2,
            iterations: 10,
            use_kbs: true,
            use_binomial_confirmation: false,
            rejection_sampling: true,
            usefulness: UsefulnessCriterion::WorstCase,
            min_utility_pruning: 0.0,
            min_utility_useful: 0.0,
            example_factor: 1.5,
            min_rounds_for_example_criterion: 3,
            force_iterations: false,
            reset_weights_on_escalation: false,
            normalize_weights: true,
            utility: UtilityKind::Wracc,
            binomial_large_threshold: DEFAULT_BINOMIAL_LARGE_THRESHOLD,
            max_draws: DEFAULT_MAX_DRAWS,
            max_selection_time: None,
            seed: 0,
        }
    }
}

impl LearnerConfig {
    /// Parse a JSON document (missing fields take defaults) and validate it.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        let config: LearnerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// The sampling mode implied by `rejection_sampling`.
    pub fn sampling_mode(&self) -> SamplingMode {
        if self.rejection_sampling {
            SamplingMode::Rejection
        } else {
            SamplingMode::Weighted
        }
    }

    /// Reject inconsistent settings.
    pub fn validate(&self) -> EngineResult<()> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(invalid(format!("epsilon must be positive, got {}", self.epsilon)));
        }
        if !(self.delta > 0.0 && self.delta < 1.0) {
            return Err(invalid(format!("delta must lie in (0, 1), got {}", self.delta)));
        }
        if !(self.step_size.is_finite() && self.step_size > 0.0) {
            return Err(invalid(format!(
                "step_size must be positive, got {}",
                self.step_size
            )));
        }
        if self.min_complexity == 0 {
            return Err(invalid("min_complexity must be at least 1".into()));
        }
        if self.min_complexity > self.max_complexity {
            return Err(invalid(format!(
                "min_complexity ({}) exceeds max_complexity ({})",
                self.min_complexity, self.max_complexity
            )));
        }
        if self.iterations == 0 {
            return Err(invalid("iterations must be at least 1".into()));
        }
        if !(self.example_factor.is_finite() && self.example_factor > 0.0) {
            return Err(invalid(format!(
                "example_factor must be positive, got {}",
                self.example_factor
            )));
        }
        if !self.min_utility_pruning.is_finite() || !self.min_utility_useful.is_finite() {
            return Err(invalid("utility thresholds must be finite".into()));
        }
        if self.binomial_large_threshold.is_nan() || self.binomial_large_threshold < 0.0 {
            return Err(invalid(format!(
                "binomial_large_threshold must be non-negative, got {}",
                self.binomial_large_threshold
            )));
        }
        if self.max_draws == 0 {
            return Err(invalid("max_draws must be at least 1".into()));
        }
        if self.rejection_sampling && self.use_kbs && !self.normalize_weights {
            return Err(invalid(
                "rejection sampling with KBS requires normalize_weights so weights stay in [0, 1]"
                    .into(),
            ));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> EngineError {
    EngineError::InvalidConfig(msg)
}
