//! Usefulness test for a round's best hypothesis.

use crate::config::{LearnerConfig, UsefulnessCriterion};
use crate::gss::RuleResult;

/// Bookkeeping for the current complexity level; cleared on escalation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComplexityTracker {
    accepted_weights: Vec<f64>,
    confirmation_used: bool,
}

impl ComplexityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the sample size of a round whose rule was accepted.
    pub fn record_accepted(&mut self, total_weight: f64) {
        self.accepted_weights.push(total_weight);
    }

    pub fn accepted_rounds(&self) -> usize {
        self.accepted_weights.len()
    }

    /// Mean sample size of accepted rounds at this complexity.
    pub fn average_weight(&self) -> Option<f64> {
        if self.accepted_weights.is_empty() {
            return None;
        }
        Some(self.accepted_weights.iter().sum::<f64>() / self.accepted_weights.len() as f64)
    }

    pub fn confirmation_used(&self) -> bool {
        self.confirmation_used
    }

    pub fn mark_confirmation_used(&mut self) {
        self.confirmation_used = true;
    }

    pub fn reset(&mut self) {
        self.accepted_weights.clear();
        self.confirmation_used = false;
    }
}

/// Criterion plus thresholds, taken from the configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UsefulnessTest {
    criterion: UsefulnessCriterion,
    min_utility: f64,
    example_factor: f64,
    min_rounds: usize,
}

impl UsefulnessTest {
    pub fn from_config(config: &LearnerConfig) -> Self {
        Self {
            criterion: config.usefulness,
            min_utility: config.min_utility_useful,
            example_factor: config.example_factor,
            min_rounds: config.min_rounds_for_example_criterion,
        }
    }

    pub fn criterion(&self) -> UsefulnessCriterion {
        self.criterion
    }

    pub fn is_useful(&self, result: &RuleResult, tracker: &ComplexityTracker) -> bool {
        match self.criterion {
            UsefulnessCriterion::WorstCase => result.lower() >= self.min_utility,
            UsefulnessCriterion::Utility => result.utility() >= self.min_utility,
            UsefulnessCriterion::BestCase => result.upper() >= self.min_utility,
            UsefulnessCriterion::ExampleCount => {
                // A selection that stops much earlier than usual points at a
                // near-degenerate sample.
                if tracker.accepted_rounds() < self.min_rounds {
                    return true;
                }
                match tracker.average_weight() {
                    Some(avg) => result.total_weight() >= avg / self.example_factor,
                    None => true,
                }
            }
        }
    }
}
