//! Additive two-class ensembles of rules.
//!
//! Each member contributes the log lift of its contingency-matrix row for the
//! example; the sum starts at the prior log odds. The model is positive when
//! the total score is above zero.

use serde::{Deserialize, Serialize};

use crate::contingency::ContingencyMatrix;
use crate::dataset::{Example, Label};
use crate::priors::Priors;
use crate::rule::Rule;

/// One accepted rule with the contingency matrix observed when it was accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnsembleMember {
    pub rule: Rule,
    pub matrix: ContingencyMatrix,
}

impl EnsembleMember {
    /// Log-lift contribution of this member for an example.
    pub fn contribution(&self, example: &Example) -> f64 {
        self.matrix.log_lift(self.rule.predict(example))
    }
}

/// Immutable predictive model: ordered members plus global priors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnsembleModel {
    members: Vec<EnsembleMember>,
    priors: Priors,
}

impl EnsembleModel {
    pub fn members(&self) -> &[EnsembleMember] {
        &self.members
    }

    pub fn priors(&self) -> Priors {
        self.priors
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Log odds of the positive class.
    pub fn score(&self, example: &Example) -> f64 {
        self.priors.log_odds()
            + self
                .members
                .iter()
                .map(|m| m.contribution(example))
                .sum::<f64>()
    }

    /// Logistic transform of the score.
    pub fn probability(&self, example: &Example) -> f64 {
        1.0 / (1.0 + (-self.score(example)).exp())
    }

    pub fn predict(&self, example: &Example) -> Label {
        if self.score(example) > 0.0 {
            Label::Positive
        } else {
            Label::Negative
        }
    }
}

/// Append-only accumulator of accepted (rule, matrix) pairs.
#[derive(Clone, Debug, Default)]
pub struct EnsembleBuilder {
    members: Vec<EnsembleMember>,
}

impl EnsembleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: Rule, matrix: ContingencyMatrix) {
        self.members.push(EnsembleMember { rule, matrix });
    }

    /// Whether a rule has already been accepted.
    pub fn contains(&self, rule: &Rule) -> bool {
        self.members.iter().any(|m| &m.rule == rule)
    }

    pub fn members(&self) -> &[EnsembleMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Snapshot the accumulated members into a model.
    pub fn build(&self, priors: Priors) -> EnsembleModel {
        EnsembleModel {
            members: self.members.clone(),
            priors,
        }
    }
}
