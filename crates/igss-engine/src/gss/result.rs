//! Selection results.

use igss_types::{ContingencyMatrix, Label, Rule};
use serde::{Deserialize, Serialize};

use crate::config::UtilityKind;
use crate::utility::Coverage;

/// Snapshot of one selected hypothesis and the statistics it was judged on.
///
/// Two results are equal when they carry the same rule.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuleResult {
    rule: Rule,
    coverage: Coverage,
    total_weight: f64,
    total_positive_weight: f64,
    utility: f64,
    radius: f64,
    kind: UtilityKind,
}

impl RuleResult {
    pub fn new(
        rule: Rule,
        coverage: Coverage,
        total_weight: f64,
        total_positive_weight: f64,
        utility: f64,
        radius: f64,
        kind: UtilityKind,
    ) -> Self {
        Self {
            rule,
            coverage,
            total_weight,
            total_positive_weight,
            utility,
            radius,
            kind,
        }
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn coverage(&self) -> Coverage {
        self.coverage
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn total_positive_weight(&self) -> f64 {
        self.total_positive_weight
    }

    pub fn utility(&self) -> f64 {
        self.utility
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Utility function the result was scored with.
    pub fn kind(&self) -> UtilityKind {
        self.kind
    }

    /// Worst-case utility.
    pub fn lower(&self) -> f64 {
        self.utility - self.radius
    }

    /// Best-case utility.
    pub fn upper(&self) -> f64 {
        self.utility + self.radius
    }

    /// Normalized two-class matrix of the rule's counters over the sample,
    /// reading uncovered examples as predicted with the other class.
    pub fn tentative_matrix(&self) -> ContingencyMatrix {
        let m = self.total_weight;
        let prediction = self.rule.prediction();
        let covered = self.coverage.covered.max(0.0);
        let hits = self.coverage.positive.clamp(0.0, covered);
        let positive_total = self.total_positive_weight.clamp(0.0, m.max(0.0));
        let class_total = match prediction {
            Label::Positive => positive_total,
            Label::Negative => m - positive_total,
        };

        let mut matrix = ContingencyMatrix::zero();
        matrix.add(prediction, prediction, hits);
        matrix.add(prediction, prediction.other(), covered - hits);
        matrix.add(prediction.other(), prediction, (class_total - hits).max(0.0));
        matrix.add(
            prediction.other(),
            prediction.other(),
            ((m - covered) - (class_total - hits)).max(0.0),
        );
        matrix.normalized()
    }
}

impl PartialEq for RuleResult {
    fn eq(&self, other: &Self) -> bool {
        self.rule == other.rule
    }
}

impl Eq for RuleResult {}
