//! Rule hypotheses with weighted coverage counters, held in an arena.
//!
//! A `HypothesisPool` owns every candidate of the current complexity. The
//! sequential selector refers to hypotheses by `HypothesisId` (an index into
//! the pool), so promotion and pruning only move ids between sets and the
//! full pool is intact when a selection returns. Ids stay valid until the
//! pool is restructured by `retain`, `remove_rule` or `refine_all`.

use std::fmt;

use igss_types::{Attribute, Condition, Dataset, Example, Label, Rule};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utility::Coverage;

/// Index of a hypothesis inside its pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HypothesisId(pub usize);

impl fmt::Display for HypothesisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h#{}", self.0)
    }
}

/// A candidate rule plus the weight it has covered in the current round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
    rule: Rule,
    covered: f64,
    positive: f64,
    refinable: bool,
}

impl Hypothesis {
    pub fn new(rule: Rule, attribute_count: usize) -> Self {
        let refinable = rule.is_refinable(attribute_count);
        Self {
            rule,
            covered: 0.0,
            positive: 0.0,
            refinable,
        }
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn prediction(&self) -> Label {
        self.rule.prediction()
    }

    pub fn complexity(&self) -> usize {
        self.rule.complexity()
    }

    /// Weight of sampled examples the rule covers.
    pub fn covered(&self) -> f64 {
        self.covered
    }

    /// Covered weight whose label equals the prediction.
    pub fn positive(&self) -> f64 {
        self.positive
    }

    pub fn is_refinable(&self) -> bool {
        self.refinable
    }

    pub fn coverage(&self) -> Coverage {
        Coverage::new(self.covered, self.positive, self.rule.prediction())
    }

    /// Count one accepted example.
    pub fn apply(&mut self, example: &Example, weight: f64) {
        if weight <= 0.0 || !self.rule.covers(example) {
            return;
        }
        self.covered += weight;
        if example.label() == self.rule.prediction() {
            self.positive += weight;
        }
    }

    /// Zero the counters.
    pub fn reset(&mut self) {
        self.covered = 0.0;
        self.positive = 0.0;
    }

    /// One-step-more-specific successors, with fresh counters.
    pub fn refine(&self, attributes: &[Attribute]) -> Vec<Hypothesis> {
        if !self.refinable {
            return Vec::new();
        }
        self.rule
            .refinements(attributes)
            .into_iter()
            .map(|rule| Hypothesis::new(rule, attributes.len()))
            .collect()
    }
}

/// Arena of hypotheses of one complexity level.
#[derive(Clone, Debug, Default)]
pub struct HypothesisPool {
    hypotheses: Vec<Hypothesis>,
}

impl HypothesisPool {
    pub fn new(hypotheses: Vec<Hypothesis>) -> Self {
        Self { hypotheses }
    }

    /// Every rule of the given complexity over the dataset's attributes,
    /// predicting either class.
    pub fn seed(dataset: &Dataset, complexity: usize) -> Self {
        let attributes = dataset.attributes();
        let mut hypotheses: Vec<Hypothesis> = Vec::new();
        for (attribute, attr) in attributes.iter().enumerate() {
            for value in 0..attr.arity() {
                for label in Label::ALL {
                    let rule = Rule::single(Condition::new(attribute, value), label);
                    hypotheses.push(Hypothesis::new(rule, attributes.len()));
                }
            }
        }
        let mut pool = Self { hypotheses };
        for _ in 1..complexity {
            pool.refine_all(attributes);
        }
        debug!(
            complexity,
            hypotheses = pool.len(),
            attributes = attributes.len(),
            "seeded hypothesis pool"
        );
        pool
    }

    pub fn len(&self) -> usize {
        self.hypotheses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hypotheses.is_empty()
    }

    pub fn get(&self, id: HypothesisId) -> Option<&Hypothesis> {
        self.hypotheses.get(id.0)
    }

    pub fn ids(&self) -> impl Iterator<Item = HypothesisId> + '_ {
        (0..self.hypotheses.len()).map(HypothesisId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (HypothesisId, &Hypothesis)> + '_ {
        self.hypotheses
            .iter()
            .enumerate()
            .map(|(i, h)| (HypothesisId(i), h))
    }

    /// Count one accepted example on every hypothesis.
    pub fn apply_all(&mut self, example: &Example, weight: f64) {
        for h in &mut self.hypotheses {
            h.apply(example, weight);
        }
    }

    pub fn reset_all(&mut self) {
        for h in &mut self.hypotheses {
            h.reset();
        }
    }

    /// Keep only hypotheses matching the predicate. Returns how many were dropped.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&Hypothesis) -> bool,
    {
        let before = self.hypotheses.len();
        self.hypotheses.retain(|h| keep(h));
        before - self.hypotheses.len()
    }

    /// Drop the hypothesis with this rule, if present.
    pub fn remove_rule(&mut self, rule: &Rule) -> bool {
        self.retain(|h| h.rule() != rule) > 0
    }

    /// Replace every hypothesis by its successors; non-refinable ones are dropped.
    pub fn refine_all(&mut self, attributes: &[Attribute]) {
        let refined: Vec<Hypothesis> = self
            .hypotheses
            .iter()
            .flat_map(|h| h.refine(attributes))
            .collect();
        self.hypotheses = refined;
    }
}
