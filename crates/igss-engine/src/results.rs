//! Accepted results of a run and their disagreement.

use igss_types::{Dataset, Label, Priors};
use serde::{Deserialize, Serialize};

use crate::gss::RuleResult;

/// Ordered record of the results accepted into the ensemble.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultStore {
    results: Vec<RuleResult>,
    priors: Priors,
}

impl ResultStore {
    pub fn new(priors: Priors) -> Self {
        Self {
            results: Vec::new(),
            priors,
        }
    }

    pub fn push(&mut self, result: RuleResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[RuleResult] {
        &self.results
    }

    pub fn priors(&self) -> Priors {
        self.priors
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Diversity of the stored results on a dataset.
    pub fn diversity_on(&self, dataset: &Dataset) -> f64 {
        diversity(dataset, &self.results)
    }
}

/// Mean binary entropy, in bits, of the positive/negative vote split of the
/// results on each example. 0 when every example gets a unanimous vote, 1
/// when every example splits evenly.
pub fn diversity(dataset: &Dataset, results: &[RuleResult]) -> f64 {
    if dataset.is_empty() || results.is_empty() {
        return 0.0;
    }
    let voters = results.len() as f64;
    let sum: f64 = dataset
        .iter()
        .map(|example| {
            let positive = results
                .iter()
                .filter(|r| r.rule().predict(example) == Label::Positive)
                .count() as f64;
            binary_entropy(positive / voters)
        })
        .sum();
    sum / dataset.len() as f64
}

fn binary_entropy(p: f64) -> f64 {
    if p <= 0.0 || p >= 1.0 {
        return 0.0;
    }
    -(p * p.log2() + (1.0 - p) * (1.0 - p).log2())
}
