//! Class priors, estimated once per dataset.

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Label};
use crate::error::{TypesError, TypesResult};

/// `P(positive)` and `P(negative)`; invariant for a learning run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Priors {
    positive: f64,
    negative: f64,
}

impl Priors {
    /// Build priors from the probability of the positive class.
    pub fn new(positive: f64) -> TypesResult<Self> {
        if !(positive > 0.0 && positive < 1.0) {
            return Err(TypesError::DegenerateClasses(format!(
                "positive prior {} outside (0, 1)",
                positive
            )));
        }
        Ok(Self {
            positive,
            negative: 1.0 - positive,
        })
    }

    /// Estimate priors from the dataset's current weights.
    pub fn from_dataset(dataset: &Dataset) -> TypesResult<Self> {
        let total = dataset.total_weight();
        if total <= 0.0 {
            return Err(TypesError::DegenerateClasses(
                "dataset carries no weight".into(),
            ));
        }
        let positive = dataset.label_weight(Label::Positive) / total;
        if positive <= 0.0 || positive >= 1.0 {
            return Err(TypesError::DegenerateClasses(format!(
                "only one class present (P(positive) = {})",
                positive
            )));
        }
        Ok(Self {
            positive,
            negative: 1.0 - positive,
        })
    }

    pub fn positive(&self) -> f64 {
        self.positive
    }

    pub fn negative(&self) -> f64 {
        self.negative
    }

    /// Prior of a specific label.
    pub fn of(&self, label: Label) -> f64 {
        match label {
            Label::Positive => self.positive,
            Label::Negative => self.negative,
        }
    }

    /// `ln(P(positive) / P(negative))`.
    pub fn log_odds(&self) -> f64 {
        (self.positive / self.negative).ln()
    }
}
