//! IGSS Evaluation - model application and contingency tabulation
//!
//! The rule-discovery engine never predicts on its own: applying a model to a
//! dataset and tabulating predictions against labels are delegated to a
//! `ModelEvaluator`. `LocalEvaluator` is the in-process implementation.
//! Errors raised here are passed through the engine unchanged.

#![deny(unsafe_code)]

use igss_types::{ContingencyMatrix, Dataset, EnsembleModel, Label, Rule, TypesError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Prediction and evaluation service used by the learner.
pub trait ModelEvaluator {
    /// Predict a label for every example of the dataset, in order.
    fn apply(&self, model: &EnsembleModel, dataset: &Dataset) -> EvaluationResult<Vec<Label>>;

    /// Predict with a single rule read as a two-class classifier: covered
    /// examples get its prediction, uncovered ones the other label.
    fn apply_rule(&self, rule: &Rule, dataset: &Dataset) -> EvaluationResult<Vec<Label>> {
        if dataset.is_empty() {
            return Err(EvaluationError::EmptyDataset);
        }
        Ok(dataset.iter().map(|e| rule.predict(e)).collect())
    }

    /// Weighted, normalized contingency matrix of `predicted` vs. the
    /// dataset's true labels under the dataset's current weights.
    fn contingency(
        &self,
        dataset: &Dataset,
        predicted: &[Label],
    ) -> EvaluationResult<ContingencyMatrix>;

    /// Apply and tabulate in one step.
    fn evaluate(&self, model: &EnsembleModel, dataset: &Dataset) -> EvaluationResult<EvaluationSummary> {
        let predicted = self.apply(model, dataset)?;
        let matrix = self.contingency(dataset, &predicted)?;
        let hits = predicted
            .iter()
            .zip(dataset.iter())
            .filter(|(p, e)| **p == e.label())
            .count();
        Ok(EvaluationSummary {
            matrix,
            weighted_accuracy: matrix.accuracy(),
            accuracy: hits as f64 / dataset.len().max(1) as f64,
            examples: dataset.len(),
        })
    }
}

/// Outcome of evaluating a model on a dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    /// Normalized weighted contingency matrix.
    pub matrix: ContingencyMatrix,
    /// Accuracy under the current example weights.
    pub weighted_accuracy: f64,
    /// Unweighted accuracy.
    pub accuracy: f64,
    /// Number of examples evaluated.
    pub examples: usize,
}

/// In-process evaluator backed by `EnsembleModel::predict`.
#[derive(Clone, Debug, Default)]
pub struct LocalEvaluator;

impl LocalEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl ModelEvaluator for LocalEvaluator {
    fn apply(&self, model: &EnsembleModel, dataset: &Dataset) -> EvaluationResult<Vec<Label>> {
        if dataset.is_empty() {
            return Err(EvaluationError::EmptyDataset);
        }
        let predicted: Vec<Label> = dataset.iter().map(|e| model.predict(e)).collect();
        debug!(
            members = model.len(),
            examples = predicted.len(),
            positive = predicted.iter().filter(|l| l.is_positive()).count(),
            "applied ensemble"
        );
        Ok(predicted)
    }

    fn contingency(
        &self,
        dataset: &Dataset,
        predicted: &[Label],
    ) -> EvaluationResult<ContingencyMatrix> {
        if predicted.len() != dataset.len() {
            return Err(EvaluationError::PredictionCountMismatch {
                expected: dataset.len(),
                found: predicted.len(),
            });
        }
        let matrix =
            ContingencyMatrix::from_weighted(predicted, &dataset.labels(), &dataset.weights())?;
        if matrix.total() <= 0.0 {
            return Err(EvaluationError::NoWeight);
        }
        Ok(matrix)
    }
}

/// Evaluation errors
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("cannot evaluate on an empty dataset")]
    EmptyDataset,

    #[error("expected {expected} predictions, found {found}")]
    PredictionCountMismatch { expected: usize, found: usize },

    #[error("dataset carries no weight")]
    NoWeight,

    #[error("data model error: {0}")]
    Types(#[from] TypesError),

    #[error("evaluator unavailable: {0}")]
    Unavailable(String),
}

/// Result type for evaluation operations.
pub type EvaluationResult<T> = Result<T, EvaluationError>;
