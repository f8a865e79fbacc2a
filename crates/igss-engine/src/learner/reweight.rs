//! Knowledge-based sampling: reweight examples so the ensemble-so-far
//! carries no information about the label under the new weights.
//!
//! Each weight is multiplied by `P(ŷ)·P(y) / C(ŷ, y)` from the weighted
//! contingency matrix of the current predictions. Cells with no mass leave
//! their examples untouched. Misclassified examples gain weight whenever the
//! ensemble is positively correlated with the label.

use igss_evaluation::ModelEvaluator;
use igss_types::{ContingencyMatrix, Dataset, EnsembleModel};
use tracing::debug;

use crate::error::EngineResult;

/// What a reweighting pass saw and did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReweightSummary {
    /// Matrix of the ensemble's predictions before reweighting.
    pub matrix: ContingencyMatrix,
    /// Maximum weight the dataset was divided by, when normalizing.
    pub divisor: Option<f64>,
}

pub fn reweight<E: ModelEvaluator + ?Sized>(
    evaluator: &E,
    model: &EnsembleModel,
    dataset: &mut Dataset,
    normalize: bool,
) -> EngineResult<ReweightSummary> {
    let predicted = evaluator.apply(model, dataset)?;
    let matrix = evaluator.contingency(dataset, &predicted)?;

    let factors: Vec<Option<f64>> = dataset
        .iter()
        .zip(&predicted)
        .map(|(example, &p)| matrix.independence_factor(p, example.label()))
        .collect();
    for (index, factor) in factors.into_iter().enumerate() {
        if let Some(f) = factor {
            let weight = dataset.examples()[index].weight() * f;
            dataset.set_weight(index, weight)?;
        }
    }

    let divisor = normalize.then(|| dataset.normalize_weights());
    debug!(
        accuracy = matrix.accuracy(),
        total_weight = dataset.total_weight(),
        ?divisor,
        "reweighted examples"
    );
    Ok(ReweightSummary { matrix, divisor })
}
