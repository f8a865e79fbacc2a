//! Weighted 2×2 contingency matrices over (predicted, actual) labels.

use serde::{Deserialize, Serialize};

use crate::dataset::Label;
use crate::error::{TypesError, TypesResult};

/// Additive smoothing applied to cells when computing lifts.
pub const LIFT_SMOOTHING: f64 = 1e-6;

/// Joint weight of predicted vs. actual labels, indexed `[predicted][actual]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContingencyMatrix {
    cells: [[f64; 2]; 2],
}

impl ContingencyMatrix {
    pub fn new(cells: [[f64; 2]; 2]) -> Self {
        Self { cells }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Tabulate predictions against labels under per-example weights, then
    /// normalize so the cells sum to one.
    pub fn from_weighted(
        predicted: &[Label],
        actual: &[Label],
        weights: &[f64],
    ) -> TypesResult<Self> {
        if predicted.len() != actual.len() {
            return Err(TypesError::LengthMismatch {
                left: predicted.len(),
                right: actual.len(),
            });
        }
        if weights.len() != actual.len() {
            return Err(TypesError::LengthMismatch {
                left: weights.len(),
                right: actual.len(),
            });
        }
        let mut m = Self::zero();
        for ((&p, &a), &w) in predicted.iter().zip(actual).zip(weights) {
            m.add(p, a, w);
        }
        Ok(m.normalized())
    }

    pub fn add(&mut self, predicted: Label, actual: Label, weight: f64) {
        self.cells[predicted.index()][actual.index()] += weight;
    }

    pub fn get(&self, predicted: Label, actual: Label) -> f64 {
        self.cells[predicted.index()][actual.index()]
    }

    pub fn cells(&self) -> [[f64; 2]; 2] {
        self.cells
    }

    pub fn total(&self) -> f64 {
        self.cells.iter().flatten().sum()
    }

    /// Copy scaled to unit mass; an empty matrix stays empty.
    pub fn normalized(&self) -> Self {
        let total = self.total();
        if total <= 0.0 {
            return *self;
        }
        let mut cells = self.cells;
        for row in &mut cells {
            for cell in row.iter_mut() {
                *cell /= total;
            }
        }
        Self { cells }
    }

    /// Row sum: mass predicted as `label`.
    pub fn predicted_marginal(&self, label: Label) -> f64 {
        self.cells[label.index()].iter().sum()
    }

    /// Column sum: mass whose true label is `label`.
    pub fn actual_marginal(&self, label: Label) -> f64 {
        self.cells[0][label.index()] + self.cells[1][label.index()]
    }

    /// Share of mass on the diagonal; 0 for an empty matrix.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total <= 0.0 {
            return 0.0;
        }
        (self.cells[0][0] + self.cells[1][1]) / total
    }

    /// Log lift of the row selected by `predicted`: the row's positive odds
    /// relative to the matrix's overall positive odds.
    pub fn log_lift(&self, predicted: Label) -> f64 {
        let row_pos = self.get(predicted, Label::Positive) + LIFT_SMOOTHING;
        let row_neg = self.get(predicted, Label::Negative) + LIFT_SMOOTHING;
        let col_pos = self.actual_marginal(Label::Positive) + LIFT_SMOOTHING;
        let col_neg = self.actual_marginal(Label::Negative) + LIFT_SMOOTHING;
        (row_pos / row_neg).ln() - (col_pos / col_neg).ln()
    }

    /// Factor `P(ŷ)·P(y) / P(ŷ, y)` that makes prediction and label
    /// independent after reweighting. `None` when the cell carries no mass.
    pub fn independence_factor(&self, predicted: Label, actual: Label) -> Option<f64> {
        let total = self.total();
        if total <= 0.0 {
            return None;
        }
        let joint = self.get(predicted, actual) / total;
        if joint <= 0.0 {
            return None;
        }
        let p_pred = self.predicted_marginal(predicted) / total;
        let p_act = self.actual_marginal(actual) / total;
        Some(p_pred * p_act / joint)
    }
}
