//! Confidence-mass accounting.
//!
//! The run starts with `delta` and every round takes a slice of what is
//! left: two thirds of its share for selection, one third for pruning.
//! Inside a selection the slice is split again by Bonferroni correction
//! across hypotheses and across checkpoints. Cumulative consumption never
//! exceeds the initial delta; over-draws are refused.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Slack tolerated when comparing consumed mass against the initial delta.
const BUDGET_TOLERANCE: f64 = 1e-12;

/// The two slices a round receives.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundAllotment {
    pub selection: f64,
    pub pruning: f64,
}

/// Depleting confidence budget.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeltaBudget {
    initial: f64,
    remaining: f64,
}

impl DeltaBudget {
    pub fn new(delta: f64) -> Self {
        Self {
            initial: delta,
            remaining: delta,
        }
    }

    pub fn initial(&self) -> f64 {
        self.initial
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    pub fn consumed(&self) -> f64 {
        self.initial - self.remaining
    }

    /// Take `amount` from the budget.
    pub fn consume(&mut self, amount: f64) -> EngineResult<()> {
        if !(amount >= 0.0) || amount > self.remaining + BUDGET_TOLERANCE {
            return Err(EngineError::BudgetExhausted {
                requested: amount,
                remaining: self.remaining,
            });
        }
        self.remaining = (self.remaining - amount).max(0.0);
        Ok(())
    }

    /// Allot and consume the slices of a round with `rounds_left` rounds
    /// remaining (this one included).
    pub fn allot_round(&mut self, rounds_left: usize) -> EngineResult<RoundAllotment> {
        if rounds_left == 0 {
            return Err(EngineError::BudgetExhausted {
                requested: self.remaining,
                remaining: self.remaining,
            });
        }
        let share = self.remaining / rounds_left as f64;
        let allotment = RoundAllotment {
            selection: 2.0 * share / 3.0,
            pruning: share / 3.0,
        };
        self.consume(allotment.selection + allotment.pruning)?;
        Ok(allotment)
    }
}

/// Confidence given to each hypothesis of a selection over `hypotheses` candidates.
pub fn per_hypothesis(delta: f64, hypotheses: usize) -> f64 {
    delta / (2.0 * hypotheses.max(1) as f64)
}

/// Confidence given to each checkpoint of a hypothesis, with `horizon` the
/// total weight after which the selection can stop and `step_size` the
/// checkpoint spacing.
pub fn per_checkpoint(delta: f64, hypotheses: usize, horizon: f64, step_size: f64) -> f64 {
    let checkpoints = (horizon / step_size).ceil().max(1.0);
    per_hypothesis(delta, hypotheses) / checkpoints
}
