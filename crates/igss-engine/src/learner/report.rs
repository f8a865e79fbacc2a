//! Run identifiers and per-round bookkeeping.

use chrono::{DateTime, Utc};
use igss_types::ContingencyMatrix;
use serde::{Deserialize, Serialize};

use crate::config::UtilityKind;
use crate::gss::SelectionExit;

/// Unique identifier for a learning run.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    /// Generate a new unique run ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "run:{}", self.0)
    }
}

/// What a round did with its best hypothesis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    /// The rule joined the ensemble.
    Accepted { rule: String, utility: f64 },
    /// The Binomial confirmation found a useful rule; complexity kept.
    Confirmed { rule: String },
    /// The pool moved to the next complexity level.
    Escalated { to: usize, pruned: usize, pool: usize },
    /// Nothing useful at max complexity; kept going because iterations are forced.
    Skipped,
    /// Nothing useful at max complexity; the run ended.
    Exhausted,
}

/// One round of the outer loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: usize,
    pub complexity: usize,
    pub utility: UtilityKind,
    pub candidates: usize,
    pub total_weight: f64,
    pub draws: u64,
    pub exit: SelectionExit,
    pub outcome: RoundOutcome,
    /// Sample matrix of the round's best hypothesis, read as a two-class
    /// classifier.
    pub tentative: Option<ContingencyMatrix>,
    /// Maximum weight the dataset was divided by after KBS reweighting.
    pub weight_divisor: Option<f64>,
}

/// Why the outer loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// All configured rounds ran.
    Completed,
    /// No useful rule remained at max complexity.
    MaxComplexityExhausted,
    /// The candidate pool became empty.
    PoolExhausted,
}

/// Summary of a learning run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub rounds: Vec<RoundRecord>,
    pub termination: Option<Termination>,
    /// Confidence mass consumed over the run.
    pub delta_consumed: f64,
}

impl RunReport {
    pub fn start() -> Self {
        Self {
            run_id: RunId::new(),
            started_at: Utc::now(),
            finished_at: None,
            rounds: Vec::new(),
            termination: None,
            delta_consumed: 0.0,
        }
    }

    pub fn record(&mut self, record: RoundRecord) {
        self.rounds.push(record);
    }

    pub fn finish(&mut self, termination: Termination, delta_consumed: f64) {
        self.finished_at = Some(Utc::now());
        self.termination = Some(termination);
        self.delta_consumed = delta_consumed;
    }

    /// Number of rounds that accepted a rule.
    pub fn accepted(&self) -> usize {
        self.rounds
            .iter()
            .filter(|r| matches!(r.outcome, RoundOutcome::Accepted { .. }))
            .count()
    }

    /// Total draws across all selections.
    pub fn total_draws(&self) -> u64 {
        self.rounds.iter().map(|r| r.draws).sum()
    }
}
