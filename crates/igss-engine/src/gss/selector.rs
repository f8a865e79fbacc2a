//! Generalized sequential sampling over a hypothesis pool.
//!
//! ```text
//!   draw ──► accept? ──► apply to every hypothesis ──► checkpoint due?
//!                                                        │
//!          ┌─────────────────────────────────────────────┘
//!          ▼
//!   score live set ─► best-n / rest ─► promote (lower − maxRest.upper ≥ ε)
//!                                   └► prune   (upper < minBest.lower)
//!          │
//!          ▼
//!   n promoted | live ≤ n | global radius ≤ ε/2  ──► results
//! ```
//!
//! Every candidate gets `δ/(2|H|)`, split again over the
//! `⌈M/step⌉` checkpoints, where `M = calculate_m(δ/(2|H|), ε/2)`.
//! The global-radius exit is a heuristic: it stops once the sample is large
//! enough for the horizon `M`, not when each surviving pair is separated.

use std::time::{Duration, Instant};

use igss_types::Dataset;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::budget::{per_checkpoint, per_hypothesis};
use crate::config::{LearnerConfig, SamplingMode, DEFAULT_MAX_DRAWS, DEFAULT_STEP_SIZE};
use crate::error::{EngineError, EngineResult};
use crate::gss::best::BestSet;
use crate::gss::result::RuleResult;
use crate::hypothesis::{HypothesisId, HypothesisPool};
use crate::stop::StopHandle;
use crate::stream::ExampleStream;
use crate::utility::UtilityFunction;

/// Draws between wall-clock checks outside checkpoints.
const TIME_CHECK_INTERVAL: u64 = 1024;

/// Arguments of one selection.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionParams {
    /// Number of hypotheses to output.
    pub n: usize,
    pub delta: f64,
    pub epsilon: f64,
    pub step_size: f64,
    pub mode: SamplingMode,
    pub max_draws: u64,
    pub max_time: Option<Duration>,
}

impl SelectionParams {
    pub fn new(n: usize, delta: f64, epsilon: f64) -> Self {
        Self {
            n,
            delta,
            epsilon,
            step_size: DEFAULT_STEP_SIZE,
            mode: SamplingMode::Rejection,
            max_draws: DEFAULT_MAX_DRAWS,
            max_time: None,
        }
    }

    /// Selection arguments implied by a learner configuration.
    pub fn from_config(config: &LearnerConfig, n: usize, delta: f64) -> Self {
        Self {
            n,
            delta,
            epsilon: config.epsilon,
            step_size: config.step_size,
            mode: config.sampling_mode(),
            max_draws: config.max_draws,
            max_time: config.max_selection_time,
        }
    }

    fn validate(&self, candidates: usize) -> EngineResult<()> {
        if self.n == 0 {
            return Err(EngineError::InvalidArgument(
                "requested output count must be at least 1".into(),
            ));
        }
        if candidates < self.n {
            return Err(EngineError::InvalidArgument(format!(
                "{} candidates cannot yield {} results",
                candidates, self.n
            )));
        }
        if !(self.delta > 0.0 && self.delta < 1.0) {
            return Err(EngineError::InvalidArgument(format!(
                "delta must lie in (0, 1), got {}",
                self.delta
            )));
        }
        if !(self.epsilon > 0.0) || !(self.step_size > 0.0) {
            return Err(EngineError::InvalidArgument(
                "epsilon and step size must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// How a selection ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionExit {
    /// n hypotheses separated from the rest.
    Promoted,
    /// Pruning left no more live candidates than outputs still needed.
    LiveSetExhausted,
    /// The global radius fell to ε/2 first.
    Heuristic,
}

/// Outcome of one selection.
#[derive(Clone, Debug)]
pub struct Selection {
    pub results: Vec<RuleResult>,
    pub total_weight: f64,
    pub total_positive_weight: f64,
    pub draws: u64,
    pub checkpoints: u64,
    pub pruned: usize,
    pub exit: SelectionExit,
}

impl Selection {
    /// Highest-ranked result.
    pub fn best(&self) -> Option<&RuleResult> {
        self.results.first()
    }
}

#[derive(Clone, Copy, Debug)]
struct Scored {
    id: HypothesisId,
    utility: f64,
    radius: f64,
}

impl Scored {
    fn lower(&self) -> f64 {
        self.utility - self.radius
    }

    fn upper(&self) -> f64 {
        self.utility + self.radius
    }
}

/// Sequential selector bound to one utility function.
#[derive(Clone, Debug)]
pub struct SequentialSelector {
    utility: UtilityFunction,
    params: SelectionParams,
    stop: Option<StopHandle>,
}

impl SequentialSelector {
    pub fn new(utility: UtilityFunction, params: SelectionParams) -> Self {
        Self {
            utility,
            params,
            stop: None,
        }
    }

    /// Check this handle at every checkpoint.
    pub fn with_stop(mut self, stop: StopHandle) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn params(&self) -> &SelectionParams {
        &self.params
    }

    pub fn utility(&self) -> &UtilityFunction {
        &self.utility
    }

    /// Sample until up to `n` hypotheses of the pool are selected.
    ///
    /// The pool's counters are reset first and hold the round's statistics
    /// afterwards; no hypothesis is removed from the pool.
    pub fn select<R: Rng>(
        &self,
        pool: &mut HypothesisPool,
        dataset: &Dataset,
        rng: &mut R,
    ) -> EngineResult<Selection> {
        let p = &self.params;
        p.validate(pool.len())?;
        if dataset.is_empty() {
            return Err(EngineError::InvalidArgument("dataset is empty".into()));
        }

        let candidates = pool.len();
        let delta_h = per_hypothesis(p.delta, candidates);
        let horizon = self.utility.calculate_m(delta_h, p.epsilon / 2.0);
        let delta_cp = per_checkpoint(p.delta, candidates, horizon, p.step_size);

        debug!(
            candidates,
            n = p.n,
            utility = %self.utility.kind(),
            horizon,
            delta_checkpoint = delta_cp,
            "selection started"
        );

        pool.reset_all();
        let mut live: Vec<HypothesisId> = pool.ids().collect();
        let mut output: Vec<HypothesisId> = Vec::new();
        let mut pruned = 0usize;
        let mut total = 0.0_f64;
        let mut total_positive = 0.0_f64;
        let mut next_checkpoint = p.step_size;
        let mut checkpoints = 0u64;
        let started = Instant::now();
        let mut stream = ExampleStream::new(dataset, p.mode, rng);

        let exit = loop {
            if stream.draws() >= p.max_draws {
                warn!(draws = stream.draws(), total_weight = total, "draw cap reached");
                return Err(EngineError::SelectionDidNotConverge {
                    draws: stream.draws(),
                    total_weight: total,
                });
            }
            if stream.draws() % TIME_CHECK_INTERVAL == 0 {
                self.check_time(started, stream.draws(), total)?;
            }

            if let Some(draw) = stream.draw() {
                pool.apply_all(draw.example, draw.weight);
                total += draw.weight;
                if draw.example.label().is_positive() {
                    total_positive += draw.weight;
                }
            }
            if total < next_checkpoint {
                continue;
            }
            while next_checkpoint <= total {
                next_checkpoint += p.step_size;
            }
            checkpoints += 1;

            if self.stop.as_ref().is_some_and(StopHandle::is_stopped) {
                return Err(EngineError::Cancelled);
            }
            self.check_time(started, stream.draws(), total)?;

            if let Some(exit) = self.checkpoint(
                pool,
                &mut live,
                &mut output,
                &mut pruned,
                total,
                total_positive,
                delta_cp,
            ) {
                break exit;
            }

            debug!(
                checkpoint = checkpoints,
                total_weight = total,
                live = live.len(),
                output = output.len(),
                pruned,
                "checkpoint"
            );

            if self.utility.global_radius(total, delta_h) <= p.epsilon / 2.0 {
                let needed = p.n - output.len();
                let flushed = self.rank(pool, &live, total, total_positive, delta_cp);
                output.extend(flushed.iter().take(needed).map(|s| s.id));
                break SelectionExit::Heuristic;
            }
        };

        let heuristic_cap = (exit == SelectionExit::Heuristic).then_some(p.epsilon / 2.0);
        let results: Vec<RuleResult> = output
            .iter()
            .filter_map(|&id| pool.get(id))
            .map(|h| {
                let coverage = h.coverage();
                let utility = self.utility.utility(total, total_positive, &coverage);
                let mut radius =
                    self.utility
                        .confidence_radius(total, total_positive, &coverage, delta_cp);
                if let Some(cap) = heuristic_cap {
                    radius = radius.min(cap);
                }
                RuleResult::new(
                    h.rule().clone(),
                    coverage,
                    total,
                    total_positive,
                    utility,
                    radius,
                    self.utility.kind(),
                )
            })
            .collect();

        debug!(
            ?exit,
            draws = stream.draws(),
            total_weight = total,
            checkpoints,
            pruned,
            results = results.len(),
            "selection finished"
        );

        Ok(Selection {
            results,
            total_weight: total,
            total_positive_weight: total_positive,
            draws: stream.draws(),
            checkpoints,
            pruned,
            exit,
        })
    }

    fn check_time(&self, started: Instant, draws: u64, total: f64) -> EngineResult<()> {
        if let Some(limit) = self.params.max_time {
            if started.elapsed() > limit {
                warn!(draws, total_weight = total, ?limit, "selection time cap reached");
                return Err(EngineError::SelectionDidNotConverge {
                    draws,
                    total_weight: total,
                });
            }
        }
        Ok(())
    }

    /// Live hypotheses scored and sorted by descending utility.
    fn rank(
        &self,
        pool: &HypothesisPool,
        live: &[HypothesisId],
        total: f64,
        total_positive: f64,
        delta: f64,
    ) -> Vec<Scored> {
        let mut scored: Vec<Scored> = live
            .iter()
            .filter_map(|&id| pool.get(id).map(|h| (id, h.coverage())))
            .map(|(id, cov)| Scored {
                id,
                utility: self.utility.utility(total, total_positive, &cov),
                radius: self
                    .utility
                    .confidence_radius(total, total_positive, &cov, delta),
            })
            .collect();
        scored.sort_by(|a, b| b.utility.total_cmp(&a.utility).then(a.id.cmp(&b.id)));
        scored
    }

    /// Promote and prune until the live set is stable. Returns an exit
    /// reason when the selection is complete.
    #[allow(clippy::too_many_arguments)]
    fn checkpoint(
        &self,
        pool: &HypothesisPool,
        live: &mut Vec<HypothesisId>,
        output: &mut Vec<HypothesisId>,
        pruned: &mut usize,
        total: f64,
        total_positive: f64,
        delta: f64,
    ) -> Option<SelectionExit> {
        let n = self.params.n;
        let epsilon = self.params.epsilon;
        loop {
            if output.len() >= n {
                return Some(SelectionExit::Promoted);
            }
            let needed = n - output.len();
            if live.len() <= needed {
                output.append(live);
                return Some(SelectionExit::LiveSetExhausted);
            }

            let scored = self.rank(pool, live, total, total_positive, delta);
            let mut best = BestSet::new(needed);
            for s in &scored {
                best.insert(s.id, s.utility);
            }
            let (best_n, rest): (Vec<Scored>, Vec<Scored>) =
                scored.into_iter().partition(|s| best.contains(s.id));

            let min_best = best_n
                .iter()
                .min_by(|a, b| a.lower().total_cmp(&b.lower()))
                .copied();
            let max_rest = rest
                .iter()
                .max_by(|a, b| a.upper().total_cmp(&b.upper()))
                .copied();
            let (Some(min_best), Some(max_rest)) = (min_best, max_rest) else {
                return None;
            };

            let promote: Vec<HypothesisId> = best_n
                .iter()
                .filter(|s| s.lower() - max_rest.upper() >= epsilon)
                .map(|s| s.id)
                .collect();
            let prune: Vec<HypothesisId> = rest
                .iter()
                .filter(|s| s.upper() < min_best.lower())
                .map(|s| s.id)
                .collect();

            if promote.is_empty() && prune.is_empty() {
                return None;
            }
            for id in &promote {
                debug!(hypothesis = %id, "promoted");
            }
            *pruned += prune.len();
            live.retain(|id| !promote.contains(id) && !prune.contains(id));
            output.extend(promote);
        }
    }
}
