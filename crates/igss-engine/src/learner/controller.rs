//! The outer loop: one sequential selection per round, with complexity
//! escalation when a round finds nothing useful.
//!
//! ```text
//!   round i ──► reset counters ──► allot δ (2/3 select, 1/3 prune)
//!      │
//!      ▼
//!   select best (n = 1) ──► useful and new? ── yes ──► accept ──► KBS reweight
//!      │ no                                                  └──► or drop from pool
//!      ▼
//!   Binomial confirmation (once per level) ── useful ──► keep complexity
//!      │ not useful
//!      ▼
//!   below max? ── yes ──► prune, refine, reset tracker (and weights)
//!      │ no
//!      ▼
//!   forced? ── yes ──► next round
//!      │ no
//!      ▼
//!     stop
//! ```

use igss_evaluation::ModelEvaluator;
use igss_types::{Dataset, EnsembleBuilder, EnsembleModel, Label, Priors};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::budget::DeltaBudget;
use crate::config::{LearnerConfig, UtilityKind};
use crate::error::{EngineError, EngineResult};
use crate::gss::{RuleResult, Selection, SelectionParams, SequentialSelector};
use crate::hypothesis::HypothesisPool;
use crate::learner::report::{RoundOutcome, RoundRecord, RunReport, Termination};
use crate::learner::reweight::reweight;
use crate::learner::usefulness::{ComplexityTracker, UsefulnessTest};
use crate::results::ResultStore;
use crate::stop::StopHandle;
use crate::utility::UtilityFunction;

/// Everything a run produces.
#[derive(Clone, Debug)]
pub struct LearnerOutput {
    pub model: EnsembleModel,
    pub results: ResultStore,
    pub report: RunReport,
}

/// Iterating sequential-sampling rule learner.
pub struct IgssLearner<E: ModelEvaluator> {
    config: LearnerConfig,
    evaluator: E,
    stop: StopHandle,
}

impl<E: ModelEvaluator> IgssLearner<E> {
    /// Create a learner; the configuration is validated here.
    pub fn new(config: LearnerConfig, evaluator: E) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            evaluator,
            stop: StopHandle::new(),
        })
    }

    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Handle that cancels a running `learn` at the next round or checkpoint.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Learn an ensemble from the dataset. Example weights are rewritten
    /// between rounds when KBS or weight resets are enabled.
    pub fn learn(&self, dataset: &mut Dataset) -> EngineResult<LearnerOutput> {
        let cfg = &self.config;
        let priors = Priors::from_dataset(dataset)?;
        let base = UtilityFunction::new(cfg.utility, priors)
            .with_large_threshold(cfg.binomial_large_threshold);
        let usefulness = UsefulnessTest::from_config(cfg);

        let mut rng = StdRng::seed_from_u64(cfg.seed);
        let mut budget = DeltaBudget::new(cfg.delta);
        let mut complexity = cfg.min_complexity;
        let mut pool = HypothesisPool::seed(dataset, complexity);
        let mut tracker = ComplexityTracker::new();
        let mut ensemble = EnsembleBuilder::new();
        let mut store = ResultStore::new(priors);
        let mut report = RunReport::start();
        let mut termination = Termination::Completed;

        info!(
            run = %report.run_id,
            examples = dataset.len(),
            attributes = dataset.attributes().len(),
            prior_positive = priors.positive(),
            utility = %cfg.utility,
            epsilon = cfg.epsilon,
            delta = cfg.delta,
            "learning started"
        );

        for round in 0..cfg.iterations {
            if self.stop.is_stopped() {
                warn!(run = %report.run_id, round, "learning cancelled");
                return Err(EngineError::Cancelled);
            }
            if pool.is_empty() {
                warn!(run = %report.run_id, round, complexity, "no candidates left");
                termination = Termination::PoolExhausted;
                break;
            }

            pool.reset_all();
            let candidates = pool.len();
            let allotment = budget.allot_round(cfg.iterations - round)?;
            let params = SelectionParams::from_config(cfg, 1, allotment.selection);

            let selection = self.select(base, params.clone(), &mut pool, dataset, &mut rng)?;
            let tentative = selection.best().map(RuleResult::tentative_matrix);
            if let Some(matrix) = &tentative {
                debug!(
                    round,
                    sample_accuracy = matrix.accuracy(),
                    predicted_positive = matrix.predicted_marginal(Label::Positive),
                    "tentative matrix"
                );
            }
            let mut record = RoundRecord {
                round,
                complexity,
                utility: base.kind(),
                candidates,
                total_weight: selection.total_weight,
                draws: selection.draws,
                exit: selection.exit,
                outcome: RoundOutcome::Skipped,
                tentative,
                weight_divisor: None,
            };

            if let Some(best) = self.useful_candidate(&selection, &usefulness, &tracker, &ensemble)
            {
                let best = best.clone();
                self.accept(
                    &best,
                    &selection,
                    dataset,
                    &mut pool,
                    &mut ensemble,
                    &mut store,
                    &mut tracker,
                    priors,
                    &mut record,
                )?;
                report.record(record);
                continue;
            }

            // Statistics the pool currently holds, for pruning.
            let mut totals = (selection.total_weight, selection.total_positive_weight);

            if cfg.use_binomial_confirmation && !tracker.confirmation_used() {
                tracker.mark_confirmation_used();
                let confirmation = self.select(
                    base.with_kind(UtilityKind::Binomial),
                    params,
                    &mut pool,
                    dataset,
                    &mut rng,
                )?;
                record.draws += confirmation.draws;
                totals = (confirmation.total_weight, confirmation.total_positive_weight);
                if let Some(confirmed) =
                    self.useful_candidate(&confirmation, &usefulness, &tracker, &ensemble)
                {
                    debug!(
                        round,
                        complexity,
                        rule = %confirmed.rule(),
                        "binomial confirmation keeps complexity"
                    );
                    record.outcome = RoundOutcome::Confirmed {
                        rule: confirmed.rule().describe(dataset.attributes()),
                    };
                    report.record(record);
                    continue;
                }
            }

            if complexity < cfg.max_complexity {
                complexity += 1;
                let before = pool.len();
                let delta = allotment.pruning / before.max(1) as f64;
                let pruned = pool.retain(|h| {
                    base.upper_bound(totals.0, totals.1, &h.coverage(), delta)
                        >= cfg.min_utility_pruning
                });
                pool.refine_all(dataset.attributes());
                tracker.reset();
                if cfg.reset_weights_on_escalation {
                    dataset.reset_weights();
                }
                info!(
                    run = %report.run_id,
                    round,
                    complexity,
                    pruned,
                    pool = pool.len(),
                    "complexity escalated"
                );
                record.outcome = RoundOutcome::Escalated {
                    to: complexity,
                    pruned,
                    pool: pool.len(),
                };
                report.record(record);
            } else if cfg.force_iterations {
                debug!(round, complexity, "nothing useful at max complexity, continuing");
                report.record(record);
            } else {
                warn!(
                    run = %report.run_id,
                    round,
                    complexity,
                    "nothing useful at max complexity, stopping early"
                );
                record.outcome = RoundOutcome::Exhausted;
                report.record(record);
                termination = Termination::MaxComplexityExhausted;
                break;
            }
        }

        let model = ensemble.build(priors);
        report.finish(termination, budget.consumed());
        info!(
            run = %report.run_id,
            rules = model.len(),
            rounds = report.rounds.len(),
            draws = report.total_draws(),
            ?termination,
            "learning finished"
        );

        Ok(LearnerOutput {
            model,
            results: store,
            report,
        })
    }

    fn select(
        &self,
        utility: UtilityFunction,
        params: SelectionParams,
        pool: &mut HypothesisPool,
        dataset: &Dataset,
        rng: &mut StdRng,
    ) -> EngineResult<Selection> {
        SequentialSelector::new(utility, params)
            .with_stop(self.stop.clone())
            .select(pool, dataset, rng)
    }

    /// The selection's best result, if it passes the usefulness test and is
    /// not already in the ensemble.
    fn useful_candidate<'s>(
        &self,
        selection: &'s Selection,
        usefulness: &UsefulnessTest,
        tracker: &ComplexityTracker,
        ensemble: &EnsembleBuilder,
    ) -> Option<&'s RuleResult> {
        selection
            .best()
            .filter(|r| usefulness.is_useful(r, tracker) && !ensemble.contains(r.rule()))
    }

    /// Add the rule to the ensemble and update weights or the pool. The
    /// outcome and the KBS divisor are written into the round's record.
    #[allow(clippy::too_many_arguments)]
    fn accept(
        &self,
        best: &RuleResult,
        selection: &Selection,
        dataset: &mut Dataset,
        pool: &mut HypothesisPool,
        ensemble: &mut EnsembleBuilder,
        store: &mut ResultStore,
        tracker: &mut ComplexityTracker,
        priors: Priors,
        record: &mut RoundRecord,
    ) -> EngineResult<()> {
        let rule = best.rule().clone();
        let predicted = self.evaluator.apply_rule(&rule, dataset)?;
        let matrix = self.evaluator.contingency(dataset, &predicted)?;
        let description = rule.describe(dataset.attributes());

        info!(
            round = record.round,
            rule = %description,
            utility = best.utility(),
            radius = best.radius(),
            total_weight = selection.total_weight,
            "rule accepted"
        );

        ensemble.push(rule.clone(), matrix);
        tracker.record_accepted(selection.total_weight);
        store.push(best.clone());

        if self.config.use_kbs {
            let model = ensemble.build(priors);
            let summary = reweight(&self.evaluator, &model, dataset, self.config.normalize_weights)?;
            debug!(
                round = record.round,
                ensemble_accuracy = summary.matrix.accuracy(),
                "ensemble reweighted"
            );
            record.weight_divisor = summary.divisor;
        } else {
            pool.remove_rule(&rule);
        }

        record.outcome = RoundOutcome::Accepted {
            rule: description,
            utility: best.utility(),
        };
        Ok(())
    }
}
