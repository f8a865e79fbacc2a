//! End-to-end test: a Binomial confirmation that finds a useful rule keeps
//! the complexity level without accepting anything, and runs at most once
//! per level.

use igss_engine::{
    IgssLearner, LearnerConfig, LocalEvaluator, RoundOutcome, Termination, UsefulnessCriterion,
    UtilityKind,
};

use crate::planted_rule::planted_dataset;

/// WRAcc tops out at 0.125 on the planted data, below the threshold, while
/// the Binomial score of `attr1 = A => positive` is about 0.21.
fn config() -> LearnerConfig {
    LearnerConfig {
        min_complexity: 1,
        max_complexity: 2,
        iterations: 3,
        utility: UtilityKind::Wracc,
        usefulness: UsefulnessCriterion::Utility,
        min_utility_useful: 0.15,
        use_binomial_confirmation: true,
        seed: 3,
        ..LearnerConfig::default()
    }
}

#[test]
fn confirmation_keeps_complexity_once_per_level() {
    let mut ds = planted_dataset();
    let before = ds.weights();
    let learner = IgssLearner::new(config(), LocalEvaluator::new()).unwrap();
    let out = learner.learn(&mut ds).unwrap();

    let rounds = &out.report.rounds;
    assert_eq!(rounds.len(), 3);

    assert_eq!(rounds[0].complexity, 1);
    assert_eq!(
        rounds[0].outcome,
        RoundOutcome::Confirmed {
            rule: "attr1 = A => positive".into()
        }
    );

    // The confirmation is spent at this level, so the next miss escalates.
    assert_eq!(rounds[1].complexity, 1);
    assert!(
        matches!(rounds[1].outcome, RoundOutcome::Escalated { to: 2, .. }),
        "{:?}",
        rounds[1].outcome
    );

    // A new level gets a fresh confirmation.
    assert_eq!(rounds[2].complexity, 2);
    assert!(
        matches!(rounds[2].outcome, RoundOutcome::Confirmed { .. }),
        "{:?}",
        rounds[2].outcome
    );

    // Confirmed rules never join the model or touch the weights.
    assert!(out.model.is_empty());
    assert!(out.results.is_empty());
    assert_eq!(ds.weights(), before);
    assert_eq!(out.report.termination, Some(Termination::Completed));
}

#[test]
fn confirmation_draws_no_extra_delta() {
    let mut ds = planted_dataset();
    let learner = IgssLearner::new(config(), LocalEvaluator::new()).unwrap();
    let out = learner.learn(&mut ds).unwrap();

    // Three allotments and nothing more, even with two confirmation passes.
    assert!((out.report.delta_consumed - 0.1).abs() < 1e-9);
    // Each confirmed round sampled twice: once per utility function.
    let escalated = &out.report.rounds[1];
    assert!(out.report.rounds[0].draws > escalated.draws);
}
