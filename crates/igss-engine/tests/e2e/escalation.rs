//! End-to-end test: complexity escalation on a target no single condition
//! explains (label = a XOR b).

use igss_engine::{
    Dataset, DatasetBuilder, IgssLearner, Label, LearnerConfig, LocalEvaluator, RoundOutcome,
    Termination, UtilityKind,
};

fn xor_dataset() -> Dataset {
    let mut b = DatasetBuilder::new(["a", "b"]);
    for (a, bv, label) in [
        ("0", "0", Label::Negative),
        ("0", "1", Label::Positive),
        ("1", "0", Label::Positive),
        ("1", "1", Label::Negative),
    ] {
        for _ in 0..50 {
            b.push_row(&[a, bv], label).unwrap();
        }
    }
    b.build().unwrap()
}

fn config() -> LearnerConfig {
    LearnerConfig {
        min_complexity: 1,
        max_complexity: 2,
        iterations: 3,
        utility: UtilityKind::Wracc,
        seed: 31,
        ..LearnerConfig::default()
    }
}

#[test]
fn conjunctions_found_after_escalation() {
    let mut ds = xor_dataset();
    let learner = IgssLearner::new(config(), LocalEvaluator::new()).unwrap();
    let out = learner.learn(&mut ds).unwrap();

    assert!(matches!(
        out.report.rounds[0].outcome,
        RoundOutcome::Escalated { to: 2, pruned: 0, pool: 8 }
    ));
    assert_eq!(out.report.rounds[0].complexity, 1);
    assert_eq!(out.report.rounds[1].complexity, 2);
    assert!(!out.model.is_empty());
    assert!(out.model.members().iter().all(|m| m.rule.complexity() == 2));
}

#[test]
fn confirmation_failure_escalates_in_the_same_round() {
    let mut ds = xor_dataset();
    let cfg = LearnerConfig {
        use_binomial_confirmation: true,
        ..config()
    };
    let learner = IgssLearner::new(cfg, LocalEvaluator::new()).unwrap();
    let out = learner.learn(&mut ds).unwrap();

    let first = &out.report.rounds[0];
    assert!(matches!(first.outcome, RoundOutcome::Escalated { to: 2, .. }));
    // both selections are counted
    assert!(first.draws > 0);
    assert_eq!(out.report.rounds[1].complexity, 2);
}

#[test]
fn max_complexity_without_useful_rule_stops_early() {
    let mut ds = xor_dataset();
    let cfg = LearnerConfig {
        max_complexity: 1,
        ..config()
    };
    let learner = IgssLearner::new(cfg, LocalEvaluator::new()).unwrap();
    let out = learner.learn(&mut ds).unwrap();

    assert!(out.model.is_empty());
    assert_eq!(out.report.rounds.len(), 1);
    assert_eq!(out.report.rounds[0].outcome, RoundOutcome::Exhausted);
    assert_eq!(out.report.termination, Some(Termination::MaxComplexityExhausted));
}

#[test]
fn forced_iterations_run_every_round() {
    let mut ds = xor_dataset();
    let cfg = LearnerConfig {
        max_complexity: 1,
        force_iterations: true,
        ..config()
    };
    let learner = IgssLearner::new(cfg, LocalEvaluator::new()).unwrap();
    let out = learner.learn(&mut ds).unwrap();

    assert_eq!(out.report.rounds.len(), 3);
    assert!(out
        .report
        .rounds
        .iter()
        .all(|r| r.outcome == RoundOutcome::Skipped));
    assert_eq!(out.report.termination, Some(Termination::Completed));
}

#[test]
fn weights_reset_on_escalation() {
    let mut ds = xor_dataset();
    let cfg = LearnerConfig {
        iterations: 1,
        reset_weights_on_escalation: true,
        ..config()
    };
    for i in 0..ds.len() {
        ds.set_weight(i, if i % 2 == 0 { 0.5 } else { 1.0 }).unwrap();
    }
    let learner = IgssLearner::new(cfg, LocalEvaluator::new()).unwrap();
    let out = learner.learn(&mut ds).unwrap();

    assert!(matches!(out.report.rounds[0].outcome, RoundOutcome::Escalated { .. }));
    assert!(ds.iter().all(|e| e.weight() == 1.0));
}
