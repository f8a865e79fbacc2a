//! End-to-end test: knowledge-based reweighting after an accepted rule.
//!
//! Misclassified examples must gain weight, and with normalization the
//! largest weight is exactly one.

use igss_engine::{IgssLearner, LearnerConfig, LocalEvaluator, UtilityKind};

use crate::planted_rule::planted_dataset;

fn config() -> LearnerConfig {
    LearnerConfig {
        min_complexity: 1,
        max_complexity: 1,
        iterations: 1,
        utility: UtilityKind::Wracc,
        use_kbs: true,
        seed: 77,
        ..LearnerConfig::default()
    }
}

#[test]
fn misclassified_examples_gain_weight() {
    let mut ds = planted_dataset();
    let before = ds.weights();
    let cfg = LearnerConfig {
        normalize_weights: false,
        rejection_sampling: false,
        ..config()
    };
    let learner = IgssLearner::new(cfg, LocalEvaluator::new()).unwrap();
    let out = learner.learn(&mut ds).unwrap();
    assert_eq!(out.model.len(), 1);

    let mut misclassified = 0;
    for (i, example) in ds.iter().enumerate() {
        if out.model.predict(example) != example.label() {
            misclassified += 1;
            assert!(
                example.weight() > before[i],
                "example {} weight {} did not grow",
                i,
                example.weight()
            );
        } else {
            assert!(example.weight() < before[i]);
        }
    }
    // 10 negatives under attr1 = A, 40 positives under attr1 = B
    assert_eq!(misclassified, 50);
}

#[test]
fn normalized_weights_peak_at_one() {
    let mut ds = planted_dataset();
    let learner = IgssLearner::new(config(), LocalEvaluator::new()).unwrap();
    learner.learn(&mut ds).unwrap();

    assert_eq!(ds.max_weight(), 1.0);
    assert!(ds.iter().all(|e| e.weight() > 0.0 && e.weight() <= 1.0));
}

#[test]
fn without_kbs_the_accepted_rule_leaves_the_pool() {
    let mut ds = planted_dataset();
    let before = ds.weights();
    let cfg = LearnerConfig {
        iterations: 2,
        use_kbs: false,
        ..config()
    };
    let learner = IgssLearner::new(cfg, LocalEvaluator::new()).unwrap();
    let out = learner.learn(&mut ds).unwrap();

    // Weights are untouched and no rule is accepted twice.
    assert_eq!(ds.weights(), before);
    let rules: Vec<_> = out.model.members().iter().map(|m| &m.rule).collect();
    assert!(!rules.is_empty());
    if rules.len() == 2 {
        assert_ne!(rules[0], rules[1]);
    }
}
