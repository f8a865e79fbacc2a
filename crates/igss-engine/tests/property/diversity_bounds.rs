//! Property tests: diversity is an entropy in bits, bounded by [0, 1].

use igss_engine::{
    diversity, Condition, Coverage, Dataset, DatasetBuilder, Label, Rule, RuleResult, UtilityKind,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

const VALUES: [&str; 4] = ["a", "b", "c", "d"];

fn dataset(values: &[usize]) -> Dataset {
    let mut b = DatasetBuilder::new(["v"]);
    b.declare_values("v", &VALUES).unwrap();
    for (i, &v) in values.iter().enumerate() {
        let label = if i % 2 == 0 { Label::Positive } else { Label::Negative };
        b.push_row(&[VALUES[v]], label).unwrap();
    }
    b.build().unwrap()
}

fn result(value: usize, positive: bool) -> RuleResult {
    let label = if positive { Label::Positive } else { Label::Negative };
    RuleResult::new(
        Rule::single(Condition::new(0, value), label),
        Coverage::new(0.0, 0.0, label),
        0.0,
        0.0,
        0.0,
        0.0,
        UtilityKind::Wracc,
    )
}

fn arb_results() -> impl Strategy<Value = Vec<(usize, bool)>> {
    prop::collection::vec((0usize..4, any::<bool>()), 1..12)
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Diversity always lies in [0, 1].
    #[test]
    fn diversity_is_bounded(
        values in prop::collection::vec(0usize..4, 1..40),
        drawn in arb_results(),
    ) {
        let ds = dataset(&values);
        let results: Vec<_> = drawn.iter().map(|&(v, p)| result(v, p)).collect();
        let d = diversity(&ds, &results);
        prop_assert!((0.0..=1.0 + 1e-12).contains(&d), "diversity {}", d);
    }

    /// Copies of one rule never disagree.
    #[test]
    fn identical_rules_have_zero_diversity(
        values in prop::collection::vec(0usize..4, 1..40),
        value in 0usize..4,
        positive in any::<bool>(),
        copies in 1usize..8,
    ) {
        let ds = dataset(&values);
        let results: Vec<_> = (0..copies).map(|_| result(value, positive)).collect();
        prop_assert_eq!(diversity(&ds, &results), 0.0);
    }

    /// A rule paired with its mirror image splits every vote evenly.
    #[test]
    fn mirrored_pairs_have_full_diversity(
        values in prop::collection::vec(0usize..4, 1..40),
        value in 0usize..4,
        pairs in 1usize..5,
    ) {
        let ds = dataset(&values);
        let results: Vec<_> = (0..pairs)
            .flat_map(|_| [result(value, true), result(value, false)])
            .collect();
        prop_assert!((diversity(&ds, &results) - 1.0).abs() < 1e-12);
    }
}
