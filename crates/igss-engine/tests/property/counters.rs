//! Property tests: hypothesis counters are a pure function of the replayed
//! example stream.

use igss_engine::{
    Condition, Dataset, DatasetBuilder, Hypothesis, HypothesisPool, Label, Rule,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

const VALUES: [&str; 3] = ["p", "q", "r"];

/// Rows of two three-valued attributes with a label and a weight.
fn arb_rows() -> impl Strategy<Value = Vec<(usize, usize, bool, f64)>> {
    prop::collection::vec((0usize..3, 0usize..3, any::<bool>(), 0.0f64..2.0), 1..60)
}

fn build(rows: &[(usize, usize, bool, f64)]) -> Dataset {
    let mut b = DatasetBuilder::new(["x", "y"]);
    b.declare_values("x", &VALUES).unwrap();
    b.declare_values("y", &VALUES).unwrap();
    for &(x, y, positive, weight) in rows {
        let label = if positive { Label::Positive } else { Label::Negative };
        b.push_weighted_row(&[VALUES[x], VALUES[y]], label, weight)
            .unwrap();
    }
    b.build().unwrap()
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// reset() followed by an identical replay reproduces identical counters.
    #[test]
    fn reset_then_replay_is_idempotent(
        rows in arb_rows(),
        replay in prop::collection::vec(0usize..1000, 1..200),
    ) {
        let ds = build(&rows);
        let mut pool = HypothesisPool::seed(&ds, 2);
        let play = |pool: &mut HypothesisPool| {
            for &i in &replay {
                let e = &ds.examples()[i % ds.len()];
                pool.apply_all(e, e.weight());
            }
            pool.iter().map(|(_, h)| h.coverage()).collect::<Vec<_>>()
        };
        let first = play(&mut pool);
        pool.reset_all();
        prop_assert!(pool.iter().all(|(_, h)| h.covered() == 0.0 && h.positive() == 0.0));
        let second = play(&mut pool);
        prop_assert_eq!(first, second);
    }

    /// Counters never report more matching weight than covered weight.
    #[test]
    fn positive_weight_bounded_by_coverage(rows in arb_rows(), x in 0usize..3, positive in any::<bool>()) {
        let ds = build(&rows);
        let label = if positive { Label::Positive } else { Label::Negative };
        let mut h = Hypothesis::new(Rule::single(Condition::new(0, x), label), 2);
        for e in ds.iter() {
            h.apply(e, e.weight());
        }
        prop_assert!(h.positive() <= h.covered() + 1e-12);
        let expected: f64 = ds.iter().filter(|e| e.value(0) == x).map(|e| e.weight()).sum();
        prop_assert!((h.covered() - expected).abs() < 1e-9);
    }
}
