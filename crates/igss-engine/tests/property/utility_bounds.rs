//! Property tests: utility scores and confidence radii behave monotonically.

use igss_engine::{Coverage, DeltaBudget, Label, Priors, UtilityFunction, UtilityKind};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn arb_kind() -> impl Strategy<Value = UtilityKind> {
    prop_oneof![
        Just(UtilityKind::Accuracy),
        Just(UtilityKind::Linear),
        Just(UtilityKind::Squared),
        Just(UtilityKind::Binomial),
        Just(UtilityKind::Wracc),
    ]
}

fn arb_label() -> impl Strategy<Value = Label> {
    prop_oneof![Just(Label::Positive), Just(Label::Negative)]
}

fn function(kind: UtilityKind, prior: f64) -> UtilityFunction {
    // Normal regime throughout, so the Binomial radius is a smooth function
    // of the counts.
    UtilityFunction::new(kind, Priors::new(prior).unwrap()).with_large_threshold(0.0)
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// More correctly covered weight never lowers the utility.
    #[test]
    fn utility_monotone_in_positive_weight(
        kind in arb_kind(),
        label in arb_label(),
        prior in 0.05f64..0.95,
        total in 10.0f64..10_000.0,
        pos_frac in 0.0f64..1.0,
        cov_frac in 0.01f64..1.0,
        k1_frac in 0.0f64..1.0,
        k2_frac in 0.0f64..1.0,
    ) {
        let f = function(kind, prior);
        let covered = total * cov_frac;
        let (lo, hi) = if k1_frac <= k2_frac { (k1_frac, k2_frac) } else { (k2_frac, k1_frac) };
        let low = Coverage::new(covered, covered * lo, label);
        let high = Coverage::new(covered, covered * hi, label);
        let total_positive = total * pos_frac;
        let u_low = f.utility(total, total_positive, &low);
        let u_high = f.utility(total, total_positive, &high);
        prop_assert!(u_high >= u_low - 1e-12, "{}: {} < {}", kind, u_high, u_low);
    }

    /// With coverage ratios fixed, a larger sample never widens the radius.
    #[test]
    fn radius_shrinks_with_total_weight(
        kind in arb_kind(),
        label in arb_label(),
        prior in 0.05f64..0.95,
        total in 50.0f64..5_000.0,
        growth in 1.0f64..20.0,
        cov_frac in 0.05f64..1.0,
        hit_frac in 0.0f64..1.0,
        delta in 0.001f64..0.5,
    ) {
        let f = function(kind, prior);
        let radius = |m: f64| {
            let covered = m * cov_frac;
            let cov = Coverage::new(covered, covered * hit_frac, label);
            f.confidence_radius(m, m / 2.0, &cov, delta)
        };
        let small = radius(total);
        let large = radius(total * growth);
        prop_assert!(large <= small + 1e-9, "{}: {} > {}", kind, large, small);
    }

    /// The pruning bound never falls below the point utility.
    #[test]
    fn upper_bound_dominates_utility(
        kind in arb_kind(),
        label in arb_label(),
        prior in 0.05f64..0.95,
        total in 1.0f64..10_000.0,
        pos_frac in 0.0f64..1.0,
        cov_frac in 0.0f64..1.0,
        hit_frac in 0.0f64..1.0,
    ) {
        let f = function(kind, prior);
        let covered = total * cov_frac;
        let cov = Coverage::new(covered, covered * hit_frac, label);
        let total_positive = total * pos_frac;
        let u = f.utility(total, total_positive, &cov);
        let ub = f.upper_bound(total, total_positive, &cov, 0.05);
        prop_assert!(ub >= u - 1e-12, "{}: bound {} < utility {}", kind, ub, u);
    }

    /// Allotting every round never consumes more than the initial delta.
    #[test]
    fn budget_never_overdrawn(delta in 0.001f64..0.999, rounds in 1usize..50) {
        let mut budget = DeltaBudget::new(delta);
        for i in 0..rounds {
            let a = budget.allot_round(rounds - i).unwrap();
            prop_assert!(a.selection > 0.0 && a.pruning > 0.0);
            prop_assert!(budget.consumed() <= delta + 1e-12);
        }
        prop_assert!(budget.remaining() >= 0.0);
    }
}
