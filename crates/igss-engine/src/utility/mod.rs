//! Utility functions: scores and confidence bounds for rule hypotheses.
//!
//! Notation used throughout: `m` total sampled weight, `P` sampled weight of
//! positive examples, `c` weight covered by the rule, `k` covered weight whose
//! label equals the rule's prediction, `p0` prior of the predicted class.
//!
//! | Kind     | Utility                    | Radius                          |
//! |----------|----------------------------|---------------------------------|
//! | Accuracy | accuracy of the rule       | `sqrt(ln(2/δ)/(2m))`            |
//! | Linear   | `g·(p − p0)`               | `sqrt(ln(2/δ)/(2m))`            |
//! | Squared  | `g²·(p − p0)`              | `2·sqrt(ln(4/δ)/(2m))`          |
//! | WRAcc    | `g·(p − p̂0)`               | `3·sqrt(ln(6/δ)/(2m))`          |
//! | Binomial | `sqrt(g)·(p − p0)`         | propagated interval on g and p  |
//!
//! with `g = c/m` and `p = k/c`. Empty statistics produce sentinels: utility
//! 0 and radius [`MAX_RADIUS`].

pub mod bounds;

use igss_types::{Label, Priors};
use serde::{Deserialize, Serialize};

use crate::config::{UtilityKind, DEFAULT_BINOMIAL_LARGE_THRESHOLD};

/// Radius reported when nothing has been sampled.
pub const MAX_RADIUS: f64 = 1.0;

/// Counter snapshot of one hypothesis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    /// Sampled weight covered by the rule.
    pub covered: f64,
    /// Covered weight whose label equals the prediction.
    pub positive: f64,
    /// Class the rule predicts.
    pub prediction: Label,
}

impl Coverage {
    pub fn new(covered: f64, positive: f64, prediction: Label) -> Self {
        Self {
            covered,
            positive,
            prediction,
        }
    }

    /// Covered weight whose label differs from the prediction.
    pub fn negative(&self) -> f64 {
        (self.covered - self.positive).max(0.0)
    }

    /// Fraction of the covered weight that is predicted correctly.
    pub fn precision(&self) -> f64 {
        if self.covered <= 0.0 {
            0.0
        } else {
            self.positive / self.covered
        }
    }
}

/// A utility function bound to the run's priors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UtilityFunction {
    kind: UtilityKind,
    priors: Priors,
    large_threshold: f64,
}

impl UtilityFunction {
    pub fn new(kind: UtilityKind, priors: Priors) -> Self {
        Self {
            kind,
            priors,
            large_threshold: DEFAULT_BINOMIAL_LARGE_THRESHOLD,
        }
    }

    /// Coverage above which the Binomial radius uses the normal approximation.
    pub fn with_large_threshold(mut self, threshold: f64) -> Self {
        self.large_threshold = threshold;
        self
    }

    pub fn kind(&self) -> UtilityKind {
        self.kind
    }

    pub fn priors(&self) -> Priors {
        self.priors
    }

    /// Same priors and threshold, different kind.
    pub fn with_kind(&self, kind: UtilityKind) -> Self {
        Self { kind, ..*self }
    }

    /// Point estimate of the hypothesis's utility.
    pub fn utility(&self, total: f64, total_positive: f64, cov: &Coverage) -> f64 {
        if total <= 0.0 {
            return 0.0;
        }
        let m = total;
        let c = cov.covered.max(0.0);
        let k = cov.positive.clamp(0.0, c);
        let p0 = self.priors.of(cov.prediction);
        match self.kind {
            UtilityKind::Accuracy => {
                let label_total = label_weight(total, total_positive, cov.prediction);
                // correct = covered hits + uncovered examples of the other class
                let correct = k + (m - label_total) - (c - k);
                (correct / m).clamp(0.0, 1.0)
            }
            UtilityKind::Linear => (k - p0 * c) / m,
            UtilityKind::Squared => c * (k - p0 * c) / (m * m),
            UtilityKind::Wracc => {
                let label_total = label_weight(total, total_positive, cov.prediction);
                (k - c * label_total / m) / m
            }
            UtilityKind::Binomial => {
                if c <= 0.0 {
                    return 0.0;
                }
                (c / m).sqrt() * (k / c - p0)
            }
        }
    }

    /// Half-width of the interval bounding the true utility with
    /// probability at least `1 − delta`.
    pub fn confidence_radius(
        &self,
        total: f64,
        total_positive: f64,
        cov: &Coverage,
        delta: f64,
    ) -> f64 {
        if total <= 0.0 {
            return MAX_RADIUS;
        }
        match self.kind {
            UtilityKind::Binomial => self.binomial_radius(total, total_positive, cov, delta),
            _ => self.global_radius(total, delta),
        }
    }

    /// Optimistic bound used for pruning: the utility of the best conceivable
    /// specialization plus the radius.
    pub fn upper_bound(&self, total: f64, total_positive: f64, cov: &Coverage, delta: f64) -> f64 {
        if total <= 0.0 {
            return f64::INFINITY;
        }
        let m = total;
        let c = cov.covered.max(0.0);
        let k = cov.positive.clamp(0.0, c);
        let p0 = self.priors.of(cov.prediction);
        let best = match self.kind {
            UtilityKind::Accuracy => {
                let label_total = label_weight(total, total_positive, cov.prediction);
                (k + m - label_total) / m
            }
            UtilityKind::Linear => k * (1.0 - p0) / m,
            UtilityKind::Squared => {
                // c·(k − p0·c) is concave in c; its maximum over [k, c] is at
                // the clamped vertex.
                let vertex = if p0 > 0.0 { k / (2.0 * p0) } else { c };
                let c_star = vertex.clamp(k, c.max(k));
                c_star * (k - p0 * c_star) / (m * m)
            }
            UtilityKind::Wracc => {
                let label_total = label_weight(total, total_positive, cov.prediction);
                k * (1.0 - label_total / m) / m
            }
            UtilityKind::Binomial => (k / m).sqrt() * (1.0 - p0),
        };
        best + self.global_radius(total, delta)
    }

    /// Hypothesis-independent radius; the inverse of [`calculate_m`].
    ///
    /// [`calculate_m`]: UtilityFunction::calculate_m
    pub fn global_radius(&self, total: f64, delta: f64) -> f64 {
        if total <= 0.0 {
            return MAX_RADIUS;
        }
        let m = total;
        match self.kind {
            UtilityKind::Accuracy | UtilityKind::Linear => hoeffding(2.0, delta, m),
            UtilityKind::Squared => 2.0 * hoeffding(4.0, delta, m),
            UtilityKind::Wracc => 3.0 * hoeffding(6.0, delta, m),
            UtilityKind::Binomial => bounds::normal_quantile(1.0 - delta / 4.0) / m.sqrt(),
        }
    }

    /// Total weight after which [`global_radius`] drops to `epsilon`.
    ///
    /// [`global_radius`]: UtilityFunction::global_radius
    pub fn calculate_m(&self, delta: f64, epsilon: f64) -> f64 {
        let e2 = epsilon * epsilon;
        match self.kind {
            UtilityKind::Accuracy | UtilityKind::Linear => (2.0 / delta).ln() / (2.0 * e2),
            UtilityKind::Squared => 2.0 * (4.0 / delta).ln() / e2,
            UtilityKind::Wracc => 9.0 * (6.0 / delta).ln() / (2.0 * e2),
            UtilityKind::Binomial => {
                let z = bounds::normal_quantile(1.0 - delta / 4.0);
                (z / epsilon).powi(2)
            }
        }
    }

    /// Interval propagation: a Hoeffding interval on the coverage fraction
    /// and a binomial interval on the precision, each at `delta/2`; the
    /// radius is the largest deviation of `sqrt(g')·(p' − p0)` from the
    /// point estimate over the interval corners.
    fn binomial_radius(&self, total: f64, total_positive: f64, cov: &Coverage, delta: f64) -> f64 {
        let c = cov.covered.max(0.0);
        if c <= 0.0 {
            return MAX_RADIUS;
        }
        let m = total;
        let k = cov.positive.clamp(0.0, c);
        let p0 = self.priors.of(cov.prediction);
        let u = self.utility(total, total_positive, cov);

        let g = c / m;
        let eg = hoeffding(2.0, delta / 2.0, m);
        let (g_lo, g_hi) = ((g - eg).max(0.0), (g + eg).min(1.0));

        let (p_lo, p_hi) = if c <= self.large_threshold {
            bounds::clopper_pearson(k, c, delta / 2.0)
        } else {
            let floor = (0.5 / c).min(0.5);
            let p = (k / c).clamp(floor, 1.0 - floor);
            let z = bounds::normal_quantile(1.0 - delta / 4.0);
            let ep = z * (p * (1.0 - p) / c).sqrt();
            ((k / c - ep).max(0.0), (k / c + ep).min(1.0))
        };

        [g_lo, g_hi]
            .iter()
            .flat_map(|g| [p_lo, p_hi].map(|p| g.sqrt() * (p - p0)))
            .map(|corner| (corner - u).abs())
            .fold(0.0, f64::max)
    }
}

/// Sampled weight of the predicted class.
fn label_weight(total: f64, total_positive: f64, prediction: Label) -> f64 {
    let positive = total_positive.clamp(0.0, total);
    match prediction {
        Label::Positive => positive,
        Label::Negative => total - positive,
    }
}

/// `sqrt(ln(factor/δ) / (2m))`
fn hoeffding(factor: f64, delta: f64, m: f64) -> f64 {
    ((factor / delta).ln() / (2.0 * m)).sqrt()
}
