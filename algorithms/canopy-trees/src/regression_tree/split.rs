//! Search for the best split of a node
//!
//! Instead of scanning every distinct value of a feature, the candidate thresholds of a feature
//! are the nine deciles of its values within the node. Each candidate is scored by the weighted
//! variance sum of the two partitions it produces.

use std::cmp::Ordering;

use canopy::Float;
use ndarray::{ArrayView1, ArrayView2};

/// Percentiles of the node's feature values which are tried as thresholds
pub(crate) const THRESHOLD_PERCENTILES: [f64; 9] =
    [10., 20., 30., 40., 50., 60., 70., 80., 90.];

/// Minimal number of samples on either side of an accepted split
const MIN_SAMPLES_PER_SIDE: usize = 2;

/// The best split found for a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SplitCandidate<F> {
    pub feature: usize,
    pub threshold: F,
    /// Weighted variance sum `var(left) * |left| + var(right) * |right|`
    pub score: F,
}

/// Computes the `q`-th percentile of ascending `sorted` values with linear interpolation
///
/// The value lies at the virtual index `q / 100 * (n - 1)` between its two neighbouring samples.
/// Interpolation starts from the closer neighbour, so that percentiles falling on a sample return
/// that sample exactly.
///
/// ### Panics
///
/// If `sorted` is empty
pub(crate) fn percentile<F: Float>(sorted: &[F], q: f64) -> F {
    let position = q / 100.0 * (sorted.len() - 1) as f64;
    let below = position.floor() as usize;
    let above = (below + 1).min(sorted.len() - 1);
    let gamma = position - below as f64;

    let (a, b) = (sorted[below], sorted[above]);
    let diff = b - a;

    if gamma >= 0.5 {
        b - diff * F::cast(1.0 - gamma)
    } else {
        a + diff * F::cast(gamma)
    }
}

/// Population variance of the given values, without Bessel correction
pub(crate) fn variance<F: Float>(values: &[F]) -> F {
    let n = F::cast(values.len());
    let mean = values.iter().copied().sum::<F>() / n;

    values
        .iter()
        .map(|&v| (v - mean) * (v - mean))
        .sum::<F>()
        / n
}

/// Weighted variance sum of a set of targets, the quantity a split minimises
pub(crate) fn weighted_variance<F: Float>(values: &[F]) -> F {
    variance(values) * F::cast(values.len())
}

/// Scratch space reused between the candidates of a node
pub(crate) struct SplitSearch<'a, F> {
    records: ArrayView2<'a, F>,
    targets: ArrayView1<'a, F>,
    feature_values: Vec<F>,
    left: Vec<F>,
    right: Vec<F>,
}

impl<'a, F: Float> SplitSearch<'a, F> {
    pub fn new(records: ArrayView2<'a, F>, targets: ArrayView1<'a, F>) -> Self {
        SplitSearch {
            records,
            targets,
            feature_values: Vec::new(),
            left: Vec::new(),
            right: Vec::new(),
        }
    }

    /// Finds the best `(feature, threshold)` pair for the samples in `rows`
    ///
    /// The features are visited in the given order and for each feature the thresholds in
    /// ascending percentile order. A candidate replaces the current best only if its score is
    /// strictly lower, so ties are won by the first candidate encountered. Returns `None` if no
    /// candidate leaves at least two samples on both sides.
    pub fn find_best(&mut self, rows: &[usize], features: &[usize]) -> Option<SplitCandidate<F>> {
        let mut best: Option<SplitCandidate<F>> = None;

        for &feature in features {
            let records = self.records;
            self.feature_values.clear();
            self.feature_values
                .extend(rows.iter().map(|&row| records[(row, feature)]));
            self.feature_values
                .sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

            for &q in THRESHOLD_PERCENTILES.iter() {
                let threshold = percentile(&self.feature_values, q);

                let score = match self.score(rows, feature, threshold) {
                    Some(score) => score,
                    None => continue,
                };

                best = match best.take() {
                    None => Some(SplitCandidate {
                        feature,
                        threshold,
                        score,
                    }),
                    Some(current) if score < current.score => Some(SplitCandidate {
                        feature,
                        threshold,
                        score,
                    }),
                    x => x,
                };
            }
        }

        best
    }

    /// Scores the partition `x[feature] <= threshold` of `rows`, `None` if a side is too small
    fn score(&mut self, rows: &[usize], feature: usize, threshold: F) -> Option<F> {
        self.left.clear();
        self.right.clear();

        for &row in rows {
            if self.records[(row, feature)] <= threshold {
                self.left.push(self.targets[row]);
            } else {
                self.right.push(self.targets[row]);
            }
        }

        if self.left.len() < MIN_SAMPLES_PER_SIDE || self.right.len() < MIN_SAMPLES_PER_SIDE {
            return None;
        }

        Some(weighted_variance(&self.left) + weighted_variance(&self.right))
    }
}
