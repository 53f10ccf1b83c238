//! Utility functions for randomly generating datasets

use canopy::Dataset;
use ndarray::{s, Array1, Array2, Axis};
use ndarray_rand::{rand::Rng, rand_distr::Uniform, RandomExt};

/// Generates `n_samples` records with `n_features` features uniform in `[0, 1)`, where the
/// target only depends on the feature `informative`
///
/// The target is `low` for samples with `x[informative] <= 0.5` and `high` otherwise. All other
/// features are noise, which makes the dataset a best-case input for a single split.
///
/// ### Panics
///
/// If `informative` is not smaller than `n_features`
pub fn step(
    n_samples: usize,
    n_features: usize,
    informative: usize,
    (low, high): (f64, f64),
    rng: &mut impl Rng,
) -> Dataset<f64, f64> {
    assert!(
        informative < n_features,
        "informative feature {} out of range for {} features",
        informative,
        n_features
    );

    let records = Array2::random_using((n_samples, n_features), Uniform::new(0., 1.), rng);
    let targets = records
        .column(informative)
        .mapv(|x| if x <= 0.5 { low } else { high });

    Dataset::new(records, targets)
}

/// Generates `n_samples` survey responses with `n_questions` answers on a `1..=5` scale
///
/// The score of a respondent is the mean answer to the first (at most three) questions, shifted
/// by uniform noise in `[-noise, noise]` and clamped to `[1, 5]`. The remaining answers carry no
/// information about the score.
pub fn survey(
    n_samples: usize,
    n_questions: usize,
    noise: f64,
    rng: &mut impl Rng,
) -> Dataset<f64, f64> {
    let records = Array2::random_using(
        (n_samples, n_questions),
        Uniform::new_inclusive(1u8, 5),
        rng,
    )
    .mapv(f64::from);

    let n_informative = n_questions.min(3);
    let mut targets = records
        .slice(s![.., ..n_informative])
        .mean_axis(Axis(1))
        .unwrap_or_else(|| Array1::from_elem(n_samples, 3.));

    if noise > 0. {
        targets += &Array1::random_using(n_samples, Uniform::new_inclusive(-noise, noise), rng);
    }
    targets.mapv_inplace(|y| y.max(1.).min(5.));

    let feature_names = (0..n_questions)
        .map(|i| format!("question-{}", i + 1))
        .collect();

    Dataset::new(records, targets).with_feature_names(feature_names)
}
