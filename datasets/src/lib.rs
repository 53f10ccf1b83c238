//! `canopy-datasets` provides small datasets ready to be used in tests, benchmarks and examples.
//!
//! ## Current State
//!
//! The following datasets are provided:
//!
//! * [`toy_survey`]: a handful of hand-written survey answers with a score in `1..=5`
//!
//! and, with the `generate` feature enabled, the random generators in [`generate`]:
//!
//! * [`generate::step`]: a target which jumps with a single informative feature
//! * [`generate::survey`]: ordinal answers with a score following the first questions
//!
//! ## Using a dataset
//!
//! Add the crate to your Cargo.toml with the corresponding feature enabled:
//! ```ignore
//! canopy-datasets = { version = "0.1.0", features = ["generate"] }
//! ```
//! and then use it in your example or tests as
//! ```ignore
//! let (train, valid) = canopy_datasets::toy_survey().split_with_ratio(0.75);
//! ```

use canopy::Dataset;
use ndarray::array;

#[cfg(feature = "generate")]
pub mod generate;

/// Twelve respondents answering four questions on a `1..=5` scale, together with their overall
/// score
pub fn toy_survey() -> Dataset<f64, f64> {
    let records = array![
        [5., 4., 5., 2.],
        [4., 4., 5., 3.],
        [5., 5., 4., 1.],
        [4., 5., 4., 2.],
        [3., 3., 3., 3.],
        [3., 2., 3., 4.],
        [2., 3., 3., 5.],
        [3., 3., 2., 3.],
        [1., 2., 1., 4.],
        [2., 1., 2., 5.],
        [1., 1., 2., 3.],
        [2., 2., 1., 4.],
    ];
    let targets = array![5., 4., 5., 4., 3., 3., 3., 3., 1., 2., 1., 2.];

    let feature_names = vec!["work", "health", "family", "stress"];

    Dataset::new(records, targets).with_feature_names(feature_names)
}
