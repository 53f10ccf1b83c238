//! # Random forests of regression trees
//!
//! A random forest averages many [regression trees](canopy_trees::RegressionTree), each trained
//! on a bootstrap sample of the training data and searching only a random subset of the features
//! at every split. Averaging these decorrelated trees reduces the variance of a single deep tree.
//!
//! This crate provides
//!
//! * [`RandomForestParams`] and the fitted [`RandomForestRegressor`];
//! * [`RandomForest`], an estimator which can be refitted and reports when it is used before
//!   the first fit;
//! * [`BootstrapSampler`], resampling rows with replacement;
//! * [`OrdinalScale`], mapping averaged predictions back onto a bounded answer scale.
//!
//! ## Example
//!
//! ```rust
//! use canopy::prelude::*;
//! use canopy_ensemble::{OrdinalScale, RandomForestParams};
//! use rand::{rngs::SmallRng, SeedableRng};
//!
//! let mut rng = SmallRng::seed_from_u64(42);
//! let (train, test) = canopy_datasets::generate::survey(300, 9, 0.3, &mut rng)
//!     .split_with_ratio(0.8);
//!
//! // Train a forest of 25 trees
//! let forest = RandomForestParams::new_fixed_rng(rng)
//!     .n_estimators(25)
//!     .max_depth(6)
//!     .fit(&train)
//!     .unwrap();
//!
//! // Predict answers on the five point scale
//! let answers = OrdinalScale::default().levels(&forest.predict(&test));
//! assert!(answers.iter().all(|&x| (1..=5).contains(&x)));
//! ```
//!
//! ## Reference
//!
//! * Breiman, L. (2001). Random Forests. Machine Learning, 45(1), 5-32.

mod bootstrap;
mod ordinal;
mod random_forest;

pub use bootstrap::*;
pub use ordinal::*;
pub use random_forest::*;
