//! `canopy` provides the shared foundation for a small family of tree-based regression crates.
//!
//! The algorithms themselves live in their own crates:
//!
//! * [`canopy-trees`](../canopy_trees/index.html): a CART-style regression tree which splits
//!   nodes by minimising the weighted variance of the targets;
//! * [`canopy-ensemble`](../canopy_ensemble/index.html): a random forest which averages trees
//!   trained on bootstrap samples of the data.
//!
//! This crate contains what they have in common: the [`Dataset`] structure holding records and
//! targets, the [`Fit`](traits::Fit) and [`Predict`](traits::Predict) traits, checked
//! hyperparameters via [`ParamGuard`], a shared [`Error`](error::Error) type and the usual
//! [regression metrics](metrics::Regression).
//!
//! The models are trained on prepared numeric data. Cleaning, imputation and encoding of the
//! raw survey records happens before the data reaches this crate.

pub mod dataset;
pub mod error;
mod metrics_regression;
mod param_guard;
pub mod prelude;
pub mod traits;

#[cfg(feature = "benchmarks")]
pub mod benchmarks;

pub use dataset::{Dataset, DatasetBase, DatasetView, Float};
pub use param_guard::ParamGuard;

/// Common metrics functions for regression
pub mod metrics {
    pub use crate::metrics_regression::Regression;
}
