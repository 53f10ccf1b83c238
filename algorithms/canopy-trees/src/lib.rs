//!
//! # Regression tree learning
//! `canopy-trees` provides a pure Rust implementation of CART-style regression trees.
//!
//! # The big picture
//!
//! `canopy-trees` is a crate in the `canopy` workspace, next to `canopy-ensemble` which averages
//! many of these trees into a random forest.
//!
//! A regression tree predicts a continuous target by learning simple decision rules inferred
//! from the data features. Every internal node compares a single feature against a threshold and
//! sends the sample either to its left or to its right subtree, every leaf predicts the mean
//! target of the training samples which ended up there.
//!
//! # Current state
//!
//! `canopy-trees` provides an [implementation](RegressionTree) of single-tree fitting for
//! regression. Thresholds are searched on a fixed grid of percentiles of each candidate feature
//! and only a random subset of the features is considered at each node, as controlled by
//! [`MaxFeatures`].
//!

mod regression_tree;

pub use regression_tree::*;

// Re-export the common Result alias for convenience
pub use canopy::error::Result;
