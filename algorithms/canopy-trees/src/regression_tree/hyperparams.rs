use canopy::{
    error::{Error, Result},
    Float, ParamGuard,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::marker::PhantomData;

use crate::{MaxFeatures, RegressionTree};

/// The set of hyperparameters that can be specified for fitting a
/// [regression tree](struct.RegressionTree.html).
///
/// The random number generator is part of the hyperparameters: it drives the feature subsampling
/// at every node, so fitting twice with the same generator state yields the same tree.
///
/// ### Example
///
/// ```rust
/// use canopy::prelude::*;
/// use canopy_trees::{MaxFeatures, RegressionTree, RegressionTreeParams};
/// use ndarray::array;
/// use rand::{rngs::SmallRng, SeedableRng};
///
/// // Initialize the parameters with a seeded generator
/// let params = RegressionTreeParams::new_fixed_rng(SmallRng::seed_from_u64(42))
///     .max_depth(3)
///     .min_samples_split(2)
///     .max_features(MaxFeatures::All);
///
/// let dataset = Dataset::new(
///     array![[0.1], [0.2], [0.3], [0.4], [0.6], [0.7], [0.8], [0.9]],
///     array![1., 1., 1., 1., 5., 5., 5., 5.],
/// );
/// // Fit the regression tree on the training data
/// let tree = params.fit(&dataset).unwrap();
/// // Predict on the training data
/// assert_eq!(tree.predict(&dataset), array![1., 1., 1., 1., 5., 5., 5., 5.]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RegressionTreeValidParams<F, R> {
    max_depth: usize,
    min_samples_split: usize,
    max_features: MaxFeatures,
    rng: R,

    float_marker: PhantomData<F>,
}

impl<F: Float, R> RegressionTreeValidParams<F, R> {
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }

    pub fn max_features(&self) -> MaxFeatures {
        self.max_features
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RegressionTreeParams<F, R>(RegressionTreeValidParams<F, R>);

impl<F: Float> RegressionTreeParams<F, StdRng> {
    /// Creates the default parameters with a generator seeded from system entropy
    pub fn new() -> Self {
        Self::new_fixed_rng(StdRng::from_entropy())
    }
}

impl<F: Float, R: Rng + Clone> RegressionTreeParams<F, R> {
    /// Creates the default parameters driven by the given random number generator
    pub fn new_fixed_rng(rng: R) -> Self {
        Self(RegressionTreeValidParams {
            max_depth: 5,
            min_samples_split: 10,
            max_features: MaxFeatures::OneThird,
            rng,
            float_marker: PhantomData,
        })
    }

    /// Sets the limit to the depth of the regression tree, the root has depth zero
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.0.max_depth = max_depth;
        self
    }

    /// Sets the minimum number of samples required to split a node
    pub fn min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.0.min_samples_split = min_samples_split;
        self
    }

    /// Sets the number of features searched for the best split of a node
    pub fn max_features(mut self, max_features: MaxFeatures) -> Self {
        self.0.max_features = max_features;
        self
    }
}

impl<F: Float> Default for RegressionTreeParams<F, StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> RegressionTree<F> {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `max_depth = 5`
    /// * `min_samples_split = 10`
    /// * `max_features = MaxFeatures::OneThird`
    /// * `rng = StdRng::from_entropy()`
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> RegressionTreeParams<F, StdRng> {
        RegressionTreeParams::new()
    }
}

impl<F: Float, R> ParamGuard for RegressionTreeParams<F, R> {
    type Checked = RegressionTreeValidParams<F, R>;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.max_depth == 0 {
            Err(Error::Parameters(
                "Maximal depth should be at least one".to_string(),
            ))
        } else if self.0.min_samples_split < 2 {
            Err(Error::Parameters(format!(
                "Minimum number of samples to split a node should be at least two, but was {}",
                self.0.min_samples_split
            )))
        } else {
            self.0.max_features.check()?;
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
