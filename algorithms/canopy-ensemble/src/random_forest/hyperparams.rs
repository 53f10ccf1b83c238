use canopy::{
    error::{Error, Result},
    Float, ParamGuard,
};
use canopy_trees::{MaxFeatures, RegressionTreeParams};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::marker::PhantomData;

use crate::RandomForestRegressor;

/// The set of hyperparameters that can be specified for fitting a
/// [random forest](struct.RandomForestRegressor.html).
///
/// Every member tree is grown with the same `max_depth`, `min_samples_split` and
/// `max_features`. The random number generator of the forest only hands out one seed per member,
/// see [`RandomForestRegressor`](struct.RandomForestRegressor.html) for details.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomForestValidParams<F, R> {
    n_estimators: usize,
    max_depth: usize,
    min_samples_split: usize,
    max_features: MaxFeatures,
    rng: R,

    float_marker: PhantomData<F>,
}

impl<F: Float, R: Rng + SeedableRng + Clone> RandomForestValidParams<F, R> {
    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

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

    /// Returns the unchecked parameters of a member tree driven by `rng`
    pub fn tree_params(&self, rng: R) -> RegressionTreeParams<F, R> {
        RegressionTreeParams::new_fixed_rng(rng)
            .max_depth(self.max_depth)
            .min_samples_split(self.min_samples_split)
            .max_features(self.max_features)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RandomForestParams<F, R>(RandomForestValidParams<F, R>);

impl<F: Float> RandomForestParams<F, StdRng> {
    /// Creates the default parameters with a generator seeded from system entropy
    pub fn new() -> Self {
        Self::new_fixed_rng(StdRng::from_entropy())
    }
}

impl<F: Float, R: Rng + SeedableRng + Clone> RandomForestParams<F, R> {
    /// Creates the default parameters driven by the given random number generator
    pub fn new_fixed_rng(rng: R) -> Self {
        Self(RandomForestValidParams {
            n_estimators: 10,
            max_depth: 5,
            min_samples_split: 20,
            max_features: MaxFeatures::OneThird,
            rng,
            float_marker: PhantomData,
        })
    }

    /// Sets the number of trees in the forest
    pub fn n_estimators(mut self, n_estimators: usize) -> Self {
        self.0.n_estimators = n_estimators;
        self
    }

    /// Sets the limit to the depth of every tree, the root has depth zero
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

impl<F: Float> Default for RandomForestParams<F, StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> RandomForestRegressor<F> {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `n_estimators = 10`
    /// * `max_depth = 5`
    /// * `min_samples_split = 20`
    /// * `max_features = MaxFeatures::OneThird`
    /// * `rng = StdRng::from_entropy()`
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> RandomForestParams<F, StdRng> {
        RandomForestParams::new()
    }
}

impl<F, R> ParamGuard for RandomForestParams<F, R> {
    type Checked = RandomForestValidParams<F, R>;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.n_estimators == 0 {
            Err(Error::Parameters(
                "Number of estimators should be at least one".to_string(),
            ))
        } else if self.0.max_depth == 0 {
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

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;

    fn params() -> RandomForestParams<f64, SmallRng> {
        RandomForestParams::new_fixed_rng(SmallRng::seed_from_u64(42))
    }

    #[test]
    fn defaults_are_valid() {
        let checked = params().check().unwrap();

        assert_eq!(checked.n_estimators(), 10);
        assert_eq!(checked.max_depth(), 5);
        assert_eq!(checked.min_samples_split(), 20);
        assert_eq!(checked.max_features(), MaxFeatures::OneThird);
    }

    #[test]
    fn invalid_configurations() {
        for invalid in vec![
            params().n_estimators(0),
            params().max_depth(0),
            params().min_samples_split(1),
            params().max_features(MaxFeatures::Fraction(1.5)),
        ] {
            assert!(matches!(invalid.check(), Err(Error::Parameters(_))));
        }
    }

    #[test]
    fn tree_params_share_hyperparameters() {
        let checked = params()
            .max_depth(3)
            .min_samples_split(4)
            .max_features(MaxFeatures::Sqrt)
            .check_unwrap();

        let tree = checked
            .tree_params(SmallRng::seed_from_u64(0))
            .check_unwrap();

        assert_eq!(tree.max_depth(), 3);
        assert_eq!(tree.min_samples_split(), 4);
        assert_eq!(tree.max_features(), MaxFeatures::Sqrt);
    }
}
