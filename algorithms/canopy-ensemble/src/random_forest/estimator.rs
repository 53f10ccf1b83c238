use std::sync::Arc;

use canopy::{
    dataset::AsTargets,
    error::{Error, Result},
    traits::*,
    DatasetBase, Float,
};
use log::debug;
use ndarray::{Array1, ArrayBase, Data, Ix2};
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::{RandomForestParams, RandomForestRegressor};

/// A refittable random forest estimator
///
/// The estimator holds hyperparameters and the most recently fitted forest. Fitting again trains
/// a new forest and swaps it in as a whole, a previously obtained [`Arc`] of the old forest keeps
/// predicting unchanged values.
///
/// ```rust
/// use canopy::prelude::*;
/// use canopy_ensemble::{RandomForest, RandomForestParams};
/// use ndarray::array;
/// use rand::{rngs::SmallRng, SeedableRng};
///
/// let mut estimator = RandomForest::new(
///     RandomForestParams::new_fixed_rng(SmallRng::seed_from_u64(42)).min_samples_split(2),
/// );
/// assert_eq!(estimator.predict(&array![[1.0]]), Err(Error::NotFitted));
///
/// let dataset = Dataset::new(array![[1.], [2.], [3.], [4.]], array![3., 3., 3., 3.]);
/// estimator.fit(&dataset).unwrap();
///
/// assert_eq!(estimator.predict(&array![[1.0]]), Ok(array![3.0]));
/// ```
#[derive(Debug, Clone)]
pub struct RandomForest<F, R = StdRng> {
    params: RandomForestParams<F, R>,
    model: Option<Arc<RandomForestRegressor<F>>>,
}

impl<F: Float> Default for RandomForest<F, StdRng> {
    fn default() -> Self {
        Self::new(RandomForestParams::new())
    }
}

impl<F, R> RandomForest<F, R>
where
    F: Float,
    R: Rng + SeedableRng + Clone + Send + Sync,
{
    /// Creates an unfitted estimator
    pub fn new(params: RandomForestParams<F, R>) -> Self {
        RandomForest {
            params,
            model: None,
        }
    }

    /// Returns the hyperparameters used by the next fit
    pub fn params(&self) -> &RandomForestParams<F, R> {
        &self.params
    }

    /// Returns true once a forest has been fitted
    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// Returns the current forest, if any
    pub fn model(&self) -> Option<Arc<RandomForestRegressor<F>>> {
        self.model.clone()
    }

    /// Fits a new forest and replaces the current one
    ///
    /// On failure the current forest is kept.
    pub fn fit<D, T>(
        &mut self,
        dataset: &DatasetBase<ArrayBase<D, Ix2>, T>,
    ) -> Result<Arc<RandomForestRegressor<F>>>
    where
        D: Data<Elem = F> + Sync,
        T: AsTargets<Elem = F>,
    {
        let forest = Arc::new(self.params.fit(dataset)?);

        if self.model.is_some() {
            debug!("replacing fitted random forest");
        }
        self.model = Some(forest.clone());

        Ok(forest)
    }

    /// Predicts the target of every row of `x` with the current forest
    ///
    /// Fails with `NotFitted` before the first fit and with `InvalidInput` if the number of
    /// features differs from the training data.
    pub fn predict<D: Data<Elem = F> + Sync>(&self, x: &ArrayBase<D, Ix2>) -> Result<Array1<F>> {
        let model = self.model.as_ref().ok_or(Error::NotFitted)?;

        if x.ncols() != model.num_features() {
            return Err(Error::InvalidInput(format!(
                "expected {} features, but got {}",
                model.num_features(),
                x.ncols()
            )));
        }

        Ok(model.predict(x))
    }
}
