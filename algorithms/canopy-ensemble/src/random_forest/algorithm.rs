use canopy::{
    dataset::{AsTargets, Records},
    error::{Error, Result},
    traits::*,
    DatasetBase, Float,
};
use canopy_trees::RegressionTree;
use log::info;
use ndarray::{Array1, ArrayBase, Data, Ix2};
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::RandomForestValidParams;
use crate::BootstrapSampler;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// A fitted random forest of regression trees
///
/// ## Structure
///
/// The forest is an ordered collection of [regression trees](canopy_trees::RegressionTree),
/// stored in the order they were trained. A fitted forest is never modified, fitting again
/// produces a new forest.
///
/// ## Algorithm
///
/// Given a dataset with `n` samples, for each of the `n_estimators` members:
/// 1. a seed is drawn from the generator of the hyperparameters and a member generator of the
///    same type is seeded from it;
/// 2. the member generator draws a bootstrap sample of `n` rows with replacement, see
///    [`BootstrapSampler`](crate::BootstrapSampler);
/// 3. a regression tree is grown on the bootstrap sample with the shared tree hyperparameters,
///    the member generator driving its feature subsampling.
///
/// Seeds are drawn sequentially before the members are trained in parallel, so that the forest
/// only depends on the initial state of the generator and never on the thread scheduling.
///
/// ## Prediction
///
/// The prediction of the forest is the unweighted mean of the predictions of its trees.
///
/// ## Example
///
/// ```rust
/// use canopy::prelude::*;
/// use canopy_ensemble::RandomForestParams;
/// use rand::{rngs::SmallRng, SeedableRng};
///
/// let mut rng = SmallRng::seed_from_u64(42);
/// let (train, test) = canopy_datasets::generate::survey(200, 6, 0.2, &mut rng)
///     .split_with_ratio(0.8);
///
/// let forest = RandomForestParams::new_fixed_rng(SmallRng::seed_from_u64(42))
///     .n_estimators(20)
///     .min_samples_split(5)
///     .fit(&train)
///     .unwrap();
///
/// let predictions = forest.predict(&test);
/// assert_eq!(predictions.len(), test.nsamples());
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestRegressor<F> {
    trees: Vec<RegressionTree<F>>,
    num_features: usize,
}

impl<F: Float> RandomForestRegressor<F> {
    /// Returns the member trees in training order
    pub fn trees(&self) -> &[RegressionTree<F>] {
        &self.trees
    }

    /// Returns the number of trees in the forest
    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    /// Returns the number of features the forest was trained on
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Returns the mean of the feature importances of the member trees
    pub fn feature_importance(&self) -> Array1<F> {
        let total = self
            .trees
            .iter()
            .fold(Array1::<F>::zeros(self.num_features), |acc, tree| {
                acc + tree.feature_importance()
            });

        total / F::cast(self.trees.len())
    }
}

impl<F: Float, D: Data<Elem = F> + Sync> PredictInplace<ArrayBase<D, Ix2>, Array1<F>>
    for RandomForestRegressor<F>
{
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<F>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );

        let predictions = self
            .trees
            .par_iter()
            .map(|tree| {
                let mut prediction = Array1::<F>::zeros(x.nrows());
                tree.predict_inplace(x, &mut prediction);
                prediction
            })
            .collect::<Vec<_>>();

        // sum up in training order, independent of the scheduling
        y.fill(F::zero());
        for prediction in &predictions {
            *y += prediction;
        }
        *y /= F::cast(self.trees.len());
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<F> {
        Array1::zeros(x.nrows())
    }
}

impl<F, R, D, T> Fit<ArrayBase<D, Ix2>, T, Error> for RandomForestValidParams<F, R>
where
    F: Float,
    R: Rng + SeedableRng + Clone + Send + Sync,
    D: Data<Elem = F> + Sync,
    T: AsTargets<Elem = F>,
{
    type Object = RandomForestRegressor<F>;

    /// Fit a random forest on the dataset, failing on the same inputs as a single tree
    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Self::Object> {
        dataset.validate_regression()?;

        let records = dataset.records();
        let targets = dataset.targets().as_targets();

        info!(
            "fitting random forest of {} trees on {} samples with {} features",
            self.n_estimators(),
            dataset.nsamples(),
            dataset.nfeatures()
        );

        let mut rng = self.rng().clone();
        let seeds = (0..self.n_estimators())
            .map(|_| rng.gen::<u64>())
            .collect::<Vec<_>>();

        let trees = seeds
            .into_par_iter()
            .map(|seed| {
                let mut member_rng = R::seed_from_u64(seed);
                let bootstrap = BootstrapSampler::resample(&mut member_rng, records, &targets);

                self.tree_params(member_rng).fit(&bootstrap)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(RandomForestRegressor {
            trees,
            num_features: dataset.nfeatures(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::RandomForestParams;
    use approx::assert_abs_diff_eq;
    use canopy::Dataset;
    use canopy_trees::{MaxFeatures, RegressionTreeParams};
    use ndarray::{array, Array, Array2};
    use ndarray_rand::{rand_distr::Uniform, RandomExt};
    use rand::rngs::SmallRng;

    fn random_dataset(seed: u64) -> Dataset<f64, f64> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let records = Array::random_using((60, 4), Uniform::new(0., 1.), &mut rng);
        let targets = records.column(0).mapv(|x| 1. + 4. * x) + &records.column(2);

        Dataset::new(records, targets)
    }

    fn params(seed: u64) -> RandomForestParams<f64, SmallRng> {
        RandomForestParams::new_fixed_rng(SmallRng::seed_from_u64(seed))
            .min_samples_split(4)
            .max_features(MaxFeatures::All)
    }

    #[test]
    fn prediction_is_mean_of_trees() -> Result<()> {
        let dataset = random_dataset(1);
        let forest = params(1).n_estimators(7).fit(&dataset)?;

        assert_eq!(forest.n_estimators(), 7);

        let prediction = forest.predict(dataset.records());
        let mean = forest
            .trees()
            .iter()
            .map(|tree| tree.predict(dataset.records()))
            .fold(Array1::<f64>::zeros(60), |acc, p| acc + p)
            / 7.;

        for (a, b) in prediction.iter().zip(mean.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }

        Ok(())
    }

    #[test]
    fn predict_is_idempotent() -> Result<()> {
        let dataset = random_dataset(6);
        let forest = params(6).n_estimators(6).fit(&dataset)?;

        let x = dataset.records().slice(ndarray::s![..10, ..]);
        assert_eq!(forest.predict(&x), forest.predict(&x));

        Ok(())
    }

    #[test]
    /// A forest of a single tree is that tree, grown on a bootstrap sample
    fn single_member_forest_is_a_tree() -> Result<()> {
        let dataset = random_dataset(2);
        let forest = params(9).n_estimators(1).max_depth(4).fit(&dataset)?;

        let mut rng = SmallRng::seed_from_u64(9);
        let mut member_rng = SmallRng::seed_from_u64(rng.gen::<u64>());
        let bootstrap =
            BootstrapSampler::resample(&mut member_rng, dataset.records(), dataset.targets());
        let tree = RegressionTreeParams::new_fixed_rng(member_rng)
            .max_depth(4)
            .min_samples_split(4)
            .max_features(MaxFeatures::All)
            .fit(&bootstrap)?;

        assert_eq!(forest.trees().to_vec(), vec![tree.clone()]);
        assert_eq!(
            forest.predict(dataset.records()),
            tree.predict(dataset.records())
        );

        Ok(())
    }

    #[test]
    fn same_seed_same_forest() -> Result<()> {
        let dataset = random_dataset(3);

        let first = params(5).n_estimators(8).fit(&dataset)?;
        let second = params(5).n_estimators(8).fit(&dataset)?;
        let other = params(6).n_estimators(8).fit(&dataset)?;

        assert_eq!(first, second);
        assert_ne!(first, other);

        Ok(())
    }

    #[test]
    fn members_see_different_samples() -> Result<()> {
        let dataset = random_dataset(4);
        let forest = params(4).n_estimators(5).fit(&dataset)?;

        let distinct = forest
            .trees()
            .iter()
            .map(|tree| format!("{:?}", tree.root_node()))
            .collect::<std::collections::HashSet<_>>();
        assert!(distinct.len() > 1);

        Ok(())
    }

    #[test]
    fn constant_targets() -> Result<()> {
        let dataset = Dataset::new(Array2::from_elem((10, 2), 0.3), Array1::from_elem(10, 2.5));
        let forest = params(0).n_estimators(3).fit(&dataset)?;

        assert_eq!(forest.predict(&array![[0.1, 0.9]]), array![2.5]);

        Ok(())
    }

    #[test]
    fn importances_are_averaged() -> Result<()> {
        let dataset = random_dataset(5);
        let forest = params(5).n_estimators(10).fit(&dataset)?;

        let importance = forest.feature_importance();
        assert_abs_diff_eq!(importance.sum(), 1.0, epsilon = 1e-9);
        // feature 1 and 3 are noise
        assert!(importance[0] > importance[1] && importance[0] > importance[3]);

        Ok(())
    }

    #[test]
    fn invalid_input_is_rejected() {
        let empty = Dataset::new(Array2::<f64>::zeros((0, 3)), Array1::<f64>::zeros(0));
        assert!(matches!(params(0).fit(&empty), Err(Error::InvalidInput(_))));

        let mismatch = Dataset::new(array![[1.], [2.], [3.]], array![1., 2.]);
        assert!(matches!(
            params(0).fit(&mismatch),
            Err(Error::InvalidInput(_))
        ));

        assert!(matches!(
            params(0).n_estimators(0).fit(&random_dataset(0)),
            Err(Error::Parameters(_))
        ));
    }
}
