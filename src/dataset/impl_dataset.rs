use super::{AsTargets, Dataset, DatasetBase, DatasetView, Float, Records};
use crate::error::{Error, Result};
use crate::metrics_regression::Regression;
use crate::traits::{Fit, Predict, PredictInplace};
use ndarray::{s, Array1, Array2, ArrayBase, Axis, Data, Ix1, Ix2};
use rand::{seq::SliceRandom, Rng};

/// Implementation without constraints on records and targets
///
/// This implementation block provides methods for the creation and modification of datasets.
impl<R: Records, T> DatasetBase<R, T> {
    /// Create a new dataset from records and targets
    ///
    /// # Example
    ///
    /// ```ignore
    /// let dataset = Dataset::new(records, targets);
    /// ```
    pub fn new(records: R, targets: T) -> DatasetBase<R, T> {
        DatasetBase {
            records,
            targets,
            feature_names: Vec::new(),
        }
    }

    /// Returns reference to records
    pub fn records(&self) -> &R {
        &self.records
    }

    /// Returns reference to targets
    pub fn targets(&self) -> &T {
        &self.targets
    }

    /// Returns feature names
    ///
    /// A feature name gives a human-readable string describing the purpose of a single feature.
    /// This allow the reader to understand its purpose while analysing results, for example
    /// feature importances. If no names were set, `feature-<index>` is returned.
    pub fn feature_names(&self) -> Vec<String> {
        if !self.feature_names.is_empty() {
            self.feature_names.clone()
        } else {
            (0..self.records.nfeatures())
                .map(|idx| format!("feature-{}", idx))
                .collect()
        }
    }

    /// Updates the feature names of a dataset
    pub fn with_feature_names<I: Into<String>>(mut self, names: Vec<I>) -> DatasetBase<R, T> {
        let feature_names = names.into_iter().map(|x| x.into()).collect();

        self.feature_names = feature_names;

        self
    }
}

impl<F: Clone, L: Clone, D, S> DatasetBase<ArrayBase<D, Ix2>, ArrayBase<S, Ix1>>
where
    D: Data<Elem = F>,
    S: Data<Elem = L>,
{
    /// Creates a view of a dataset
    pub fn view(&self) -> DatasetView<'_, F, L> {
        DatasetBase {
            records: self.records.view(),
            targets: self.targets.view(),
            feature_names: self.feature_names.clone(),
        }
    }

    /// Collects the given rows into a new, owned dataset
    ///
    /// Indices may repeat, in which case the row appears several times. The feature names are
    /// carried over.
    ///
    /// ### Panics
    ///
    /// If an index is out of bounds
    pub fn select(&self, indices: &[usize]) -> Dataset<F, L> {
        DatasetBase {
            records: self.records.select(Axis(0), indices),
            targets: self.targets.select(Axis(0), indices),
            feature_names: self.feature_names.clone(),
        }
    }

    /// Returns an owned copy of the dataset with randomly permuted rows
    ///
    /// Records and targets are permuted together, so every sample keeps its target.
    pub fn shuffle<R: Rng>(&self, rng: &mut R) -> Dataset<F, L> {
        let mut indices = (0..self.records.nrows()).collect::<Vec<_>>();
        indices.shuffle(rng);

        self.select(&indices)
    }
}

impl<F: Clone, L: Clone> Dataset<F, L> {
    /// Split dataset into two disjoint chunks
    ///
    /// This function splits the observations in a dataset into two disjoint chunks. The splitting
    /// threshold is calculated with the `ratio`. For example a ratio of `0.9` allocates 90% to the
    /// first chunks and 10% to the second. This is often used in training, validation splitting
    /// procedures. Rows are not shuffled.
    pub fn split_with_ratio(self, ratio: f32) -> (Self, Self) {
        let n = (self.records.nrows() as f32 * ratio).ceil() as usize;
        let n = n.min(self.records.nrows());

        let first = DatasetBase {
            records: self.records.slice(s![..n, ..]).to_owned(),
            targets: self.targets.slice(s![..n]).to_owned(),
            feature_names: self.feature_names.clone(),
        };
        let second = DatasetBase {
            records: self.records.slice(s![n.., ..]).to_owned(),
            targets: self.targets.slice(s![n..]).to_owned(),
            feature_names: self.feature_names,
        };

        (first, second)
    }

    /// Iterates over the training and validation sets of a `k`-fold split
    ///
    /// The samples are cut into `k` contiguous chunks, the first `n % k` chunks holding one sample
    /// more than the others. Every chunk is the validation set of exactly one fold and the
    /// remaining samples form its training set. Rows are not shuffled, call
    /// [`shuffle`](DatasetBase::shuffle) first if the order of the samples is meaningful.
    ///
    /// ### Panics
    ///
    /// If `k` is zero or larger than the number of samples
    pub fn iter_fold(
        &self,
        k: usize,
    ) -> impl Iterator<Item = (Dataset<F, L>, Dataset<F, L>)> + '_ {
        let n = self.records.nrows();
        assert!(k > 0, "the number of folds has to be at least one");
        assert!(k <= n, "cannot split {} samples into {} folds", n, k);

        let (size, remainder) = (n / k, n % k);

        (0..k).map(move |i| {
            let start = i * size + i.min(remainder);
            let end = start + size + usize::from(i < remainder);

            let train = (0..start).chain(end..n).collect::<Vec<_>>();
            let valid = (start..end).collect::<Vec<_>>();

            (self.select(&train), self.select(&valid))
        })
    }
}

impl<F: Float> Dataset<F, F> {
    /// Root mean squared error of `params` on every fold of a `k`-fold cross-validation
    ///
    /// A model is fitted on the training set of each fold of [`iter_fold`](Dataset::iter_fold)
    /// and evaluated on its validation set. The errors are returned in the order of the folds, the
    /// first failing fit aborts the cross-validation.
    ///
    /// ```
    /// use canopy::prelude::*;
    /// # use ndarray::{Array1, Array2};
    /// # struct MeanParams;
    /// # struct Mean(f64);
    /// # impl Fit<Array2<f64>, Array1<f64>, Error> for MeanParams {
    /// #     type Object = Mean;
    /// #     fn fit(&self, ds: &Dataset<f64, f64>) -> Result<Mean> {
    /// #         Ok(Mean(ds.as_targets().mean().unwrap()))
    /// #     }
    /// # }
    /// # impl PredictInplace<Array2<f64>, Array1<f64>> for Mean {
    /// #     fn predict_inplace(&self, _x: &Array2<f64>, y: &mut Array1<f64>) { y.fill(self.0) }
    /// #     fn default_target(&self, x: &Array2<f64>) -> Array1<f64> { Array1::zeros(x.nrows()) }
    /// # }
    /// let dataset = Dataset::new(
    ///     ndarray::array![[0.], [1.], [2.], [3.]],
    ///     ndarray::array![1., 1., 3., 3.],
    /// );
    ///
    /// // a model predicting the mean of its training targets
    /// let errors = dataset.cross_validate_rmse(2, &MeanParams).unwrap();
    /// assert_eq!(errors, ndarray::array![2., 2.]);
    /// ```
    pub fn cross_validate_rmse<P>(&self, k: usize, params: &P) -> Result<Array1<F>>
    where
        P: Fit<Array2<F>, Array1<F>, Error>,
        P::Object: PredictInplace<Array2<F>, Array1<F>>,
    {
        self.iter_fold(k)
            .map(|(train, valid)| {
                let model = params.fit(&train)?;
                let prediction: Array1<F> = model.predict(valid.records());

                prediction.root_mean_squared_error(valid.targets())
            })
            .collect()
    }
}

impl<F: Float, D, T> DatasetBase<ArrayBase<D, Ix2>, T>
where
    D: Data<Elem = F>,
    T: AsTargets<Elem = F>,
{
    /// Checks that the dataset describes a well-formed regression problem
    ///
    /// The records have to contain at least one sample and one feature, there has to be exactly one
    /// target per sample and every record and target has to be finite. Models call this once when
    /// fitting starts, so that the training itself can rely on the shape of its input.
    pub fn validate_regression(&self) -> Result<()> {
        let targets = self.targets.as_targets();

        if self.records.nrows() != targets.len() {
            return Err(Error::InvalidInput(format!(
                "number of samples ({}) does not match number of targets ({})",
                self.records.nrows(),
                targets.len()
            )));
        }
        if self.records.nrows() == 0 {
            return Err(Error::InvalidInput("dataset contains no samples".into()));
        }
        if self.records.ncols() == 0 {
            return Err(Error::InvalidInput("dataset contains no features".into()));
        }
        if let Some(((row, col), _)) = self.records.indexed_iter().find(|(_, x)| !x.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "record at row {} and feature {} is not finite",
                row, col
            )));
        }
        if let Some((row, _)) = targets.indexed_iter().find(|(_, y)| !y.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "target at row {} is not finite",
                row
            )));
        }

        Ok(())
    }
}
