//! Common metrics for regression
//!
//! This module implements common comparison metrices for continuous variables.

use ndarray::{ArrayBase, Data, Ix1};

use crate::{
    error::{Error, Result},
    Float,
};

/// Regression metrices trait
///
/// Implemented for one-dimensional arrays of predictions. Every metric compares `self` with the
/// ground truth `compare_to` and fails if both arrays differ in length or are empty.
///
/// ```
/// use canopy::metrics::Regression;
/// use ndarray::array;
///
/// let prediction = array![2.5f64, 3.5, 4.0];
/// let truth = array![2.0, 4.0, 4.0];
///
/// assert!((prediction.mean_absolute_error(&truth).unwrap() - 1. / 3.).abs() < 1e-12);
/// ```
pub trait Regression<F: Float, D: Data<Elem = F>> {
    /// Maximal error between two continuous variables
    fn max_error(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F>;
    /// Mean error between two continuous variables
    fn mean_absolute_error(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F>;
    /// Mean squared error between two continuous variables
    fn mean_squared_error(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F>;
    /// Square root of the mean squared error, in the unit of the targets
    fn root_mean_squared_error(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F> {
        self.mean_squared_error(compare_to).map(|x| x.sqrt())
    }
    /// R squared coefficient, is the proportion of the variance in the dependent variable that is
    /// predictable from the independent variable.
    ///
    /// To evaluate the accuracy of a prediction, use
    /// ```ignore
    /// prediction.r2(&ground_truth)
    /// ```
    fn r2(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F>;
    /// Same as R-Squared but with biased variance
    fn explained_variance(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F>;
}

fn check_lengths<F, D1, D2>(a: &ArrayBase<D1, Ix1>, b: &ArrayBase<D2, Ix1>) -> Result<()>
where
    D1: Data<Elem = F>,
    D2: Data<Elem = F>,
{
    if a.len() != b.len() {
        Err(Error::InvalidInput(format!(
            "prediction has {} values but ground truth has {}",
            a.len(),
            b.len()
        )))
    } else if a.is_empty() {
        Err(Error::InvalidInput("cannot compare empty arrays".into()))
    } else {
        Ok(())
    }
}

impl<F: Float, D: Data<Elem = F>, D2: Data<Elem = F>> Regression<F, D> for ArrayBase<D2, Ix1> {
    fn max_error(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F> {
        check_lengths(self, compare_to)?;

        Ok((self - compare_to)
            .iter()
            .map(|x| x.abs())
            .fold(F::neg_infinity(), F::max))
    }

    fn mean_absolute_error(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F> {
        check_lengths(self, compare_to)?;

        let n = F::cast(self.len());
        Ok((self - compare_to).mapv(|x| x.abs()).sum() / n)
    }

    fn mean_squared_error(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F> {
        check_lengths(self, compare_to)?;

        let n = F::cast(self.len());
        Ok((self - compare_to).mapv(|x| x * x).sum() / n)
    }

    // r2 = 1 - sum((pred_i - y_i)^2)/sum((mean_y - y_i)^2)
    // the mean is taken over `compare_to`, the ground truth
    fn r2(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F> {
        check_lengths(self, compare_to)?;

        let mean = compare_to.sum() / F::cast(compare_to.len());

        Ok(F::one()
            - (self - compare_to).mapv(|x| x * x).sum()
                / (compare_to.mapv(|x| (x - mean) * (x - mean)).sum() + F::cast(1e-10)))
    }

    fn explained_variance(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F> {
        check_lengths(self, compare_to)?;

        let n = F::cast(self.len());
        let diff = self - compare_to;

        let mean = compare_to.sum() / n;
        let mean_error = diff.sum() / n;

        Ok(F::one()
            - diff.mapv(|x| (x - mean_error) * (x - mean_error)).sum()
                / (compare_to.mapv(|x| (x - mean) * (x - mean)).sum() + F::cast(1e-10)))
    }
}
