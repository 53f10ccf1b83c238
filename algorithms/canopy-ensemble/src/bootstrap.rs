use canopy::{Dataset, Float};
use ndarray::{ArrayBase, Axis, Data, Ix1, Ix2};
use rand::Rng;

/// Resampling with replacement
///
/// A bootstrap sample of `n` rows draws `n` row indices independently and uniformly from
/// `[0, n)`. Some rows appear several times and on average about `1 - 1/e ≈ 63.2%` of the rows
/// appear at least once.
pub struct BootstrapSampler;

impl BootstrapSampler {
    /// Draws `n` indices in `[0, n)` with replacement
    ///
    /// ```
    /// use canopy_ensemble::BootstrapSampler;
    /// use rand::{rngs::SmallRng, SeedableRng};
    ///
    /// let mut rng = SmallRng::seed_from_u64(42);
    /// let indices = BootstrapSampler::sample(&mut rng, 10);
    ///
    /// assert_eq!(indices.len(), 10);
    /// assert!(indices.iter().all(|&i| i < 10));
    /// ```
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<usize> {
        (0..n).map(|_| rng.gen_range(0..n)).collect()
    }

    /// Draws a bootstrap sample of the rows of `records` and the matching `targets`
    ///
    /// ### Panics
    ///
    /// If the number of targets differs from the number of rows
    pub fn resample<F, R, D, D2>(
        rng: &mut R,
        records: &ArrayBase<D, Ix2>,
        targets: &ArrayBase<D2, Ix1>,
    ) -> Dataset<F, F>
    where
        F: Float,
        R: Rng + ?Sized,
        D: Data<Elem = F>,
        D2: Data<Elem = F>,
    {
        assert_eq!(
            records.nrows(),
            targets.len(),
            "The number of data points must match the number of targets."
        );

        let indices = Self::sample(rng, records.nrows());

        Dataset::new(
            records.select(Axis(0), &indices),
            targets.select(Axis(0), &indices),
        )
    }
}
