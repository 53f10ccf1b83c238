use canopy::{
    error::{Error, Result},
    Float,
};
use ndarray::{Array1, ArrayBase, Data, Ix1};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Maps continuous predictions onto a bounded ordinal scale
///
/// Forests average the leaf values of their trees, so a model trained on answers in `1..=5`
/// predicts values like `3.7`. The scale rounds such a prediction to the nearest level, with ties
/// going to the even level, and clamps it to `[lower, upper]`.
///
/// ```
/// use canopy_ensemble::OrdinalScale;
///
/// let scale = OrdinalScale::default();
///
/// assert_eq!(scale.level(3.7), 4);
/// assert_eq!(scale.level(2.5), 2);
/// assert_eq!(scale.level(7.2), 5);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrdinalScale {
    lower: i64,
    upper: i64,
}

impl Default for OrdinalScale {
    /// The five point scale `1..=5`
    fn default() -> Self {
        OrdinalScale { lower: 1, upper: 5 }
    }
}

impl OrdinalScale {
    /// Creates the scale `lower..=upper`
    pub fn new(lower: i64, upper: i64) -> Result<Self> {
        if lower > upper {
            return Err(Error::Parameters(format!(
                "Lower bound {} of the ordinal scale exceeds the upper bound {}",
                lower, upper
            )));
        }

        Ok(OrdinalScale { lower, upper })
    }

    pub fn lower(&self) -> i64 {
        self.lower
    }

    pub fn upper(&self) -> i64 {
        self.upper
    }

    /// Returns the level closest to `prediction`
    ///
    /// Non-finite predictions are clamped like any other value, `NaN` maps to the lower bound.
    pub fn level<F: Float>(&self, prediction: F) -> i64 {
        let rounded = round_half_even(prediction.to_f64().unwrap_or(f64::NAN));

        if rounded.is_nan() {
            self.lower
        } else {
            rounded.max(self.lower as f64).min(self.upper as f64) as i64
        }
    }

    /// Maps every prediction to its level
    pub fn levels<F: Float, D: Data<Elem = F>>(
        &self,
        predictions: &ArrayBase<D, Ix1>,
    ) -> Array1<i64> {
        predictions.mapv(|x| self.level(x))
    }
}

/// Rounds to the nearest integer, ties to even
fn round_half_even(x: f64) -> f64 {
    let rounded = x.round();

    if (x - x.trunc()).abs() == 0.5 {
        2.0 * (x / 2.0).round()
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn ties_go_to_even() {
        let scale = OrdinalScale::new(0, 10).unwrap();

        assert_eq!(scale.level(0.5), 0);
        assert_eq!(scale.level(1.5), 2);
        assert_eq!(scale.level(2.5), 2);
        assert_eq!(scale.level(3.5), 4);
        assert_eq!(scale.level(3.49), 3);
        assert_eq!(scale.level(3.51), 4);
    }

    #[test]
    fn clamps_to_bounds() {
        let scale = OrdinalScale::default();

        assert_eq!(scale.level(-3.0), 1);
        assert_eq!(scale.level(0.2), 1);
        assert_eq!(scale.level(5.49), 5);
        assert_eq!(scale.level(f64::INFINITY), 5);
        assert_eq!(scale.level(f64::NEG_INFINITY), 1);
        assert_eq!(scale.level(f64::NAN), 1);
    }

    #[test]
    fn single_precision() {
        assert_eq!(OrdinalScale::default().level(4.5f32), 4);
    }

    #[test]
    fn maps_arrays() {
        let scale = OrdinalScale::default();

        assert_eq!(
            scale.levels(&array![1.2, 2.5, 3.5, 4.8, 9.]),
            array![1, 2, 4, 5, 5]
        );
    }

    #[test]
    fn invalid_bounds() {
        assert!(matches!(OrdinalScale::new(5, 1), Err(Error::Parameters(_))));
        assert_eq!(OrdinalScale::new(3, 3).unwrap().level(10.), 3);
    }
}
