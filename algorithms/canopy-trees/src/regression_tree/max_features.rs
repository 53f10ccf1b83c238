use canopy::error::{Error, Result};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// The number of features considered when searching the split of a node
///
/// At every node only a random subset of the features is searched for the best split. This
/// decorrelates the trees of a random forest, at the cost of a slightly weaker single tree. For
/// `d` features the subset contains
///
/// * `All`: every feature, `d`
/// * `Sqrt`: `max(1, floor(sqrt(d)))` features
/// * `Fraction(r)`: `max(1, floor(r * d))` features with `r` in `(0, 1]`
/// * `OneThird`: `max(1, floor(d / 3))` features, the usual choice for regression forests
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MaxFeatures {
    All,
    Sqrt,
    Fraction(f64),
    OneThird,
}

impl Default for MaxFeatures {
    fn default() -> Self {
        MaxFeatures::OneThird
    }
}

impl MaxFeatures {
    /// Returns how many of `n_features` features are sampled at a split
    ///
    /// The result lies between one and `n_features` for any `n_features > 0`.
    ///
    /// ```
    /// use canopy_trees::MaxFeatures;
    ///
    /// assert_eq!(MaxFeatures::Sqrt.select_count(9), 3);
    /// assert_eq!(MaxFeatures::Fraction(0.5).select_count(9), 4);
    /// ```
    pub fn select_count(self, n_features: usize) -> usize {
        let count = match self {
            MaxFeatures::All => n_features,
            MaxFeatures::Sqrt => (n_features as f64).sqrt().floor() as usize,
            MaxFeatures::Fraction(ratio) => (ratio * n_features as f64).floor() as usize,
            MaxFeatures::OneThird => n_features / 3,
        };

        count.max(1).min(n_features)
    }

    /// Fails with a parameter error if a fraction lies outside of `(0, 1]`
    pub fn check(self) -> Result<()> {
        match self {
            MaxFeatures::Fraction(ratio) if !(ratio > 0.0 && ratio <= 1.0) => {
                Err(Error::Parameters(format!(
                    "Feature fraction should be in (0, 1], but was {}",
                    ratio
                )))
            }
            _ => Ok(()),
        }
    }
}
