mod algorithm;
mod hyperparams;
mod iter;
mod max_features;
mod split;

pub use algorithm::*;
pub use hyperparams::*;
pub use iter::*;
pub use max_features::*;
