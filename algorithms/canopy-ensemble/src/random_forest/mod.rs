mod algorithm;
mod estimator;
mod hyperparams;

pub use algorithm::*;
pub use estimator::*;
pub use hyperparams::*;
