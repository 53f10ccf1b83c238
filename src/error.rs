//! Error types in canopy
//!

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid parameter {0}")]
    Parameters(String),
    #[error("invalid input {0}")]
    InvalidInput(String),
    #[error("the model has not been fitted yet")]
    NotFitted,
}
