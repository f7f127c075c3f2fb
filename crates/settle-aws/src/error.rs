//! AWS provider error types

use settle_core::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("empty response")]
    EmptyResult,

    #[error("too many results: wanted 1, got {0}")]
    TooManyResults(usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AwsError>;
