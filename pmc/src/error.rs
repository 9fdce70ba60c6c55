//! Error types for model construction and formula evaluation

use pmc_core::MatrixError;
use thiserror::Error;

/// Errors raised while evaluating a formula against a model
#[derive(Debug, Error)]
pub enum CheckError {
    /// A matrix operation failed during evaluation or model assembly
    #[error(transparent)]
    Matrix(#[from] MatrixError),

    /// The model carries no label with this name
    #[error("Atomic proposition '{0}' is invalid")]
    UnknownProposition(String),

    /// A model or solver was requested as something it is not
    #[error("Bad cast: tried to use {found} as {requested}")]
    BadCast {
        requested: &'static str,
        found: &'static str,
    },

    /// Model components do not fit together
    #[error("Invalid model: {0}")]
    InvalidModel(String),
}

/// Result type for evaluation
pub type Result<T> = std::result::Result<T, CheckError>;
