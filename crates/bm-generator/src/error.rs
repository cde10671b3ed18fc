//! Error types for candidate generation.

use bm_types::PolicyError;
use thiserror::Error;

/// Errors that can occur during candidate generation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// The policy mapping could not be read.
    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),

    /// A raw row lacks a required field or carries a wrongly typed one.
    #[error("malformed row {index}: {message}")]
    MalformedRow { index: usize, message: String },
}

/// Convenience result type for generation.
pub type GenerateResult<T> = Result<T, GenerateError>;
