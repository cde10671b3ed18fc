//! Error types for policy parsing.

use thiserror::Error;

/// Errors raised while reading a generation policy mapping.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The policy input was present but not a mapping.
    #[error("policy must be a mapping, got {0}")]
    NotAMapping(String),

    /// A recognized key carried a value of the wrong type or range.
    #[error("invalid policy field '{field}': expected {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

/// Convenience result type for policy operations.
pub type PolicyResult<T> = Result<T, PolicyError>;
