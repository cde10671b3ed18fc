//! Engine-level errors.

use std::fmt;

use bm_generator::GenerateError;
use bm_harness::HarnessError;
use bm_types::PolicyError;
use bm_validator::{ValidationError, ValidationErrorKind};
use thiserror::Error;

/// Coarse classification of an [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Structural violation or business-rule breach reported through the schema channel.
    Schema,
    /// Two or more rows share an identity tuple.
    DuplicateRows,
    /// Malformed policy mapping.
    Policy,
    /// Malformed row or monitor parameter.
    Data,
    /// Monitor plugin not registered.
    Lookup,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Schema => "schema",
            Self::DuplicateRows => "duplicate-rows",
            Self::Policy => "policy",
            Self::Data => "data",
            Self::Lookup => "lookup",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any failure surfaced by the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Harness(#[from] HarnessError),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(e) => match e.kind() {
                ValidationErrorKind::Schema => ErrorKind::Schema,
                ValidationErrorKind::DuplicateRows => ErrorKind::DuplicateRows,
            },
            Self::Policy(_) | Self::Generate(GenerateError::Policy(_)) => ErrorKind::Policy,
            Self::Generate(GenerateError::MalformedRow { .. }) => ErrorKind::Data,
            Self::Harness(HarnessError::UnknownPlugin { .. }) => ErrorKind::Lookup,
            Self::Harness(HarnessError::InvalidParam { .. }) => ErrorKind::Data,
        }
    }
}

/// Convenience result type for the engine.
pub type EngineResult<T> = Result<T, EngineError>;
