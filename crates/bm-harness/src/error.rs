//! Error types for test-case execution.

use serde::Serialize;
use thiserror::Error;

/// Errors that abort the execution of one test case.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HarnessError {
    /// A monitor spec names a plugin the registry does not know.
    #[error("monitor plugin '{name}' is not registered")]
    UnknownPlugin { name: String },

    /// A monitor parameter has the wrong type.
    #[error("monitor '{monitor_id}': parameter '{param}' must be {expected}")]
    InvalidParam {
        monitor_id: String,
        param: String,
        expected: &'static str,
    },
}

/// Convenience result type for the harness.
pub type HarnessResult<T> = Result<T, HarnessError>;
