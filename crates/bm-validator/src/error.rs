//! Error types for matrix validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One structural or business-rule violation, located by JSON pointer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaViolation {
    /// JSON pointer such as `/matrix/2/timing/max_time_ms`; empty for the root.
    pub pointer: String,
    pub message: String,
}

impl SchemaViolation {
    pub fn new(pointer: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            pointer: pointer.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pointer = if self.pointer.is_empty() { "/" } else { &self.pointer };
        write!(f, "{}: {}", pointer, self.message)
    }
}

/// Two rows sharing the same identity tuple, as zero-based indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DuplicatePair {
    /// Index of the first row carrying the key.
    pub first: usize,
    /// Index of the later row repeating it.
    pub duplicate: usize,
}

impl DuplicatePair {
    /// 1-based row numbers for display.
    pub fn row_numbers(&self) -> (usize, usize) {
        (self.first + 1, self.duplicate + 1)
    }
}

impl fmt::Display for DuplicatePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (first, duplicate) = self.row_numbers();
        write!(f, "rows {} and {}", first, duplicate)
    }
}

/// Coarse error kind, for callers that map failures to exit codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationErrorKind {
    Schema,
    DuplicateRows,
}

impl ValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Schema => "schema",
            Self::DuplicateRows => "duplicate-rows",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while validating a matrix document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Structural or business-rule violations; always the complete list.
    #[error("{}", join_lines(.violations))]
    Schema { violations: Vec<SchemaViolation> },

    /// Rows repeating an earlier row's identity tuple.
    #[error("Duplicate rows detected: {}", join_pairs(.duplicates))]
    DuplicateRows { duplicates: Vec<DuplicatePair> },
}

impl ValidationError {
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            Self::Schema { .. } => ValidationErrorKind::Schema,
            Self::DuplicateRows { .. } => ValidationErrorKind::DuplicateRows,
        }
    }

    /// User-facing diagnostics, one entry per line of output.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Schema { violations } => violations.iter().map(ToString::to_string).collect(),
            Self::DuplicateRows { .. } => vec![self.to_string()],
        }
    }
}

fn join_lines(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn join_pairs(pairs: &[DuplicatePair]) -> String {
    pairs
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;
