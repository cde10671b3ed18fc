//! The validation entry point and its output.

use bm_types::{MatrixDocument, MatrixRow};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{SchemaViolation, ValidationError, ValidationResult};
use crate::rules::{identity_duplicates, monitor_duplicates};
use crate::schema::{check_document, normalize_integers};

/// A matrix that passed every structural check and business rule.
///
/// Rows keep their document order. The only ways to obtain one are
/// [`validate`] and [`ValidatedMatrix::from_rows`], so holding a value is
/// proof of validity.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedMatrix {
    rows: Vec<MatrixRow>,
}

impl ValidatedMatrix {
    /// Validate already-typed rows through the same checks as a raw document.
    pub fn from_rows(rows: Vec<MatrixRow>) -> ValidationResult<Self> {
        let document = MatrixDocument::new(rows).to_value().map_err(|e| {
            ValidationError::Schema {
                violations: vec![SchemaViolation::new("", format!("rows do not serialize: {}", e))],
            }
        })?;
        validate(&document)
    }

    pub fn rows(&self) -> &[MatrixRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<MatrixRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatrixRow> {
        self.rows.iter()
    }

    /// Rows eligible for execution.
    pub fn enabled_rows(&self) -> impl Iterator<Item = &MatrixRow> {
        self.rows.iter().filter(|row| row.enabled)
    }
}

impl<'a> IntoIterator for &'a ValidatedMatrix {
    type Item = &'a MatrixRow;
    type IntoIter = std::slice::Iter<'a, MatrixRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Validate a parsed matrix document.
///
/// Structural violations pre-empt the business rules, and monitor duplicates
/// pre-empt identity duplicates; each failing stage reports its complete list.
pub fn validate(document: &Value) -> ValidationResult<ValidatedMatrix> {
    let violations = check_document(document);
    if !violations.is_empty() {
        warn!(count = violations.len(), "matrix failed structural validation");
        return Err(ValidationError::Schema { violations });
    }

    let raw_rows = document
        .get("matrix")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut rows = Vec::with_capacity(raw_rows.len());
    let mut violations = Vec::new();
    for (index, raw) in raw_rows.iter().enumerate() {
        let mut raw = raw.clone();
        normalize_integers(&mut raw);
        match serde_json::from_value::<MatrixRow>(raw) {
            Ok(row) => rows.push(row),
            Err(e) => violations.push(SchemaViolation::new(
                format!("/matrix/{}", index),
                e.to_string(),
            )),
        }
    }
    if !violations.is_empty() {
        warn!(count = violations.len(), "matrix rows could not be decoded");
        return Err(ValidationError::Schema { violations });
    }
    debug!(rows = rows.len(), "structural validation passed");

    let violations = monitor_duplicates(&rows);
    if !violations.is_empty() {
        warn!(count = violations.len(), "rows list duplicate monitor ids");
        return Err(ValidationError::Schema { violations });
    }

    let duplicates = identity_duplicates(&rows);
    if !duplicates.is_empty() {
        warn!(count = duplicates.len(), "duplicate matrix rows detected");
        return Err(ValidationError::DuplicateRows { duplicates });
    }

    info!(rows = rows.len(), "matrix validated");
    Ok(ValidatedMatrix { rows })
}
