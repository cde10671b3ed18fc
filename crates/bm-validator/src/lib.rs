//! # bm-validator
//!
//! Turns a parsed behavior matrix document into a [`ValidatedMatrix`], or
//! fails with every problem found.
//!
//! ## Stages
//!
//! ```text
//!  raw document ──▶ structural checks ──▶ business rules ──▶ ValidatedMatrix
//!                        │                    │   │
//!                        ▼                    ▼   ▼
//!                  Schema error        Schema   DuplicateRows
//!                  (all violations)    error    error
//! ```
//!
//! 1. **Structural checks** run the Draft 2020-12 matrix schema
//!    ([`schema::matrix_schema`]) and collect every violation as a JSON
//!    pointer plus message.
//! 2. **Monitor rule**: a row may not list the same monitor id twice.
//!    Reported through the schema channel.
//! 3. **Identity rule**: `(fault_id, component_id, start_state,
//!    warm_from_fault_id)` is unique across the document.
//!
//! Each stage only runs if the previous one passed. Validation is
//! all-or-nothing: no partially validated matrix is ever returned.

#![deny(unsafe_code)]

pub mod error;
pub mod matrix;
pub mod rules;
pub mod schema;

pub use error::{DuplicatePair, SchemaViolation, ValidationError, ValidationErrorKind, ValidationResult};
pub use matrix::{validate, ValidatedMatrix};
