//! # bm-generator
//!
//! Derives test-case candidates from validated matrix rows.
//!
//! ## Pipeline
//!
//! ```text
//!  rows ──▶ priority filter ──▶ transition / recovery candidates
//!                                       │
//!                                       ▼  tc_id = sha256(canonical scenario)
//!                               seeded tie-break draws
//!                                       │
//!                                       ▼
//!                 sort (priority desc, draw asc, tc_id asc) ──▶ truncate
//! ```
//!
//! Identifiers are content addresses, not random tokens: the same scenario
//! and seed always hash to the same `tc_id`, and any change to a semantic
//! field changes it. Cosmetic fields (`notes`, `tags`) are not part of the
//! hash input.
//!
//! The crate also owns the second, lightweight id model: sequenced test-case
//! ids such as `TC_001_COMP_BMS_FI_BMS_OVERVOLT_TRA_E1`, used by the
//! execution harness.

#![deny(unsafe_code)]

pub mod canonical;
pub mod engine;
pub mod error;
pub mod sequence;

pub use canonical::{canonical_json, content_hash, strip_empty};
pub use engine::{candidate_for, candidate_id, generate, CandidateGenerator};
pub use error::{GenerateError, GenerateResult};
pub use sequence::{sequenced_case_id, sequenced_rows};
