//! # behavior-matrix
//!
//! Validation, test-case generation, monitor execution and reporting for
//! behavior matrices: tables describing how safety-critical components must
//! move between states when faults are injected.
//!
//! ```text
//!   document (serde_json::Value)
//!        │
//!        ▼
//!   validate ──────────▶ ValidatedMatrix ──┬──▶ generate ──▶ [Candidate]   (offline review)
//!   (schema, monitor                       │
//!    ids, duplicates)                      ├──▶ Harness ──▶ SuiteReport    (monitor verdicts)
//!                                          │
//!                                          └──▶ projections                (graph, coverage, ...)
//! ```
//!
//! [`Engine`] wires the stages together. The stage crates are re-exported
//! under short module names for callers that need the lower-level API.
//!
//! ```rust
//! use behavior_matrix::Engine;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), behavior_matrix::EngineError> {
//! let document = json!({"matrix": [{
//!     "fault_id": "FI.BMS.OVERVOLT",
//!     "component_id": "COMP.BMS",
//!     "context": {"start_state": "NORMAL", "warm_from_fault_id": null},
//!     "expect": {"end_state": "SAFE_STATE", "transition_name": "overvolt_to_safe"},
//!     "monitors": ["state"],
//!     "timing": {"max_time_ms": 50, "tolerance_ms": 5, "measurement_uncertainty": 1},
//!     "priority": 0.9,
//!     "trace": {"req_ids": ["REQ-001"]},
//!     "version": "1.0.0"
//! }]});
//! let engine = Engine::new();
//! let matrix = engine.validate(&document)?;
//! let candidates = engine.generate(&matrix, None)?;
//! let report = engine.execute(&matrix);
//! assert_eq!(candidates.len(), 2);
//! assert!(report.all_passed());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod engine;
pub mod error;

pub use bm_generator as generator;
pub use bm_harness as harness;
pub use bm_reports as reports;
pub use bm_types as types;
pub use bm_validator as validator;

pub use engine::{Engine, EngineConfig, Projections, TimingConfig};
pub use error::{EngineError, EngineResult, ErrorKind};

pub use bm_harness::{MonitorPlugin, MonitorRegistry, SuiteReport, TestCase, TestResult};
pub use bm_types::{Candidate, MatrixRow, Policy};
pub use bm_validator::ValidatedMatrix;
