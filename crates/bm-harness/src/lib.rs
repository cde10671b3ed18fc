//! # bm-harness
//!
//! Executes behavior-matrix test cases against pluggable monitors.
//!
//! ```text
//!  ValidatedMatrix ──▶ Harness::build_test_cases ──▶ [TestCase]
//!                                                       │
//!                     MonitorRegistry ◀── plugin name ──┤ per monitor spec
//!                     (range/state/timing + custom)     │
//!                                                       ▼
//!                                         MonitorResult ─AND─▶ TestResult
//!                                                       │
//!                                     Harness::run ─────▶ SuiteReport
//! ```
//!
//! The registry is built once and passed explicitly; nothing here holds
//! global state. Observed timings come from an injected [`TimingSource`],
//! so runs are reproducible.

#![deny(unsafe_code)]

pub mod case;
pub mod error;
pub mod harness;
pub mod monitors;
pub mod plugin;
pub mod registry;
pub mod report;
pub mod timing;

pub use case::{TestCase, TestResult};
pub use error::{HarnessError, HarnessResult};
pub use harness::{Harness, HarnessConfig};
pub use monitors::{RangeMonitor, StateMonitor, TimingMonitor};
pub use plugin::{MonitorPlugin, MonitorResult};
pub use registry::MonitorRegistry;
pub use report::{CaseError, SuiteReport, SuiteSummary};
pub use timing::{FixedTimingSource, SeededTimingSource, TimingSource};
