//! # bm-reports
//!
//! Pure projections over matrix rows, for review and rendering elsewhere.
//!
//! | Projection | Shape |
//! |------------|-------|
//! | [`transition_graph`] | `start_state → [(end_state, phase)]` |
//! | [`coverage`] | `component → event_type → covered / disabled` |
//! | [`traceability`] | `requirement → [fault_id]` |
//! | [`compliance_summary`] | counts by ASIL, ISO environment, ISO test method |
//! | [`row_count_heatmap`] | `(fault, component) → rows` |
//! | [`timing_pivot`] | per `(fault, component)`: min/mean/max of the timing budget |
//!
//! Nothing here renders; every result is a plain serializable value.
//! Keys are sorted, and values within a bucket keep row order.

#![deny(unsafe_code)]

pub mod compliance;
pub mod coverage;
pub mod graph;
pub mod tables;
pub mod traceability;

pub use compliance::{compliance_summary, ComplianceSummary};
pub use coverage::{coverage, CoverageMatrix, CoverageStatus};
pub use graph::{transition_graph, TransitionEdge, TransitionGraph};
pub use tables::{row_count_heatmap, timing_pivot, RowCountHeatmap, TimingPivotEntry, TimingStats};
pub use traceability::{traceability, Traceability, UNSPECIFIED};
