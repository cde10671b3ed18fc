//! # bm-types
//!
//! Shared vocabulary of the behavior matrix engine.
//!
//! A behavior matrix is an ordered list of [`MatrixRow`]s, each describing how
//! one component must move between states when a fault is injected. Every
//! other crate in the workspace speaks in terms of these types:
//!
//! - `bm-validator` turns a raw document into typed rows
//! - `bm-generator` derives [`Candidate`]s from rows under a [`Policy`]
//! - `bm-harness` executes rows through monitor plugins
//! - `bm-reports` projects rows into traceability and coverage views
//!
//! ## Identity
//!
//! The tuple `(fault_id, component_id, start_state, warm_from_fault_id)` is
//! the primary de-duplication key of a row, exposed as [`RowKey`].

#![deny(unsafe_code)]

pub mod candidate;
pub mod error;
pub mod policy;
pub mod row;

pub use candidate::{BatchKey, Candidate};
pub use error::{PolicyError, PolicyResult};
pub use policy::{Policy, DEFAULT_MAX_CANDIDATES};
pub use row::{
    Asil, BehaviorContext, ExpectedBehavior, IsoAttributes, IsoMethods, MatrixDocument, MatrixRow,
    MonitorEntry, MonitorSpec, Phase, RowKey, TimingBudget, Trace,
};
