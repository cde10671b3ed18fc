//! Candidate generation policy.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PolicyError, PolicyResult};
use crate::row::Phase;

/// Default cap on the number of generated candidates.
pub const DEFAULT_MAX_CANDIDATES: usize = 1000;

/// Filtering and ranking options for candidate generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// Emit the declared start → end transition of each row.
    pub include_transition: bool,
    /// Emit the recovery back out of each row's end state.
    pub include_recovery: bool,
    /// Rows below this priority produce no candidates.
    pub min_priority: f64,
    /// `None` means unbounded.
    pub max_candidates: Option<usize>,
    /// Seeds both the tie-break draws and the candidate hashes. Any integer,
    /// negative ones included.
    pub seed: i64,
}

impl Policy {
    /// Default policy with the given seed.
    pub fn new(seed: i64) -> Self {
        Self {
            include_transition: true,
            include_recovery: true,
            min_priority: 0.0,
            max_candidates: Some(DEFAULT_MAX_CANDIDATES),
            seed,
        }
    }

    /// Read a policy from an optional mapping.
    ///
    /// Unknown keys are ignored and absent keys keep their defaults, with
    /// `seed` falling back to `default_seed`. An explicit
    /// `"max_candidates": null` lifts the cap.
    pub fn from_value(data: Option<&Value>, default_seed: i64) -> PolicyResult<Self> {
        let mut policy = Self::new(default_seed);
        let map = match data {
            None | Some(Value::Null) => return Ok(policy),
            Some(Value::Object(map)) => map,
            Some(other) => return Err(PolicyError::NotAMapping(type_name(other).into())),
        };

        if let Some(value) = map.get("include_transition") {
            policy.include_transition = value.as_bool().ok_or(PolicyError::InvalidField {
                field: "include_transition",
                expected: "boolean",
            })?;
        }
        if let Some(value) = map.get("include_recovery") {
            policy.include_recovery = value.as_bool().ok_or(PolicyError::InvalidField {
                field: "include_recovery",
                expected: "boolean",
            })?;
        }
        if let Some(value) = map.get("min_priority") {
            policy.min_priority = value.as_f64().ok_or(PolicyError::InvalidField {
                field: "min_priority",
                expected: "number",
            })?;
        }
        if let Some(value) = map.get("max_candidates") {
            policy.max_candidates = match value {
                Value::Null => None,
                other => Some(
                    other
                        .as_u64()
                        .and_then(|n| usize::try_from(n).ok())
                        .ok_or(PolicyError::InvalidField {
                            field: "max_candidates",
                            expected: "non-negative integer or null",
                        })?,
                ),
            };
        }
        if let Some(value) = map.get("seed") {
            policy.seed = value.as_i64().ok_or(PolicyError::InvalidField {
                field: "seed",
                expected: "64-bit signed integer",
            })?;
        }

        Ok(policy)
    }

    /// Drop rows whose priority is below `min_priority`.
    pub fn with_min_priority(mut self, min_priority: f64) -> Self {
        self.min_priority = min_priority;
        self
    }

    /// Cap the output length; `None` lifts the cap.
    pub fn with_max_candidates(mut self, max_candidates: Option<usize>) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    /// Choose which phases are emitted.
    pub fn with_phases(mut self, include_transition: bool, include_recovery: bool) -> Self {
        self.include_transition = include_transition;
        self.include_recovery = include_recovery;
        self
    }

    /// Whether candidates of `phase` are emitted.
    pub fn includes(&self, phase: Phase) -> bool {
        match phase {
            Phase::Transition => self.include_transition,
            Phase::Recovery => self.include_recovery,
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
