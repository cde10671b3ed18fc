//! The monitor plugin seam.

use std::fmt;

use bm_types::MonitorSpec;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::case::TestCase;
use crate::error::{HarnessError, HarnessResult};

/// Verdict of one monitor for one test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorResult {
    pub monitor_id: String,
    pub plugin: String,
    pub passed: bool,
    /// Plugin-specific evidence.
    #[serde(default)]
    pub details: Map<String, Value>,
}

impl MonitorResult {
    pub fn new(spec: &MonitorSpec, passed: bool) -> Self {
        Self {
            monitor_id: spec.id.clone(),
            plugin: spec.plugin.clone(),
            passed,
            details: Map::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for MonitorResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed { "PASS" } else { "FAIL" };
        write!(f, "[{}] {} ({})", status, self.monitor_id, self.plugin)
    }
}

/// Evaluates one aspect of a test case's outcome.
///
/// Implementations are shared across cases through the registry and must
/// not mutate shared state.
pub trait MonitorPlugin: Send + Sync {
    /// Name under which the plugin is registered.
    fn name(&self) -> &str;

    /// Evaluate `spec` against `case`.
    fn evaluate(&self, case: &TestCase, spec: &MonitorSpec) -> HarnessResult<MonitorResult>;
}

// ── Parameter helpers ───────────────────────────────────────────────────

pub(crate) fn number_param(spec: &MonitorSpec, param: &str) -> HarnessResult<Option<f64>> {
    match spec.params.get(param) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or_else(|| HarnessError::InvalidParam {
            monitor_id: spec.id.clone(),
            param: param.into(),
            expected: "a number",
        }),
    }
}

pub(crate) fn count_param(spec: &MonitorSpec, param: &str) -> HarnessResult<Option<u64>> {
    match spec.params.get(param) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| HarnessError::InvalidParam {
            monitor_id: spec.id.clone(),
            param: param.into(),
            expected: "a non-negative integer",
        }),
    }
}

pub(crate) fn string_param<'a>(spec: &'a MonitorSpec, param: &str) -> HarnessResult<Option<&'a str>> {
    match spec.params.get(param) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_str().map(Some).ok_or_else(|| HarnessError::InvalidParam {
            monitor_id: spec.id.clone(),
            param: param.into(),
            expected: "a string",
        }),
    }
}
