//! Executable test cases and their results.

use std::fmt;

use bm_types::MatrixRow;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::HarnessResult;
use crate::plugin::MonitorResult;
use crate::registry::MonitorRegistry;

/// One enabled matrix row paired with its sequenced id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub tc_id: String,
    pub row: MatrixRow,
}

impl TestCase {
    pub fn new(tc_id: impl Into<String>, row: MatrixRow) -> Self {
        Self {
            tc_id: tc_id.into(),
            row,
        }
    }

    /// Run every monitor of the row, in declaration order.
    ///
    /// The first unknown plugin or bad parameter aborts the case.
    pub fn execute(&self, registry: &MonitorRegistry) -> HarnessResult<TestResult> {
        let mut monitors = Vec::with_capacity(self.row.monitors.len());
        for spec in self.row.monitor_specs() {
            let plugin = registry.get(&spec.plugin)?;
            let result = plugin.evaluate(self, &spec)?;
            debug!(
                tc_id = %self.tc_id,
                monitor = %result.monitor_id,
                passed = result.passed,
                "monitor evaluated"
            );
            monitors.push(result);
        }
        Ok(TestResult::from_monitors(self.clone(), monitors))
    }
}

/// Aggregate verdict of one test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub test_case: TestCase,
    /// In monitor declaration order.
    pub monitor_results: Vec<MonitorResult>,
    /// AND of all monitor verdicts; true when there are none.
    pub passed: bool,
}

impl TestResult {
    pub fn from_monitors(test_case: TestCase, monitor_results: Vec<MonitorResult>) -> Self {
        let passed = monitor_results.iter().all(|m| m.passed);
        Self {
            test_case,
            monitor_results,
            passed,
        }
    }

    pub fn tc_id(&self) -> &str {
        &self.test_case.tc_id
    }

    pub fn failed_monitors(&self) -> Vec<&MonitorResult> {
        self.monitor_results.iter().filter(|m| !m.passed).collect()
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed { "PASS" } else { "FAIL" };
        write!(
            f,
            "[{}] {} ({}/{} monitors passed)",
            status,
            self.tc_id(),
            self.monitor_results.len() - self.failed_monitors().len(),
            self.monitor_results.len()
        )
    }
}
