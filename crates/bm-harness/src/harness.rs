//! Builds test cases from a validated matrix and runs them as a suite.

use bm_generator::sequenced_rows;
use bm_validator::ValidatedMatrix;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::case::TestCase;
use crate::registry::MonitorRegistry;
use crate::report::{CaseError, SuiteReport};

/// Execution options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Stop after the first failed or errored case.
    pub fail_fast: bool,
}

impl HarnessConfig {
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }
}

/// Drives test-case construction and suite execution.
#[derive(Debug, Clone, Default)]
pub struct Harness {
    config: HarnessConfig,
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HarnessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// One case per enabled row, ids numbered by document position.
    pub fn build_test_cases(&self, matrix: &ValidatedMatrix) -> Vec<TestCase> {
        let cases: Vec<TestCase> = sequenced_rows(matrix.rows())
            .into_iter()
            .map(|(tc_id, row)| TestCase::new(tc_id, row.clone()))
            .collect();
        debug!(
            rows = matrix.len(),
            cases = cases.len(),
            "built test cases"
        );
        cases
    }

    /// Execute `cases` in order against `registry`.
    ///
    /// A case that cannot be executed is recorded as a [`CaseError`] and the
    /// run continues, unless `fail_fast` is set.
    pub fn run(&self, cases: &[TestCase], registry: &MonitorRegistry) -> SuiteReport {
        let started_at = Utc::now();
        let mut results = Vec::with_capacity(cases.len());
        let mut errors = Vec::new();

        for case in cases {
            let stop = match case.execute(registry) {
                Ok(result) => {
                    debug!(tc_id = %case.tc_id, passed = result.passed, "case executed");
                    let failed = !result.passed;
                    results.push(result);
                    failed
                }
                Err(error) => {
                    warn!(tc_id = %case.tc_id, error = %error, "case aborted");
                    errors.push(CaseError {
                        tc_id: case.tc_id.clone(),
                        error,
                    });
                    true
                }
            };
            if stop && self.config.fail_fast {
                info!(tc_id = %case.tc_id, "fail_fast: stopping run");
                break;
            }
        }

        let report = SuiteReport::from_outcomes(results, errors, cases.len(), started_at, Utc::now());
        info!(run_id = %report.run_id, summary = %report.summary, "suite run complete");
        report
    }
}
