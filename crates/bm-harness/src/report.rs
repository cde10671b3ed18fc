//! Suite run reports.
//!
//! Collects per-case verdicts and aborted cases with box-drawing display.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::case::TestResult;
use crate::error::HarnessError;

/// A case that could not be executed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseError {
    pub tc_id: String,
    pub error: HarnessError,
}

impl fmt::Display for CaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ERROR] {} - {}", self.tc_id, self.error)
    }
}

/// Summary statistics from a suite run.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteSummary {
    /// Cases handed to the run.
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Cases aborted by a lookup or parameter error.
    pub errored: usize,
    /// Cases not run because of `fail_fast`.
    pub skipped: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl SuiteSummary {
    /// No failed and no errored cases.
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }

    /// Pass rate over executed cases, as a percentage.
    pub fn pass_rate(&self) -> f64 {
        let executed = self.passed + self.failed + self.errored;
        if executed == 0 {
            return 100.0;
        }
        (self.passed as f64 / executed as f64) * 100.0
    }
}

impl fmt::Display for SuiteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} passed ({:.1}%), {} failed, {} errored, {} skipped",
            self.passed,
            self.total,
            self.pass_rate(),
            self.failed,
            self.errored,
            self.skipped,
        )
    }
}

/// Outcome of one [`Harness::run`](crate::Harness::run).
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub run_id: Uuid,
    /// Results of executed cases, in input order.
    pub results: Vec<TestResult>,
    pub errors: Vec<CaseError>,
    pub summary: SuiteSummary,
}

impl SuiteReport {
    pub fn from_outcomes(
        results: Vec<TestResult>,
        errors: Vec<CaseError>,
        total: usize,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = results.len() - passed;
        let errored = errors.len();
        let summary = SuiteSummary {
            total,
            passed,
            failed,
            errored,
            skipped: total.saturating_sub(passed + failed + errored),
            started_at,
            completed_at,
        };
        Self {
            run_id: Uuid::new_v4(),
            results,
            errors,
            summary,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.summary.all_passed()
    }

    pub fn failures(&self) -> Vec<&TestResult> {
        self.results.iter().filter(|r| !r.passed).collect()
    }

    pub fn result(&self, tc_id: &str) -> Option<&TestResult> {
        self.results.iter().find(|r| r.tc_id() == tc_id)
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+-------------------------------------------------+")?;
        writeln!(f, "|   Behavior Matrix Suite Report                  |")?;
        writeln!(f, "+-------------------------------------------------+")?;
        writeln!(
            f,
            "| Total: {:3}  Passed: {:3}  Failed: {:3}  Err: {:3} |",
            self.summary.total, self.summary.passed, self.summary.failed, self.summary.errored,
        )?;
        writeln!(f, "+-------------------------------------------------+")?;
        writeln!(f)?;

        for result in &self.results {
            let mark = if result.passed { "+" } else { "x" };
            writeln!(f, "  [{}] {}", mark, result)?;
            for monitor in result.failed_monitors() {
                writeln!(f, "      {}", monitor)?;
            }
        }
        for error in &self.errors {
            writeln!(f, "  [!] {}", error)?;
        }

        writeln!(f)?;
        if self.all_passed() {
            writeln!(f, "  ALL {} EXECUTED CASES PASSED", self.results.len())?;
        } else {
            writeln!(
                f,
                "  {} CASE(S) FAILED, {} ERRORED",
                self.summary.failed, self.summary.errored,
            )?;
        }
        if self.summary.skipped > 0 {
            writeln!(f, "  {} CASE(S) SKIPPED", self.summary.skipped)?;
        }
        Ok(())
    }
}
