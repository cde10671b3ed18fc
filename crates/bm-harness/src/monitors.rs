//! Reference monitor plugins: `range`, `state` and `timing`.

use std::sync::Arc;

use bm_types::MonitorSpec;
use serde_json::json;

use crate::case::TestCase;
use crate::error::HarnessResult;
use crate::plugin::{count_param, number_param, string_param, MonitorPlugin, MonitorResult};
use crate::timing::TimingSource;

// ── Range ───────────────────────────────────────────────────────────────

/// Checks that `expected` lies within `[min, max]`.
///
/// `expected` defaults to 0; `min` and `max` default to `expected`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeMonitor;

impl MonitorPlugin for RangeMonitor {
    fn name(&self) -> &str {
        "range"
    }

    fn evaluate(&self, case: &TestCase, spec: &MonitorSpec) -> HarnessResult<MonitorResult> {
        let value = number_param(spec, "expected")?.unwrap_or(0.0);
        let min = number_param(spec, "min")?.unwrap_or(value);
        let max = number_param(spec, "max")?.unwrap_or(value);
        let passed = min <= value && value <= max;

        Ok(MonitorResult::new(spec, passed)
            .with_detail("value", value)
            .with_detail("range", json!([min, max]))
            .with_detail("component", case.row.component_id.as_str())
            .with_detail("fault_id", case.row.fault_id.as_str()))
    }
}

// ── State ───────────────────────────────────────────────────────────────

/// Checks that the expected state is one the row declares.
///
/// The expected state is the `expected` parameter, or the row's end state.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateMonitor;

impl MonitorPlugin for StateMonitor {
    fn name(&self) -> &str {
        "state"
    }

    fn evaluate(&self, case: &TestCase, spec: &MonitorSpec) -> HarnessResult<MonitorResult> {
        let row = &case.row;
        let expected = string_param(spec, "expected")?.unwrap_or(row.expect.end_state.as_str());
        let start = row.context.start_state.as_str();
        let passed = expected == row.expect.end_state || expected == start;

        Ok(MonitorResult::new(spec, passed)
            .with_detail("expected", expected)
            .with_detail("start", start)
            .with_detail("phase", row.phase.as_str()))
    }
}

// ── Timing ──────────────────────────────────────────────────────────────

/// Checks an observed transition time against the budget.
///
/// The budget is the `budget_ms` parameter, or the row's `max_time_ms`.
pub struct TimingMonitor {
    source: Arc<dyn TimingSource>,
}

impl TimingMonitor {
    pub fn new(source: Arc<dyn TimingSource>) -> Self {
        Self { source }
    }
}

impl MonitorPlugin for TimingMonitor {
    fn name(&self) -> &str {
        "timing"
    }

    fn evaluate(&self, case: &TestCase, spec: &MonitorSpec) -> HarnessResult<MonitorResult> {
        let budget_ms = count_param(spec, "budget_ms")?.unwrap_or(case.row.timing.max_time_ms);
        let observed_ms = self.source.observe(&case.tc_id, &spec.id, budget_ms);

        Ok(MonitorResult::new(spec, observed_ms <= budget_ms)
            .with_detail("budget_ms", budget_ms)
            .with_detail("observed_ms", observed_ms)
            .with_detail("source", self.source.name()))
    }
}
