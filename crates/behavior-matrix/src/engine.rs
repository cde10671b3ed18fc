//! The end-to-end pipeline.

use std::sync::Arc;

use bm_generator::CandidateGenerator;
use bm_harness::{
    FixedTimingSource, Harness, HarnessConfig, MonitorPlugin, MonitorRegistry, SeededTimingSource,
    SuiteReport, TestCase, TestResult, TimingSource,
};
use bm_reports::{
    compliance_summary, coverage, row_count_heatmap, timing_pivot, transition_graph, traceability,
    ComplianceSummary, CoverageMatrix, RowCountHeatmap, TimingPivotEntry, Traceability, TransitionGraph,
};
use bm_types::{Candidate, Policy};
use bm_validator::{validate, ValidatedMatrix};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::error::EngineResult;

/// Where the timing monitor's observations come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum TimingConfig {
    /// Deterministic draws seeded with the engine seed.
    #[default]
    Seeded,
    /// A constant observation.
    Fixed { observed_ms: u64 },
}

impl TimingConfig {
    fn source(&self, seed: i64) -> Arc<dyn TimingSource> {
        match self {
            Self::Seeded => Arc::new(SeededTimingSource::new(seed)),
            Self::Fixed { observed_ms } => Arc::new(FixedTimingSource::new(*observed_ms)),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Default generation seed; a `seed` in the policy mapping overrides it.
    pub seed: i64,
    pub harness: HarnessConfig,
    pub timing: TimingConfig,
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_harness(mut self, harness: HarnessConfig) -> Self {
        self.harness = harness;
        self
    }

    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }
}

/// All reporting projections of one matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projections {
    pub transitions: TransitionGraph,
    pub coverage: CoverageMatrix,
    pub traceability: Traceability,
    pub compliance: ComplianceSummary,
    pub row_counts: RowCountHeatmap,
    pub timing: Vec<TimingPivotEntry>,
}

/// Validation, generation, execution and reporting behind one handle.
///
/// The monitor registry starts with the reference plugins; register custom
/// plugins before executing.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    harness: Harness,
    registry: MonitorRegistry,
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let registry = MonitorRegistry::builtin(config.timing.source(config.seed));
        let harness = Harness::with_config(config.harness.clone());
        Self {
            config,
            harness,
            registry,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &MonitorRegistry {
        &self.registry
    }

    pub fn register_plugin(&mut self, plugin: Arc<dyn MonitorPlugin>) {
        self.registry.register(plugin);
    }

    pub fn validate(&self, document: &Value) -> EngineResult<ValidatedMatrix> {
        Ok(validate(document)?)
    }

    /// Ranked candidates for `matrix` under an optional policy mapping.
    pub fn generate(&self, matrix: &ValidatedMatrix, policy: Option<&Value>) -> EngineResult<Vec<Candidate>> {
        let policy = Policy::from_value(policy, self.config.seed)?;
        Ok(CandidateGenerator::new(policy).generate(matrix.rows()))
    }

    /// Validate `document`, then [`generate`](Self::generate).
    pub fn generate_document(&self, document: &Value, policy: Option<&Value>) -> EngineResult<Vec<Candidate>> {
        let matrix = self.validate(document)?;
        self.generate(&matrix, policy)
    }

    pub fn test_cases(&self, matrix: &ValidatedMatrix) -> Vec<TestCase> {
        self.harness.build_test_cases(matrix)
    }

    pub fn execute_case(&self, case: &TestCase) -> EngineResult<TestResult> {
        Ok(case.execute(&self.registry)?)
    }

    /// Build and run a test case for every enabled row.
    pub fn execute(&self, matrix: &ValidatedMatrix) -> SuiteReport {
        let cases = self.test_cases(matrix);
        self.harness.run(&cases, &self.registry)
    }

    pub fn projections(&self, matrix: &ValidatedMatrix) -> Projections {
        let rows = matrix.rows();
        let projections = Projections {
            transitions: transition_graph(rows, None),
            coverage: coverage(rows),
            traceability: traceability(rows),
            compliance: compliance_summary(rows),
            row_counts: row_count_heatmap(rows),
            timing: timing_pivot(rows),
        };
        info!(rows = rows.len(), "computed projections");
        projections
    }
}
