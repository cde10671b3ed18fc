//! ISO/ASIL compliance counts.

use std::collections::BTreeMap;

use bm_types::MatrixRow;
use serde::Serialize;

use crate::traceability::UNSPECIFIED;

/// Row counts by ASIL level, ISO environment and ISO test method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComplianceSummary {
    /// Rows without a level are counted under `UNSPECIFIED`.
    pub asil: BTreeMap<String, usize>,
    pub environments: BTreeMap<String, usize>,
    pub methods: BTreeMap<String, usize>,
}

impl ComplianceSummary {
    pub fn asil_count(&self, level: &str) -> usize {
        self.asil.get(level).copied().unwrap_or(0)
    }
}

pub fn compliance_summary(rows: &[MatrixRow]) -> ComplianceSummary {
    let mut summary = ComplianceSummary::default();
    for row in rows {
        let level = row.asil.map_or(UNSPECIFIED, |asil| asil.as_str());
        *summary.asil.entry(level.to_string()).or_default() += 1;
        for env in row.iso_environments() {
            *summary.environments.entry(env.clone()).or_default() += 1;
        }
        for method in row.iso_test_methods() {
            *summary.methods.entry(method.clone()).or_default() += 1;
        }
    }
    summary
}
