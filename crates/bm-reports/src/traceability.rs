//! Requirement → fault traceability.

use std::collections::BTreeMap;

use bm_types::MatrixRow;
use serde::Serialize;

/// Bucket for rows that name no requirement.
pub const UNSPECIFIED: &str = "UNSPECIFIED";

/// `requirement_id → fault_ids`, fault ids in row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Traceability {
    pub requirements: BTreeMap<String, Vec<String>>,
}

impl Traceability {
    pub fn faults_for(&self, req_id: &str) -> &[String] {
        match self.requirements.get(req_id) {
            Some(faults) => faults,
            None => &[],
        }
    }

    /// Fault ids traced to no requirement.
    pub fn unspecified(&self) -> &[String] {
        self.faults_for(UNSPECIFIED)
    }
}

pub fn traceability(rows: &[MatrixRow]) -> Traceability {
    let mut trace = Traceability::default();
    for row in rows {
        if row.trace.req_ids.is_empty() {
            trace
                .requirements
                .entry(UNSPECIFIED.to_string())
                .or_default()
                .push(row.fault_id.clone());
            continue;
        }
        for req_id in &row.trace.req_ids {
            trace
                .requirements
                .entry(req_id.clone())
                .or_default()
                .push(row.fault_id.clone());
        }
    }
    trace
}
