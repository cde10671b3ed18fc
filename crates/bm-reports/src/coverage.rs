//! Component × event-type coverage.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use bm_types::MatrixRow;
use serde::Serialize;
use tracing::debug;

/// Coverage of one `(component, event_type)` cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageStatus {
    Covered,
    Disabled,
    Missing,
}

impl CoverageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Covered => "covered",
            Self::Disabled => "disabled",
            Self::Missing => "missing",
        }
    }
}

impl fmt::Display for CoverageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `component_id → event_type → status`. Cells never written read as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CoverageMatrix {
    pub cells: BTreeMap<String, BTreeMap<u32, CoverageStatus>>,
}

impl CoverageMatrix {
    pub fn status(&self, component_id: &str, event_type: u32) -> CoverageStatus {
        self.cells
            .get(component_id)
            .and_then(|events| events.get(&event_type))
            .copied()
            .unwrap_or(CoverageStatus::Missing)
    }

    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// Every event type seen for any component, ascending.
    pub fn event_types(&self) -> Vec<u32> {
        self.cells
            .values()
            .flat_map(|events| events.keys().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Build the coverage matrix. Rows without an event type are skipped, and a
/// later row for the same cell replaces an earlier one.
pub fn coverage(rows: &[MatrixRow]) -> CoverageMatrix {
    let mut matrix = CoverageMatrix::default();
    for row in rows {
        let Some(event_type) = row.event_type else {
            continue;
        };
        let status = if row.enabled {
            CoverageStatus::Covered
        } else {
            CoverageStatus::Disabled
        };
        matrix
            .cells
            .entry(row.component_id.clone())
            .or_default()
            .insert(event_type, status);
    }
    debug!(components = matrix.cells.len(), "built coverage matrix");
    matrix
}
