//! Tabular projections keyed by `(fault_id, component_id)`.

use std::collections::{BTreeMap, BTreeSet};

use bm_types::MatrixRow;
use serde::Serialize;

// ── Row-count heatmap ───────────────────────────────────────────────────

/// Number of rows per `(fault_id, component_id)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RowCountHeatmap {
    /// `fault_id → component_id → rows`. Absent pairs count as zero.
    pub counts: BTreeMap<String, BTreeMap<String, usize>>,
}

impl RowCountHeatmap {
    pub fn count(&self, fault_id: &str, component_id: &str) -> usize {
        self.counts
            .get(fault_id)
            .and_then(|by_component| by_component.get(component_id))
            .copied()
            .unwrap_or(0)
    }

    pub fn faults(&self) -> Vec<&str> {
        self.counts.keys().map(String::as_str).collect()
    }

    /// Every component seen for any fault, sorted.
    pub fn components(&self) -> Vec<&str> {
        self.counts
            .values()
            .flat_map(|by_component| by_component.keys().map(String::as_str))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Dense grid in [`faults`](Self::faults) × [`components`](Self::components) order.
    pub fn grid(&self) -> Vec<Vec<usize>> {
        let components = self.components();
        self.faults()
            .into_iter()
            .map(|fault| components.iter().map(|c| self.count(fault, c)).collect())
            .collect()
    }
}

pub fn row_count_heatmap(rows: &[MatrixRow]) -> RowCountHeatmap {
    let mut heatmap = RowCountHeatmap::default();
    for row in rows {
        *heatmap
            .counts
            .entry(row.fault_id.clone())
            .or_default()
            .entry(row.component_id.clone())
            .or_default() += 1;
    }
    heatmap
}

// ── Timing pivot ────────────────────────────────────────────────────────

/// Min/mean/max of one timing field over a group of rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimingStats {
    pub min: u64,
    pub mean: f64,
    pub max: u64,
}

impl TimingStats {
    fn from_values(values: &[u64]) -> Self {
        let min = values.iter().copied().min().unwrap_or(0);
        let max = values.iter().copied().max().unwrap_or(0);
        let mean = if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<u64>() as f64 / values.len() as f64
        };
        Self { min, mean, max }
    }
}

/// Timing statistics for one `(fault_id, component_id)` group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingPivotEntry {
    pub fault_id: String,
    pub component_id: String,
    pub rows: usize,
    pub max_time_ms: TimingStats,
    pub tolerance_ms: TimingStats,
}

/// One entry per `(fault_id, component_id)`, sorted by that pair.
pub fn timing_pivot(rows: &[MatrixRow]) -> Vec<TimingPivotEntry> {
    let mut groups: BTreeMap<(&str, &str), (Vec<u64>, Vec<u64>)> = BTreeMap::new();
    for row in rows {
        let (max_times, tolerances) = groups
            .entry((row.fault_id.as_str(), row.component_id.as_str()))
            .or_default();
        max_times.push(row.timing.max_time_ms);
        tolerances.push(row.timing.tolerance_ms);
    }
    groups
        .into_iter()
        .map(|((fault_id, component_id), (max_times, tolerances))| TimingPivotEntry {
            fault_id: fault_id.to_string(),
            component_id: component_id.to_string(),
            rows: max_times.len(),
            max_time_ms: TimingStats::from_values(&max_times),
            tolerance_ms: TimingStats::from_values(&tolerances),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bm_types::{BehaviorContext, ExpectedBehavior, TimingBudget};

    fn row(fault: &str, component: &str, start: &str, max_time_ms: u64, tolerance_ms: u64) -> MatrixRow {
        MatrixRow::new(
            fault,
            component,
            BehaviorContext::new(start),
            ExpectedBehavior::new("SAFE", "t"),
        )
        .with_timing(TimingBudget {
            max_time_ms,
            tolerance_ms,
            measurement_uncertainty: 0,
        })
    }

    fn rows() -> Vec<MatrixRow> {
        vec![
            row("F1", "C1", "NORMAL", 50, 5),
            row("F1", "C1", "DEGRADED", 100, 10),
            row("F1", "C2", "NORMAL", 20, 2),
            row("F2", "C1", "NORMAL", 30, 3),
        ]
    }

    #[test]
    fn heatmap_counts_and_grid() {
        let heatmap = row_count_heatmap(&rows());
        assert_eq!(heatmap.count("F1", "C1"), 2);
        assert_eq!(heatmap.count("F2", "C2"), 0);
        assert_eq!(heatmap.faults(), vec!["F1", "F2"]);
        assert_eq!(heatmap.components(), vec!["C1", "C2"]);
        assert_eq!(heatmap.grid(), vec![vec![2, 1], vec![1, 0]]);
    }

    #[test]
    fn pivot_statistics() {
        let pivot = timing_pivot(&rows());
        assert_eq!(pivot.len(), 3);
        let first = &pivot[0];
        assert_eq!((first.fault_id.as_str(), first.component_id.as_str()), ("F1", "C1"));
        assert_eq!(first.rows, 2);
        assert_eq!(first.max_time_ms, TimingStats { min: 50, mean: 75.0, max: 100 });
        assert_eq!(first.tolerance_ms, TimingStats { min: 5, mean: 7.5, max: 10 });
        assert_eq!(pivot[2].fault_id, "F2");
    }

    #[test]
    fn empty_rows() {
        assert!(timing_pivot(&[]).is_empty());
        assert!(row_count_heatmap(&[]).grid().is_empty());
    }
}
