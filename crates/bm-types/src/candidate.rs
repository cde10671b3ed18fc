//! Generated test-case candidates.

use serde::{Deserialize, Serialize};

use crate::row::Phase;

/// Grouping key `(fault_id, component_id)`; not part of a candidate's identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BatchKey(pub String, pub String);

impl BatchKey {
    pub fn fault_id(&self) -> &str {
        &self.0
    }

    pub fn component_id(&self) -> &str {
        &self.1
    }
}

/// A content-addressed test-case proposal derived from one row and phase.
///
/// Candidates are immutable once produced and carry copies of the row
/// fields they were derived from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Hex SHA-256 of the canonical scenario encoding.
    pub tc_id: String,
    pub phase: Phase,
    pub fault_id: String,
    pub component_id: String,
    /// Row start state, or the row end state for recovery.
    pub start_state: String,
    /// Row warm start, or the row fault for recovery.
    pub warm_from_fault_id: Option<String>,
    pub end_state: String,
    pub transition_name: String,
    /// Monitor ids of the row, in order.
    pub monitors: Vec<String>,
    /// Copied from the row timing budget.
    pub max_time_ms: u64,
    pub tolerance_ms: u64,
    /// Row priority; the primary sort key.
    pub priority: f64,
    pub batch_key: BatchKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_serializes_every_field() {
        let candidate = Candidate {
            tc_id: "ab12".into(),
            phase: Phase::Recovery,
            fault_id: "F1".into(),
            component_id: "C1".into(),
            start_state: "SAFE".into(),
            warm_from_fault_id: Some("F1".into()),
            end_state: "SAFE".into(),
            transition_name: "t".into(),
            monitors: vec!["M1".into()],
            max_time_ms: 50,
            tolerance_ms: 5,
            priority: 0.8,
            batch_key: BatchKey("F1".into(), "C1".into()),
        };

        let json = serde_json::to_value(&candidate).unwrap();
        assert_eq!(json["phase"], "recovery");
        assert_eq!(json["batch_key"], serde_json::json!(["F1", "C1"]));

        let restored: Candidate = serde_json::from_value(json).unwrap();
        assert_eq!(restored, candidate);
        assert_eq!(restored.batch_key.component_id(), "C1");
    }
}
