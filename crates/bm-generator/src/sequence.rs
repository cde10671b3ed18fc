//! Sequenced test-case ids.
//!
//! Format: `TC_<seq:03>_<COMPONENT>_<FAULT>_<TRA|REC>_E<event_type>`, where
//! `seq` is the 1-based document position of the row. Disabled rows keep
//! their number but get no id, so numbering is stable when rows are toggled.

use bm_types::MatrixRow;

fn id_token(value: &str) -> String {
    value
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Id of `row` at 1-based document position `seq`. A missing event type is `E0`.
pub fn sequenced_case_id(seq: usize, row: &MatrixRow) -> String {
    format!(
        "TC_{:03}_{}_{}_{}_E{}",
        seq,
        id_token(&row.component_id),
        id_token(&row.fault_id),
        row.phase.abbreviation(),
        row.event_type.unwrap_or(0)
    )
}

/// Ids for the enabled rows of `rows`, in document order.
pub fn sequenced_rows(rows: &[MatrixRow]) -> Vec<(String, &MatrixRow)> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row.enabled)
        .map(|(index, row)| (sequenced_case_id(index + 1, row), row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bm_types::{BehaviorContext, ExpectedBehavior, Phase};

    fn row(fault: &str, component: &str) -> MatrixRow {
        MatrixRow::new(
            fault,
            component,
            BehaviorContext::new("NORMAL"),
            ExpectedBehavior::new("SAFE_STATE", "to_safe"),
        )
    }

    #[test]
    fn id_format() {
        let r = row("FI.BMS.OVERVOLT", "COMP.BMS").with_event_type(1);
        assert_eq!(sequenced_case_id(1, &r), "TC_001_COMP_BMS_FI_BMS_OVERVOLT_TRA_E1");

        let r = row("fi-x", "comp y").with_phase(Phase::Recovery);
        assert_eq!(sequenced_case_id(12, &r), "TC_012_COMP_Y_FI_X_REC_E0");
    }

    #[test]
    fn disabled_rows_consume_numbers() {
        let rows = vec![
            row("F1", "C").with_event_type(1),
            row("F2", "C").with_enabled(false),
            row("F3", "C").with_event_type(3).with_phase(Phase::Recovery),
        ];
        let ids: Vec<String> = sequenced_rows(&rows).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["TC_001_C_F1_TRA_E1", "TC_003_C_F3_REC_E3"]);
    }
}
