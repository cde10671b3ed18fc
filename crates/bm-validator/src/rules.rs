//! Business rules evaluated over structurally valid rows.

use std::collections::{HashMap, HashSet};

use bm_types::{MatrixRow, RowKey};

use crate::error::{DuplicatePair, SchemaViolation};

/// Rows that list the same monitor id more than once.
pub fn monitor_duplicates(rows: &[MatrixRow]) -> Vec<SchemaViolation> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| {
            let ids = row.monitor_ids();
            let distinct: HashSet<&str> = ids.iter().copied().collect();
            distinct.len() != ids.len()
        })
        .map(|(index, _)| {
            SchemaViolation::new(
                format!("/matrix/{}/monitors", index),
                "duplicate monitor_id entries are not allowed",
            )
        })
        .collect()
}

/// Pairs of rows sharing an identity tuple.
///
/// Every repeat is paired with the first row that carried the key, never with
/// an intermediate repeat.
pub fn identity_duplicates(rows: &[MatrixRow]) -> Vec<DuplicatePair> {
    let mut seen: HashMap<RowKey, usize> = HashMap::new();
    let mut duplicates = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        match seen.get(&row.key()) {
            Some(&first) => duplicates.push(DuplicatePair {
                first,
                duplicate: index,
            }),
            None => {
                seen.insert(row.key(), index);
            }
        }
    }
    duplicates
}
