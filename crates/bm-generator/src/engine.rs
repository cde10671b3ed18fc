//! Candidate generation engine.

use bm_types::{BatchKey, Candidate, MatrixRow, Phase, Policy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::canonical::content_hash;
use crate::error::{GenerateError, GenerateResult};

/// Hash input for one row and phase.
///
/// Recovery scenarios start from the transition's end state and warm from the
/// fault that caused it; everything else is copied from the row.
fn scenario(row: &MatrixRow, phase: Phase, seed: i64) -> Value {
    let context = match phase {
        Phase::Transition => json!({
            "start_state": row.context.start_state,
            "warm_from_fault_id": row.context.warm_from_fault_id,
        }),
        Phase::Recovery => json!({
            "start_state": row.expect.end_state,
            "warm_from_fault_id": row.fault_id,
        }),
    };
    json!({
        "fault_id": row.fault_id,
        "component_id": row.component_id,
        "context": context,
        "expect": {
            "end_state": row.expect.end_state,
            "transition_name": row.expect.transition_name,
        },
        "timing": {
            "max_time_ms": row.timing.max_time_ms,
            "tolerance_ms": row.timing.tolerance_ms,
            "measurement_uncertainty": row.timing.measurement_uncertainty,
        },
        "paramset": {},
        "phase": phase.as_str(),
        "seed": seed,
    })
}

/// Content address of the `phase` scenario of `row` under `seed`.
pub fn candidate_id(row: &MatrixRow, phase: Phase, seed: i64) -> String {
    content_hash(&scenario(row, phase, seed))
}

/// Build the `phase` candidate of `row`.
pub fn candidate_for(row: &MatrixRow, phase: Phase, seed: i64) -> Candidate {
    let (start_state, warm_from_fault_id) = match phase {
        Phase::Transition => (
            row.context.start_state.clone(),
            row.context.warm_from_fault_id.clone(),
        ),
        Phase::Recovery => (row.expect.end_state.clone(), Some(row.fault_id.clone())),
    };
    Candidate {
        tc_id: candidate_id(row, phase, seed),
        phase,
        fault_id: row.fault_id.clone(),
        component_id: row.component_id.clone(),
        start_state,
        warm_from_fault_id,
        end_state: row.expect.end_state.clone(),
        transition_name: row.expect.transition_name.clone(),
        monitors: row.monitor_ids().into_iter().map(String::from).collect(),
        max_time_ms: row.timing.max_time_ms,
        tolerance_ms: row.timing.tolerance_ms,
        priority: row.priority,
        batch_key: BatchKey(row.fault_id.clone(), row.component_id.clone()),
    }
}

/// Generates ranked candidates under a fixed [`Policy`].
///
/// Output is a pure function of the rows and the policy: the tie-break
/// generator is seeded from `policy.seed` on every call and draws once per
/// emitted candidate, in emission order.
#[derive(Clone, Debug)]
pub struct CandidateGenerator {
    policy: Policy,
}

impl CandidateGenerator {
    pub fn new(policy: Policy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Emit, rank and truncate candidates for `rows`.
    pub fn generate(&self, rows: &[MatrixRow]) -> Vec<Candidate> {
        let policy = &self.policy;
        let mut emitted = Vec::new();
        for row in rows {
            if row.priority < policy.min_priority {
                debug!(
                    fault_id = %row.fault_id,
                    priority = row.priority,
                    "row below min_priority"
                );
                continue;
            }
            for &phase in Phase::all() {
                if policy.includes(phase) {
                    emitted.push(candidate_for(row, phase, policy.seed));
                }
            }
        }

        let mut rng = StdRng::seed_from_u64(policy.seed as u64);
        let mut ranked: Vec<(Candidate, f64)> = emitted
            .into_iter()
            .map(|candidate| {
                let draw: f64 = rng.gen();
                (candidate, draw)
            })
            .collect();

        ranked.sort_by(|(a, draw_a), (b, draw_b)| {
            b.priority
                .total_cmp(&a.priority)
                .then(draw_a.total_cmp(draw_b))
                .then_with(|| a.tc_id.cmp(&b.tc_id))
        });

        let emitted_count = ranked.len();
        if let Some(cap) = policy.max_candidates {
            ranked.truncate(cap);
        }

        info!(
            rows = rows.len(),
            emitted = emitted_count,
            kept = ranked.len(),
            seed = policy.seed,
            "generated candidates"
        );
        ranked.into_iter().map(|(candidate, _)| candidate).collect()
    }

    /// Decode raw rows, then [`generate`](Self::generate).
    ///
    /// Rows are decoded but not validated; a row that cannot be decoded
    /// fails the whole call.
    pub fn generate_raw(&self, rows: &[Value]) -> GenerateResult<Vec<Candidate>> {
        let decoded = rows
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                serde_json::from_value::<MatrixRow>(raw.clone()).map_err(|e| {
                    GenerateError::MalformedRow {
                        index,
                        message: e.to_string(),
                    }
                })
            })
            .collect::<GenerateResult<Vec<_>>>()?;
        Ok(self.generate(&decoded))
    }
}

/// Generate candidates for `rows` with `seed` and an optional policy mapping.
///
/// A `seed` key inside the mapping takes precedence over `seed`.
pub fn generate(rows: &[MatrixRow], seed: i64, policy: Option<&Value>) -> GenerateResult<Vec<Candidate>> {
    let policy = Policy::from_value(policy, seed)?;
    Ok(CandidateGenerator::new(policy).generate(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bm_types::{BehaviorContext, ExpectedBehavior, TimingBudget};
    use std::collections::HashSet;

    fn row(fault: &str, component: &str, priority: f64) -> MatrixRow {
        MatrixRow::new(
            fault,
            component,
            BehaviorContext::new("NORMAL"),
            ExpectedBehavior::new("SAFE_STATE", "to_safe"),
        )
        .with_monitor("MON.VOLT")
        .with_timing(TimingBudget {
            max_time_ms: 50,
            tolerance_ms: 5,
            measurement_uncertainty: 1,
        })
        .with_priority(priority)
    }

    fn sample() -> Vec<MatrixRow> {
        vec![
            row("FI.BMS.OVERVOLT", "COMP.BMS", 0.9),
            row("FI.MCU.OVERTEMP", "COMP.MCU", 0.7),
            row("FI.CAN.TIMEOUT", "COMP.GW", 0.3),
        ]
    }

    #[test]
    fn same_inputs_same_output() {
        let rows = sample();
        let a = generate(&rows, 42, None).unwrap();
        let b = generate(&rows, 42, None).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 6);
    }

    #[test]
    fn ids_unique_hex_and_seed_dependent() {
        let rows = sample();
        let a = generate(&rows, 42, None).unwrap();
        let ids: HashSet<&str> = a.iter().map(|c| c.tc_id.as_str()).collect();
        assert_eq!(ids.len(), a.len());
        assert!(a
            .iter()
            .all(|c| c.tc_id.len() == 64 && c.tc_id.chars().all(|ch| ch.is_ascii_hexdigit())));

        let b = generate(&rows, 43, None).unwrap();
        let other: HashSet<&str> = b.iter().map(|c| c.tc_id.as_str()).collect();
        assert!(ids.is_disjoint(&other));
    }

    #[test]
    fn cosmetic_fields_do_not_change_id() {
        let plain = row("F1", "C1", 0.5);
        let decorated = plain.clone().with_notes("note").with_tags(["x", "y"]);
        assert_eq!(
            candidate_id(&plain, Phase::Transition, 1),
            candidate_id(&decorated, Phase::Transition, 1)
        );

        let mut retimed = plain.clone();
        retimed.timing.max_time_ms = 51;
        assert_ne!(
            candidate_id(&plain, Phase::Transition, 1),
            candidate_id(&retimed, Phase::Transition, 1)
        );
    }

    #[test]
    fn recovery_candidate_warms_from_fault() {
        let r = row("F1", "C1", 0.5);
        let c = candidate_for(&r, Phase::Recovery, 7);
        assert_eq!(c.start_state, "SAFE_STATE");
        assert_eq!(c.warm_from_fault_id.as_deref(), Some("F1"));
        assert_eq!(c.end_state, "SAFE_STATE");
        assert_eq!(c.batch_key, BatchKey("F1".into(), "C1".into()));
        assert_ne!(c.tc_id, candidate_for(&r, Phase::Transition, 7).tc_id);
    }

    #[test]
    fn ordered_by_priority_descending() {
        let out = generate(&sample(), 42, None).unwrap();
        let priorities: Vec<f64> = out.iter().map(|c| c.priority).collect();
        assert!(priorities.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(out[0].fault_id, "FI.BMS.OVERVOLT");
        assert_eq!(out[5].fault_id, "FI.CAN.TIMEOUT");
    }

    #[test]
    fn min_priority_and_phase_filters() {
        let policy = serde_json::json!({"min_priority": 0.5, "include_recovery": false});
        let out = generate(&sample(), 42, Some(&policy)).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|c| c.phase == Phase::Transition));
        assert!(out.iter().all(|c| c.priority >= 0.5));
    }

    #[test]
    fn truncation_keeps_highest_ranked() {
        let rows = sample();
        let full = generate(&rows, 42, Some(&serde_json::json!({"max_candidates": null}))).unwrap();
        let capped = generate(&rows, 42, Some(&serde_json::json!({"max_candidates": 3}))).unwrap();
        assert_eq!(capped.len(), 3);
        assert_eq!(capped[..], full[..3]);

        let none = generate(&rows, 42, Some(&serde_json::json!({"max_candidates": 0}))).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn empty_rows_yield_empty_output() {
        assert!(generate(&[], 42, None).unwrap().is_empty());
    }

    #[test]
    fn policy_seed_overrides_argument() {
        let rows = sample();
        let a = generate(&rows, 1, Some(&serde_json::json!({"seed": 42}))).unwrap();
        let b = generate(&rows, 42, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn raw_rows_decode_or_fail() {
        let generator = CandidateGenerator::new(Policy::new(42));
        let good = serde_json::to_value(row("F1", "C1", 0.5)).unwrap();
        assert_eq!(generator.generate_raw(&[good.clone()]).unwrap().len(), 2);

        let mut bad = good;
        bad.as_object_mut().unwrap().remove("timing");
        let err = generator.generate_raw(&[bad]).unwrap_err();
        assert!(matches!(err, GenerateError::MalformedRow { index: 0, .. }));
    }

    #[test]
    fn ids_pinned_for_non_ascii_row() {
        let r = MatrixRow::new(
            "FI.BMS.\u{dc}BER",
            "COMP.BMS",
            BehaviorContext::new("NORMAL"),
            ExpectedBehavior::new("SAFE_STATE", "t\u{1f600}"),
        )
        .with_monitor("MON.VOLT")
        .with_timing(TimingBudget {
            max_time_ms: 50,
            tolerance_ms: 0,
            measurement_uncertainty: 1,
        });
        assert_eq!(
            candidate_id(&r, Phase::Transition, 42),
            "c8ec6e76f3e8271d5429ef13bca192f5c1c645674ee7fe38f7af6228d57dbfa7"
        );
        assert_eq!(
            candidate_id(&r, Phase::Recovery, 42),
            "8390048130995b6a1f83efae061b6ab36ce915bea7f68491ee81b466f38880f9"
        );
    }

    #[test]
    fn negative_seeds_hash_and_rank() {
        let rows = sample();
        let r = &rows[0];
        assert_ne!(
            candidate_id(r, Phase::Transition, -1),
            candidate_id(r, Phase::Transition, 1)
        );

        let a = generate(&rows, 0, Some(&serde_json::json!({"seed": -7}))).unwrap();
        let b = generate(&rows, -7, None).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 6);
        assert_eq!(a[0].tc_id, candidate_id(r, a[0].phase, -7));
    }

    #[test]
    fn bad_policy_is_an_error() {
        let err = generate(&sample(), 42, Some(&serde_json::json!("all"))).unwrap_err();
        assert!(matches!(err, GenerateError::Policy(_)));
    }
}
