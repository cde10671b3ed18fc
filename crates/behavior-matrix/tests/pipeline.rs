//! End-to-end pipeline tests over the sample matrix.

use std::sync::Arc;

use behavior_matrix::generator::{candidate_id, sequenced_rows};
use behavior_matrix::harness::{HarnessResult, MonitorResult};
use behavior_matrix::reports::{CoverageStatus, UNSPECIFIED};
use behavior_matrix::types::{MonitorSpec, Phase};
use behavior_matrix::validator::ValidationErrorKind;
use behavior_matrix::{Engine, EngineConfig, ErrorKind, MonitorPlugin, TestCase};
use serde_json::{json, Value};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn sample() -> Value {
    serde_json::from_str(include_str!("fixtures/sample_matrix.json")).expect("fixture parses")
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn sample_matrix_validates() {
    init_tracing();
    let matrix = Engine::new().validate(&sample()).unwrap();
    assert_eq!(matrix.len(), 4);
    assert_eq!(matrix.enabled_rows().count(), 3);
    assert_eq!(matrix.rows()[1].phase, Phase::Recovery);
}

#[test]
fn duplicated_row_reports_one_pair() {
    let mut doc = sample();
    let first = doc["matrix"][0].clone();
    doc["matrix"].as_array_mut().unwrap().push(first);

    let err = Engine::new().validate(&doc).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateRows);
    assert_eq!(err.to_string(), "Duplicate rows detected: rows 1 and 5");
}

#[test]
fn repeated_monitor_id_is_a_schema_error() {
    let mut doc = sample();
    doc["matrix"][2]["monitors"] = json!(["timing", "timing"]);

    let err = Engine::new().validate(&doc).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    assert_eq!(
        err.to_string(),
        "/matrix/2/monitors: duplicate monitor_id entries are not allowed"
    );
}

#[test]
fn structural_violations_collected_in_document_order() {
    let mut doc = sample();
    doc["matrix"][0]["timing"]["max_time_ms"] = json!(0);
    doc["matrix"][3]["version"] = json!("1.0");
    doc["matrix"][3]["colour"] = json!("red");

    let err = Engine::new().validate(&doc).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    let behavior_matrix::EngineError::Validation(validation) = &err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(validation.kind(), ValidationErrorKind::Schema);
    let messages = validation.messages();
    assert_eq!(messages.len(), 3);
    assert!(messages[0].starts_with("/matrix/0/timing/max_time_ms:"));
    assert!(messages.iter().any(|m| m.starts_with("/matrix/3:") && m.contains("colour")));
    assert!(messages.iter().any(|m| m.starts_with("/matrix/3/version:")));
}

#[test]
fn integral_float_timing_validates_and_hashes_as_integer() {
    let engine = Engine::new();
    let mut doc = sample();
    doc["matrix"][0]["timing"]["max_time_ms"] = json!(50.0);
    doc["matrix"][0]["event_type"] = json!(1.0);

    let matrix = engine.validate(&doc).unwrap();
    assert_eq!(matrix.rows()[0].timing.max_time_ms, 50);
    assert_eq!(
        engine.generate(&matrix, None).unwrap(),
        engine.generate_document(&sample(), None).unwrap()
    );
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

#[test]
fn candidates_ranked_and_content_addressed() {
    let engine = Engine::with_config(EngineConfig::default().with_seed(42));
    let matrix = engine.validate(&sample()).unwrap();
    let candidates = engine.generate(&matrix, None).unwrap();

    // Disabled rows still produce candidates.
    assert_eq!(candidates.len(), 8);
    assert!(candidates.windows(2).all(|w| w[0].priority >= w[1].priority));

    let top = &candidates[0];
    assert_eq!(top.fault_id, "FI.BMS.OVERVOLT");
    assert_eq!(top.priority, 0.9);
    let row = &matrix.rows()[0];
    assert_eq!(top.tc_id, candidate_id(row, top.phase, 42));
    assert_eq!(top.monitors, vec!["MON.BMS.VOLT", "MON.BMS.STATE", "MON.BMS.TIME"]);
}

#[test]
fn candidates_serialize_without_loss() {
    let engine = Engine::new();
    let candidates = engine.generate_document(&sample(), Some(&json!({"seed": 7}))).unwrap();
    let text = serde_json::to_string(&candidates).unwrap();
    let back: Vec<behavior_matrix::Candidate> = serde_json::from_str(&text).unwrap();
    assert_eq!(back, candidates);
}

#[test]
fn policy_narrows_output() {
    let engine = Engine::new();
    let policy = json!({"include_transition": false, "min_priority": 0.7, "max_candidates": 1});
    let candidates = engine.generate_document(&sample(), Some(&policy)).unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].phase, Phase::Recovery);
    assert_eq!(candidates[0].priority, 0.9);
    assert_eq!(candidates[0].start_state, "SAFE_STATE");
}

#[test]
fn invalid_document_never_reaches_generation() {
    let err = Engine::new()
        .generate_document(&json!({"matrix": []}), None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

#[test]
fn sequenced_ids_skip_disabled_rows() {
    let engine = Engine::new();
    let matrix = engine.validate(&sample()).unwrap();
    let ids: Vec<String> = engine.test_cases(&matrix).into_iter().map(|c| c.tc_id).collect();
    assert_eq!(
        ids,
        vec![
            "TC_001_COMP_BMS_FI_BMS_OVERVOLT_TRA_E1",
            "TC_002_COMP_BMS_FI_BMS_OVERVOLT_REC_E1",
            "TC_004_COMP_MCU_FI_MCU_RECOVER_REC_E3",
        ]
    );
    assert_eq!(sequenced_rows(matrix.rows()).len(), 3);
}

#[test]
fn every_sample_case_passes() {
    init_tracing();
    let engine = Engine::new();
    let matrix = engine.validate(&sample()).unwrap();
    let report = engine.execute(&matrix);

    assert!(report.all_passed(), "{}", report);
    assert_eq!(report.summary.total, 3);
    assert_eq!(report.summary.passed, 3);
    let first = report.result("TC_001_COMP_BMS_FI_BMS_OVERVOLT_TRA_E1").unwrap();
    assert_eq!(first.monitor_results.len(), 3);
    assert_eq!(first.monitor_results[0].details["range"], json!([3.0, 4.5]));
}

struct VoltageLimit;

impl MonitorPlugin for VoltageLimit {
    fn name(&self) -> &str {
        "voltage_limit"
    }

    fn evaluate(&self, case: &TestCase, spec: &MonitorSpec) -> HarnessResult<MonitorResult> {
        let passed = case.row.expect.end_state == "SAFE_STATE";
        Ok(MonitorResult::new(spec, passed).with_detail("end_state", case.row.expect.end_state.as_str()))
    }
}

#[test]
fn custom_plugins_and_lookup_failures() {
    let mut doc = sample();
    doc["matrix"][0]["monitors"] = json!([{"id": "MON.BMS.LIMIT", "plugin": "voltage_limit"}]);
    doc["matrix"][3]["monitors"] = json!([{"id": "MON.MCU.LIMIT", "plugin": "voltage_limit"}]);

    let plain = Engine::new();
    let matrix = plain.validate(&doc).unwrap();
    let report = plain.execute(&matrix);
    assert_eq!(report.summary.errored, 2);
    assert_eq!(report.summary.passed, 1);

    let cases = plain.test_cases(&matrix);
    let err = plain.execute_case(&cases[0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lookup);

    let mut engine = Engine::new();
    engine.register_plugin(Arc::new(VoltageLimit));
    let report = engine.execute(&matrix);
    assert_eq!(report.summary.errored, 0);
    assert_eq!(report.summary.passed, 2);
    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.failures()[0].tc_id(), "TC_004_COMP_MCU_FI_MCU_RECOVER_REC_E3");
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

#[test]
fn projections_over_sample() {
    let engine = Engine::new();
    let matrix = engine.validate(&sample()).unwrap();
    let p = engine.projections(&matrix);

    assert_eq!(p.transitions.edges_from("NORMAL").len(), 2);
    assert_eq!(p.transitions.edges_from("SAFE_STATE")[0].phase, Phase::Recovery);

    assert_eq!(p.coverage.status("COMP.BMS", 1), CoverageStatus::Covered);
    assert_eq!(p.coverage.status("COMP.MCU", 2), CoverageStatus::Disabled);
    assert_eq!(p.coverage.status("COMP.MCU", 3), CoverageStatus::Covered);
    assert_eq!(p.coverage.status("COMP.BMS", 3), CoverageStatus::Missing);

    assert_eq!(p.traceability.faults_for("REQ-005"), ["FI.BMS.OVERVOLT", "FI.BMS.OVERVOLT"]);
    assert_eq!(p.traceability.faults_for(UNSPECIFIED), ["FI.MCU.RECOVER"]);

    assert_eq!(p.compliance.asil_count("D"), 2);
    assert_eq!(p.compliance.asil_count("C"), 2);
    assert_eq!(p.compliance.environments["HIL"], 2);

    assert_eq!(p.row_counts.count("FI.BMS.OVERVOLT", "COMP.BMS"), 2);
    let bms = p
        .timing
        .iter()
        .find(|e| e.fault_id == "FI.BMS.OVERVOLT")
        .unwrap();
    assert_eq!(bms.max_time_ms.min, 50);
    assert_eq!(bms.max_time_ms.max, 200);
    assert_eq!(bms.max_time_ms.mean, 125.0);

    let transitions = engine.projections(&matrix).transitions;
    let filtered = behavior_matrix::reports::transition_graph(matrix.rows(), Some("COMP.MCU"));
    assert!(filtered.edge_count() < transitions.edge_count());
}
