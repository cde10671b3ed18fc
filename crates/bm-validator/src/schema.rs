//! Structural checks of a raw matrix document.
//!
//! The row schema is a Draft 2020-12 JSON Schema compiled once on first use.
//! Every violation is collected with the JSON pointer of the offending value
//! and ordered by row, then by the position of the field within the row.

use std::sync::LazyLock;

use serde_json::{json, Value};

use crate::error::SchemaViolation;

/// Row fields in document order; drives the ordering of violations.
const ROW_FIELDS: &[&str] = &[
    "fault_id",
    "component_id",
    "context",
    "expect",
    "monitors",
    "timing",
    "priority",
    "trace",
    "version",
    "notes",
    "tags",
    "enabled",
    "phase",
    "asil",
    "event_type",
    "event_family",
    "iso",
];

/// The behavior matrix document schema.
pub fn matrix_schema() -> Value {
    let non_empty = json!({"type": "string", "minLength": 1});
    let unique_strings = json!({
        "type": "array",
        "items": {"type": "string"},
        "uniqueItems": true
    });

    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "https://github.com/mapleaiorg/maple/behavior-matrix.schema.json",
        "type": "object",
        "required": ["matrix"],
        "properties": {
            "matrix": {
                "type": "array",
                "minItems": 1,
                "items": {
                    "type": "object",
                    "required": [
                        "fault_id",
                        "component_id",
                        "context",
                        "expect",
                        "monitors",
                        "timing",
                        "priority",
                        "trace",
                        "version"
                    ],
                    "properties": {
                        "fault_id": non_empty,
                        "component_id": non_empty,
                        "context": {
                            "type": "object",
                            "required": ["start_state", "warm_from_fault_id"],
                            "properties": {
                                "start_state": non_empty,
                                "warm_from_fault_id": {"type": ["string", "null"]}
                            },
                            "additionalProperties": false
                        },
                        "expect": {
                            "type": "object",
                            "required": ["end_state", "transition_name"],
                            "properties": {
                                "end_state": non_empty,
                                "transition_name": non_empty
                            },
                            "additionalProperties": false
                        },
                        "monitors": {
                            "type": "array",
                            "minItems": 1,
                            "items": {
                                "anyOf": [
                                    non_empty,
                                    {
                                        "type": "object",
                                        "required": ["id", "plugin"],
                                        "properties": {
                                            "id": non_empty,
                                            "plugin": non_empty,
                                            "params": {"type": "object"}
                                        },
                                        "additionalProperties": false
                                    }
                                ]
                            }
                        },
                        "timing": {
                            "type": "object",
                            "required": ["max_time_ms", "tolerance_ms", "measurement_uncertainty"],
                            "properties": {
                                "max_time_ms": {"type": "integer", "minimum": 1},
                                "tolerance_ms": {"type": "integer", "minimum": 0},
                                "measurement_uncertainty": {"type": "integer", "minimum": 0}
                            },
                            "additionalProperties": false
                        },
                        "priority": {"type": "number", "minimum": 0.0, "maximum": 1.0},
                        "trace": {
                            "type": "object",
                            "required": ["req_ids"],
                            "properties": {"req_ids": unique_strings},
                            "additionalProperties": false
                        },
                        "version": {"type": "string", "pattern": "^[0-9]+\\.[0-9]+\\.[0-9]+$"},
                        "notes": {"type": "string"},
                        "tags": unique_strings,
                        "enabled": {"type": "boolean"},
                        "phase": {"enum": ["transition", "recovery"]},
                        "asil": {"enum": ["QM", "A", "B", "C", "D"]},
                        "event_type": {"type": "integer", "minimum": 0, "maximum": u32::MAX},
                        "event_family": {"type": "string"},
                        "iso": {
                            "type": "object",
                            "properties": {
                                "environments": unique_strings,
                                "methods": {
                                    "type": "object",
                                    "properties": {"test": unique_strings},
                                    "additionalProperties": false
                                }
                            },
                            "additionalProperties": false
                        }
                    },
                    "additionalProperties": false
                }
            }
        },
        "additionalProperties": false
    })
}

static MATRIX_VALIDATOR: LazyLock<jsonschema::Validator> = LazyLock::new(|| {
    jsonschema::options()
        .with_draft(jsonschema::Draft::Draft202012)
        .build(&matrix_schema())
        .expect("matrix schema is valid")
});

/// Check a whole document and return every violation found.
pub fn check_document(document: &Value) -> Vec<SchemaViolation> {
    let mut violations: Vec<SchemaViolation> = MATRIX_VALIDATOR
        .iter_errors(document)
        .map(|error| SchemaViolation::new(error.instance_path.to_string(), error.to_string()))
        .collect();
    violations.sort_by_key(|v| document_position(&v.pointer));
    violations
}

/// `(row index, field rank)` of a pointer. Document-level pointers sort
/// first, row-level ones before any of the row's fields.
fn document_position(pointer: &str) -> (Option<usize>, usize) {
    let mut tokens = pointer.split('/').skip(1);
    if tokens.next() != Some("matrix") {
        return (None, 0);
    }
    let Some(row) = tokens.next().and_then(|t| t.parse::<usize>().ok()) else {
        return (None, 0);
    };
    let rank = match tokens.next() {
        None => 0,
        Some(field) => ROW_FIELDS
            .iter()
            .position(|f| *f == field)
            .map_or(ROW_FIELDS.len() + 1, |p| p + 1),
    };
    (Some(row), rank)
}

/// Rewrite integral floats (`50.0`) in integer-typed fields as integers.
///
/// The schema accepts them as integers, typed decoding into `u64` does not.
pub fn normalize_integers(row: &mut Value) {
    if let Some(timing) = row.get_mut("timing").and_then(Value::as_object_mut) {
        timing.values_mut().for_each(integral_to_integer);
    }
    if let Some(event_type) = row.get_mut("event_type") {
        integral_to_integer(event_type);
    }
}

fn integral_to_integer(value: &mut Value) {
    let integral = match value {
        Value::Number(n) if n.is_f64() => n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0),
        _ => None,
    };
    if let Some(f) = integral {
        *value = Value::from(f as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_row() -> Value {
        json!({
            "fault_id": "FI.BMS.OVERVOLT",
            "component_id": "COMP.BMS",
            "context": {"start_state": "NORMAL", "warm_from_fault_id": null},
            "expect": {"end_state": "SAFE_STATE", "transition_name": "overvolt_to_safe"},
            "monitors": ["MON.VOLT", {"id": "MON.STATE", "plugin": "state"}],
            "timing": {"max_time_ms": 50, "tolerance_ms": 5, "measurement_uncertainty": 1},
            "priority": 0.8,
            "trace": {"req_ids": ["REQ-001"]},
            "version": "1.0.0"
        })
    }

    fn pointers(violations: &[SchemaViolation]) -> Vec<&str> {
        violations.iter().map(|v| v.pointer.as_str()).collect()
    }

    #[test]
    fn valid_document_has_no_violations() {
        let doc = json!({"matrix": [valid_row()]});
        assert!(check_document(&doc).is_empty());
    }

    #[test]
    fn optional_attributes_accepted() {
        let mut row = valid_row();
        let obj = row.as_object_mut().unwrap();
        obj.insert("enabled".into(), json!(false));
        obj.insert("phase".into(), json!("recovery"));
        obj.insert("asil".into(), json!("D"));
        obj.insert("event_type".into(), json!(3));
        obj.insert("event_family".into(), json!("voltage"));
        obj.insert("iso".into(), json!({"environments": ["HIL"], "methods": {"test": ["fault-injection"]}}));
        obj.insert("notes".into(), json!("n"));
        obj.insert("tags".into(), json!(["a", "b"]));
        let doc = json!({"matrix": [row]});
        assert!(check_document(&doc).is_empty());
    }

    #[test]
    fn integral_floats_are_integers() {
        let mut row = valid_row();
        row["timing"]["max_time_ms"] = json!(50.0);
        row["event_type"] = json!(2.0);
        assert!(check_document(&json!({"matrix": [row]})).is_empty());

        let mut fractional = valid_row();
        fractional["timing"]["max_time_ms"] = json!(50.5);
        let violations = check_document(&json!({"matrix": [fractional]}));
        assert_eq!(pointers(&violations), vec!["/matrix/0/timing/max_time_ms"]);
    }

    #[test]
    fn normalize_rewrites_integer_fields_only() {
        let mut row = valid_row();
        row["timing"]["max_time_ms"] = json!(50.0);
        row["event_type"] = json!(2.0);
        row["priority"] = json!(1.0);
        normalize_integers(&mut row);

        assert!(row["timing"]["max_time_ms"].is_u64());
        assert_eq!(row["timing"]["max_time_ms"], json!(50));
        assert_eq!(row["event_type"], json!(2));
        assert!(row["priority"].is_f64());
    }

    #[test]
    fn missing_matrix_key() {
        let violations = check_document(&json!({}));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].pointer, "");
        assert!(violations[0].message.contains("matrix"));
        assert!(violations[0].message.contains("required"));
    }

    #[test]
    fn empty_matrix_rejected() {
        let violations = check_document(&json!({"matrix": []}));
        assert_eq!(pointers(&violations), vec!["/matrix"]);
    }

    #[test]
    fn violations_collected_across_rows() {
        let mut bad_version = valid_row();
        bad_version["version"] = json!("1.0");
        let mut bad_timing = valid_row();
        bad_timing["timing"]["max_time_ms"] = json!(0);
        let mut bad_priority = valid_row();
        bad_priority["priority"] = json!(1.5);
        bad_priority["version"] = json!("1.0");

        let doc = json!({"matrix": [bad_version, bad_timing, valid_row(), bad_priority]});
        let violations = check_document(&doc);
        assert_eq!(
            pointers(&violations),
            vec![
                "/matrix/0/version",
                "/matrix/1/timing/max_time_ms",
                "/matrix/3/priority",
                "/matrix/3/version",
            ]
        );
        assert!(violations[1].message.contains("minimum"));
    }

    #[test]
    fn missing_and_unknown_fields_reported() {
        let mut row = valid_row();
        let obj = row.as_object_mut().unwrap();
        obj.remove("timing");
        obj.insert("colour".into(), json!("red"));
        let violations = check_document(&json!({"matrix": [row]}));
        assert_eq!(pointers(&violations), vec!["/matrix/0", "/matrix/0"]);
        assert!(violations.iter().any(|v| v.message.contains("timing")));
        assert!(violations.iter().any(|v| v.message.contains("colour")));
    }

    #[test]
    fn warm_start_key_is_required() {
        let mut row = valid_row();
        row["context"] = json!({"start_state": "NORMAL"});
        let violations = check_document(&json!({"matrix": [row]}));
        assert_eq!(pointers(&violations), vec!["/matrix/0/context"]);
    }

    #[test]
    fn type_mismatches_reported() {
        let mut row = valid_row();
        row["timing"]["tolerance_ms"] = json!(2.5);
        row["monitors"] = json!([""]);
        row["component_id"] = json!(5);
        row["fault_id"] = json!("");
        let violations = check_document(&json!({"matrix": [row]}));
        assert_eq!(
            pointers(&violations),
            vec![
                "/matrix/0/fault_id",
                "/matrix/0/component_id",
                "/matrix/0/monitors/0",
                "/matrix/0/timing/tolerance_ms",
            ]
        );
    }

    #[test]
    fn duplicate_req_ids_and_bad_asil_rejected() {
        let mut row = valid_row();
        row["asil"] = json!("E");
        row["trace"]["req_ids"] = json!(["REQ-1", "REQ-1"]);
        let violations = check_document(&json!({"matrix": [row]}));
        assert_eq!(
            pointers(&violations),
            vec!["/matrix/0/trace/req_ids", "/matrix/0/asil"]
        );
    }

    #[test]
    fn monitor_spec_objects_are_closed() {
        let mut row = valid_row();
        row["monitors"] = json!([{"id": "MON.A", "plugin": "range", "colour": "red"}, {"id": "MON.B"}]);
        let violations = check_document(&json!({"matrix": [row]}));
        assert_eq!(pointers(&violations), vec!["/matrix/0/monitors/0", "/matrix/0/monitors/1"]);
    }

    #[test]
    fn violations_order_by_row_then_field() {
        assert_eq!(document_position(""), (None, 0));
        assert_eq!(document_position("/matrix"), (None, 0));
        assert_eq!(document_position("/matrix/4"), (Some(4), 0));
        assert!(document_position("/matrix/0/fault_id") < document_position("/matrix/0/iso/methods"));
        assert!(document_position("/matrix/0/iso") < document_position("/matrix/1"));
    }
}
