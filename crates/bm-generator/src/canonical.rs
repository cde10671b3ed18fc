//! Canonical encoding and content hashing.
//!
//! The encoding is only ever hashed, never parsed back:
//!
//! - mapping entries whose value is null, `[]` or `{}` are dropped, and the
//!   same values are dropped from lists, recursively
//! - keys are sorted
//! - no whitespace between tokens
//! - strings are ASCII-only, everything outside `' '..='~'` escaped as
//!   `\uXXXX` (UTF-16 units, lowercase hex)

use std::fmt::Write as _;

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

fn is_vacant(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Drop null, empty-list and empty-mapping values, recursively.
///
/// Vacancy is judged before recursing, so a mapping that only becomes empty
/// after stripping is kept as `{}`.
pub fn strip_empty(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, v)| !is_vacant(v))
                .map(|(k, v)| (k.clone(), strip_empty(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .filter(|v| !is_vacant(v))
                .map(strip_empty)
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Canonical text of `value` after [`strip_empty`].
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, &strip_empty(value));
    out
}

/// Lowercase hex SHA-256 of the canonical text.
pub fn content_hash(value: &Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_json(value).as_bytes());
    format!("{:x}", hasher.finalize())
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => {
            let _ = write!(out, "{}", n);
        }
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, key);
                out.push(':');
                write_value(out, &map[key]);
            }
            out.push('}');
        }
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            ' '..='~' => out.push(ch),
            _ => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{:04x}", unit);
                }
            }
        }
    }
    out.push('"');
}
