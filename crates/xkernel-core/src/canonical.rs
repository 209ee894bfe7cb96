//! Canonical JSON encoding for deterministic hashing.
//!
//! Every content address is SHA-256 over these bytes, so two implementations
//! agree on an id only if they agree on the encoding byte for byte:
//! - Object keys sorted by code point at every level
//! - No insignificant whitespace (`{"a":1,"b":[2,3]}`)
//! - `"` and `\` escaped; `\b \f \n \r \t` as short escapes; other control
//!   characters as `\u00xx` (lowercase hex)
//! - Everything else written raw as UTF-8, no trailing newline
//! - Integers only
//!
//! **This encoding is frozen.** Changing it changes every execution and
//! receipt id.

use std::io::Write;

use crate::execution::{Execution, StateVector, Step};
use crate::value::{Map, Value};

/// Spec tag embedded in every encoded execution.
pub const EXECUTION_SPEC: &str = "XKERNEL_INVARIANTS_kK_SPEC_V1";

/// Version tag embedded in every encoded execution.
pub const EXECUTION_VERSION: &str = "1.0.0-draft";

/// Envelope and field names.
mod keys {
    pub const SPEC: &str = "spec";
    pub const VERSION: &str = "version";
    pub const EXECUTION: &str = "execution";
    pub const INIT: &str = "init";
    pub const STEPS: &str = "steps";
    pub const FINAL: &str = "final";
    pub const CLAIMS: &str = "claims";
    pub const COORDS: &str = "coords";
    pub const META: &str = "meta";
    pub const ID: &str = "id";
    pub const DELTA: &str = "delta";
    pub const ACTION: &str = "action";
    pub const WITNESS: &str = "witness";
}

/// Project a state vector to `{"coords": [...], "meta": {...}}`.
pub fn state_to_value(state: &StateVector) -> Value {
    Value::map([
        (keys::COORDS, Value::ints(state.coords())),
        (keys::META, Value::Map(state.meta().clone())),
    ])
}

/// Project a step to `{"id", "delta", "action", "witness"}`.
pub fn step_to_value(step: &Step) -> Value {
    Value::map([
        (keys::ID, Value::from(step.id())),
        (keys::DELTA, state_to_value(step.delta())),
        (keys::ACTION, Value::Int(step.action())),
        (keys::WITNESS, Value::Map(step.witness().clone())),
    ])
}

/// Project an execution into its JSON-native envelope:
/// `{"spec", "version", "execution": {"init", "steps", "final", "claims"}}`.
pub fn execution_to_value(execution: &Execution) -> Value {
    let mut body = Map::new();
    body.insert(keys::INIT.into(), state_to_value(execution.init()));
    body.insert(
        keys::STEPS.into(),
        Value::Seq(execution.steps().iter().map(step_to_value).collect()),
    );
    body.insert(keys::FINAL.into(), state_to_value(execution.final_state()));
    body.insert(keys::CLAIMS.into(), Value::Map(execution.claims().clone()));

    Value::map([
        (keys::SPEC, Value::from(EXECUTION_SPEC)),
        (keys::VERSION, Value::from(EXECUTION_VERSION)),
        (keys::EXECUTION, Value::Map(body)),
    ])
}

/// Canonical bytes of an execution. This is the execution hash preimage.
pub fn canonical_bytes(execution: &Execution) -> Vec<u8> {
    canonical_json_bytes(&execution_to_value(execution))
}

/// Canonical JSON bytes of any JSON-safe value.
pub fn canonical_json_bytes(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    write_value(&mut buf, value);
    buf
}

fn write_value(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Null => buf.extend_from_slice(b"null"),
        Value::Bool(true) => buf.extend_from_slice(b"true"),
        Value::Bool(false) => buf.extend_from_slice(b"false"),
        Value::Int(i) => {
            let _ = write!(buf, "{i}");
        }
        Value::Str(s) => write_string(buf, s),
        Value::Seq(items) => {
            buf.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_value(buf, item);
            }
            buf.push(b']');
        }
        Value::Map(map) => {
            // BTreeMap<String, _> iterates in byte order, which for UTF-8
            // is code point order.
            buf.push(b'{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_string(buf, key);
                buf.push(b':');
                write_value(buf, item);
            }
            buf.push(b'}');
        }
    }
}

fn write_string(buf: &mut Vec<u8>, s: &str) {
    buf.push(b'"');
    for ch in s.chars() {
        match ch {
            '"' => buf.extend_from_slice(b"\\\""),
            '\\' => buf.extend_from_slice(b"\\\\"),
            '\n' => buf.extend_from_slice(b"\\n"),
            '\r' => buf.extend_from_slice(b"\\r"),
            '\t' => buf.extend_from_slice(b"\\t"),
            '\u{0008}' => buf.extend_from_slice(b"\\b"),
            '\u{000c}' => buf.extend_from_slice(b"\\f"),
            c if c < '\u{0020}' => {
                let _ = write!(buf, "\\u{:04x}", c as u32);
            }
            c => {
                let mut utf8 = [0u8; 4];
                buf.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
            }
        }
    }
    buf.push(b'"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn enc(v: serde_json::Value) -> String {
        String::from_utf8(canonical_json_bytes(&Value::try_from(v).unwrap())).unwrap()
    }

    fn unit_walk(final_coords: Vec<i64>) -> Execution {
        let step = |id: &str, d: Vec<i64>| {
            Step::new(id, StateVector::from_coords(d).unwrap(), 1, Map::new()).unwrap()
        };
        Execution::new(
            StateVector::from_coords(vec![0, 0]).unwrap(),
            vec![step("s1", vec![1, 0]), step("s2", vec![0, 1])],
            StateVector::from_coords(final_coords).unwrap(),
            Map::new(),
        )
    }

    #[test]
    fn test_sorted_keys_nested() {
        assert_eq!(
            enc(json!({"b": {"d": 1, "c": 2}, "a": 3})),
            r#"{"a":3,"b":{"c":2,"d":1}}"#
        );
    }

    #[test]
    fn test_compact_scalars() {
        assert_eq!(
            enc(json!([null, true, false, -7, 0, "x"])),
            r#"[null,true,false,-7,0,"x"]"#
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            enc(json!("q\"b\\n\nt\tr\rb\u{8}f\u{c}c\u{1}e\u{7f}é")),
            "\"q\\\"b\\\\n\\nt\\tr\\rb\\bf\\fc\\u0001e\u{7f}é\""
        );
    }

    #[test]
    fn test_non_ascii_keys_sort_by_code_point() {
        assert_eq!(enc(json!({"é": 1, "z": 2, "A": 3})), r#"{"A":3,"z":2,"é":1}"#);
    }

    #[test]
    fn test_matches_serde_json_for_plain_values() {
        let raw = json!({"m": {"y": [1, 2, {"k": null}]}, "a": "text\twith\u{1f}ctl"});
        let ours = canonical_json_bytes(&Value::try_from(raw.clone()).unwrap());
        assert_eq!(ours, serde_json::to_vec(&raw).unwrap());
    }

    #[test]
    fn test_execution_envelope() {
        let bytes = canonical_bytes(&unit_walk(vec![1, 1]));
        let expected = concat!(
            r#"{"execution":{"claims":{},"final":{"coords":[1,1],"meta":{}},"#,
            r#""init":{"coords":[0,0],"meta":{}},"steps":["#,
            r#"{"action":1,"delta":{"coords":[1,0],"meta":{}},"id":"s1","witness":{}},"#,
            r#"{"action":1,"delta":{"coords":[0,1],"meta":{}},"id":"s2","witness":{}}]},"#,
            r#""spec":"XKERNEL_INVARIANTS_kK_SPEC_V1","version":"1.0.0-draft"}"#
        );
        assert_eq!(String::from_utf8(bytes).unwrap(), expected);
    }

    #[test]
    fn test_canonical_bytes_deterministic() {
        let e = unit_walk(vec![1, 1]);
        assert_eq!(canonical_bytes(&e), canonical_bytes(&e));
        assert_ne!(canonical_bytes(&e), canonical_bytes(&unit_walk(vec![2, 2])));
    }

    #[test]
    fn test_no_trailing_newline() {
        let bytes = canonical_bytes(&unit_walk(vec![1, 1]));
        assert_eq!(bytes.first(), Some(&b'{'));
        assert_eq!(bytes.last(), Some(&b'}'));
    }

    proptest! {
        #[test]
        fn prop_strings_encode_like_serde_json(s: String) {
            let ours = canonical_json_bytes(&Value::Str(s.clone()));
            prop_assert_eq!(ours, serde_json::to_vec(&s).unwrap());
        }

        #[test]
        fn prop_ints_encode_like_serde_json(i: i64) {
            prop_assert_eq!(canonical_json_bytes(&Value::Int(i)), i.to_string().into_bytes());
        }
    }
}
