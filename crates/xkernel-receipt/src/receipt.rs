//! Receipt construction.
//!
//! A receipt restates what validation says about an execution: its content
//! address, its verdict, and optionally whether it closes on a target.
//! It is not signed and carries no authority.

use tracing::debug;

use xkernel_core::{
    closed, content_id, state_to_value, validate_execution, ContentAddress, Execution,
    StateVector, Value, Verdict,
};

use crate::hashing::receipt_id;

/// Spec tag of every receipt.
pub const RECEIPT_SPEC: &str = "XKERNEL_RECEIPT_V1";

/// Version tag of every receipt.
pub const RECEIPT_VERSION: &str = "1.0.0-draft";

/// Receipt field names.
pub(crate) mod keys {
    pub const SPEC: &str = "spec";
    pub const VERSION: &str = "version";
    pub const EXECUTION_ID: &str = "execution_id";
    pub const VERDICT: &str = "verdict";
    pub const CLOSURE: &str = "closure";
    pub const TARGET: &str = "target";
    pub const CLOSED: &str = "closed";
    pub const OK: &str = "ok";
    pub const REASON: &str = "reason";
    pub const COORDS: &str = "coords";
    pub const META: &str = "meta";
}

/// Closure result relative to a target state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Closure {
    target: StateVector,
    closed: bool,
}

impl Closure {
    pub fn target(&self) -> &StateVector {
        &self.target
    }

    pub fn closed(&self) -> bool {
        self.closed
    }
}

/// A freshly built receipt.
///
/// Only [`build_receipt`] creates one. Receipts received from elsewhere are
/// plain [`Value`] mappings and go through
/// [`verify_receipt`](crate::verify_receipt).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    execution_id: ContentAddress,
    verdict: Verdict,
    closure: Option<Closure>,
}

impl Receipt {
    pub fn execution_id(&self) -> &ContentAddress {
        &self.execution_id
    }

    pub fn verdict(&self) -> &Verdict {
        &self.verdict
    }

    pub fn closure(&self) -> Option<&Closure> {
        self.closure.as_ref()
    }

    /// The receipt as a JSON-safe mapping, the form that is emitted and hashed.
    pub fn to_value(&self) -> Value {
        let mut entries = vec![
            (keys::SPEC, Value::from(RECEIPT_SPEC)),
            (keys::VERSION, Value::from(RECEIPT_VERSION)),
            (keys::EXECUTION_ID, Value::from(self.execution_id.to_string())),
            (keys::VERDICT, self.verdict.to_value()),
        ];
        if let Some(closure) = &self.closure {
            entries.push((
                keys::CLOSURE,
                Value::map([
                    (keys::TARGET, state_to_value(&closure.target)),
                    (keys::CLOSED, Value::Bool(closure.closed)),
                ]),
            ));
        }
        Value::map(entries)
    }

    /// Content address of this receipt (`xr:sha256:...`).
    pub fn id(&self) -> ContentAddress {
        receipt_id(&self.to_value())
    }
}

/// Build a receipt for `execution`, with a closure result if `target` is given.
///
/// Every field is recomputed from the execution on each call.
pub fn build_receipt(execution: &Execution, target: Option<&StateVector>) -> Receipt {
    let execution_id = content_id(execution);
    let verdict = validate_execution(execution);
    let closure = target.map(|t| Closure {
        target: t.clone(),
        closed: closed(execution, t),
    });

    debug!(
        %execution_id,
        ok = verdict.ok(),
        reason = %verdict.reason(),
        closed = ?closure.as_ref().map(Closure::closed),
        "built receipt"
    );

    Receipt {
        execution_id,
        verdict,
        closure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xkernel_core::{canonical_json_bytes, Map, Reason, Step};

    fn sv(coords: &[i64]) -> StateVector {
        StateVector::from_coords(coords.to_vec()).unwrap()
    }

    fn sample_execution(final_coords: &[i64]) -> Execution {
        let mut claims = Map::new();
        claims.insert("intent".into(), Value::from("golden"));
        Execution::new(
            sv(&[0, 0]),
            vec![
                Step::new("s1", sv(&[1, 0]), 1, Map::new()).unwrap(),
                Step::new("s2", sv(&[0, 1]), 1, Map::new()).unwrap(),
            ],
            sv(final_coords),
            claims,
        )
    }

    #[test]
    fn test_receipt_basic_fields() {
        let e = sample_execution(&[1, 1]);
        let r = build_receipt(&e, None).to_value();

        assert_eq!(r.get("spec").and_then(Value::as_str), Some("XKERNEL_RECEIPT_V1"));
        assert_eq!(r.get("version").and_then(Value::as_str), Some("1.0.0-draft"));
        assert!(r
            .get("execution_id")
            .and_then(Value::as_str)
            .unwrap()
            .starts_with("xk:sha256:"));
        let verdict = r.get("verdict").unwrap();
        assert_eq!(verdict.get("ok"), Some(&Value::Bool(true)));
        assert_eq!(verdict.get("reason").and_then(Value::as_str), Some("OK"));
        assert!(r.get("closure").is_none());
    }

    #[test]
    fn test_receipt_with_closure() {
        let e = sample_execution(&[1, 1]);
        let receipt = build_receipt(&e, Some(&sv(&[1, 1])));
        assert_eq!(receipt.closure().map(Closure::closed), Some(true));

        let r = receipt.to_value();
        let closure = r.get("closure").unwrap();
        assert_eq!(closure.get("closed"), Some(&Value::Bool(true)));
        assert_eq!(
            closure.get("target").and_then(|t| t.get("coords")),
            Some(&Value::ints(&[1, 1]))
        );
    }

    #[test]
    fn test_receipt_for_failing_execution() {
        let e = sample_execution(&[9, 9]);
        let receipt = build_receipt(&e, Some(&sv(&[9, 9])));
        assert_eq!(receipt.verdict().reason(), Reason::ReplayMismatch);
        assert_eq!(receipt.closure().map(Closure::closed), Some(false));
    }

    #[test]
    fn test_receipt_golden_bytes() {
        let e = sample_execution(&[1, 1]);
        let bytes = canonical_json_bytes(&build_receipt(&e, Some(&sv(&[1, 1]))).to_value());
        let expected = concat!(
            r#"{"closure":{"closed":true,"target":{"coords":[1,1],"meta":{}}},"#,
            r#""execution_id":"xk:sha256:bd6548f8992226de62fc9849d06c674e14e8d4841f585af438a43d84b36c80b5","#,
            r#""spec":"XKERNEL_RECEIPT_V1","verdict":{"details":{},"ok":true,"reason":"OK"},"#,
            r#""version":"1.0.0-draft"}"#
        );
        assert_eq!(String::from_utf8(bytes).unwrap(), expected);
    }

    #[test]
    fn test_receipt_built_fresh_each_time() {
        let e = sample_execution(&[1, 1]);
        assert_eq!(build_receipt(&e, None), build_receipt(&e, None));
        assert_ne!(build_receipt(&e, None), build_receipt(&e, Some(&sv(&[1, 1]))));
    }
}
