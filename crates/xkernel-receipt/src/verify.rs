//! Receipt verification.
//!
//! Checks that a receipt honestly describes an execution. Nothing declared
//! in the receipt is trusted: each field is compared against a value
//! recomputed from the execution, never against another receipt field.
//!
//! Checks run in order and stop at the first failure:
//! 1. receipt is a mapping
//! 2. `spec` and `version` tags
//! 3. `execution_id` equals the recomputed content address
//! 4. `verdict.ok` and `verdict.reason` equal the recomputed verdict
//!    (`verdict.details` is not compared)
//! 5. if present, `closure` is well-formed and `closure.closed` equals the
//!    recomputed closure against the receipt's own target

use tracing::debug;

use xkernel_core::{
    closed, content_id, validate_execution, Execution, Map, Reason, StateVector, Value, Verdict,
};

use crate::receipt::{keys, RECEIPT_SPEC, RECEIPT_VERSION};

/// Verify `receipt` against `execution`.
///
/// Integrity only: a passing result means the receipt tells the truth about
/// the execution, not that the execution is valid.
pub fn verify_receipt(receipt: &Value, execution: &Execution) -> Verdict {
    let verdict = check(receipt, execution);
    if !verdict.ok() {
        debug!(reason = %verdict.reason(), details = ?verdict.details(), "receipt rejected");
    }
    verdict
}

fn check(receipt: &Value, execution: &Execution) -> Verdict {
    let Some(fields) = receipt.as_map() else {
        return Verdict::reject(Reason::ReceiptBadType, [("expected", "dict")]);
    };
    let field = |key: &str| fields.get(key).cloned().unwrap_or(Value::Null);

    let spec = field(keys::SPEC);
    if spec.as_str() != Some(RECEIPT_SPEC) {
        return Verdict::reject(
            Reason::ReceiptBadSpec,
            [("spec", spec), ("expected", Value::from(RECEIPT_SPEC))],
        );
    }

    let version = field(keys::VERSION);
    if version.as_str() != Some(RECEIPT_VERSION) {
        return Verdict::reject(
            Reason::ReceiptBadVersion,
            [("version", version), ("expected", Value::from(RECEIPT_VERSION))],
        );
    }

    let expected_id = content_id(execution).to_string();
    let got_id = field(keys::EXECUTION_ID);
    if got_id.as_str() != Some(expected_id.as_str()) {
        return Verdict::reject(
            Reason::ReceiptExecutionIdMismatch,
            [("got", got_id), ("expected", Value::from(expected_id))],
        );
    }

    if let Some(rejection) = check_verdict(fields.get(keys::VERDICT), execution) {
        return rejection;
    }

    if let Some(closure) = fields.get(keys::CLOSURE) {
        if let Some(rejection) = check_closure(closure, execution) {
            return rejection;
        }
    }

    Verdict::accept()
}

fn check_verdict(declared: Option<&Value>, execution: &Execution) -> Option<Verdict> {
    let empty = Map::new();
    let declared = match declared {
        None => &empty,
        Some(Value::Map(m)) => m,
        Some(_) => {
            return Some(Verdict::reject(
                Reason::ReceiptBadVerdict,
                [("expected", "dict")],
            ))
        }
    };

    let expected = validate_execution(execution);
    let got_ok = declared.get(keys::OK).cloned().unwrap_or(Value::Null);
    let got_reason = declared.get(keys::REASON).cloned().unwrap_or(Value::Null);

    let matches = got_ok.as_bool() == Some(expected.ok())
        && got_reason.as_str() == Some(expected.reason().as_str());
    if matches {
        return None;
    }

    Some(Verdict::reject(
        Reason::ReceiptVerdictMismatch,
        [
            ("got", Value::map([(keys::OK, got_ok), (keys::REASON, got_reason)])),
            (
                "expected",
                Value::map([
                    (keys::OK, Value::Bool(expected.ok())),
                    (keys::REASON, Value::from(expected.reason().as_str())),
                ]),
            ),
        ],
    ))
}

fn check_closure(closure: &Value, execution: &Execution) -> Option<Verdict> {
    let Some(closure) = closure.as_map() else {
        return Some(Verdict::reject(Reason::ReceiptBadClosure, [("expected", "dict")]));
    };

    let Some(target) = closure.get(keys::TARGET).and_then(Value::as_map) else {
        return Some(Verdict::reject(
            Reason::ReceiptBadClosureTarget,
            [("expected", "dict")],
        ));
    };

    let raw_coords = target.get(keys::COORDS).cloned().unwrap_or(Value::Null);
    let Some(state) = raw_coords
        .as_int_list()
        .and_then(|c| StateVector::from_coords(c).ok())
    else {
        return Some(Verdict::reject(
            Reason::ReceiptBadClosureCoords,
            [("coords", raw_coords)],
        ));
    };

    let empty = Value::empty_map();
    let meta = target.get(keys::META).unwrap_or(&empty);
    let Some(meta) = meta.as_map() else {
        return Some(Verdict::reject(
            Reason::ReceiptBadClosureMeta,
            [("meta_type", meta.type_name())],
        ));
    };
    let target = state.with_meta(meta.clone());

    let expected = closed(execution, &target);
    let got = closure.get(keys::CLOSED).cloned().unwrap_or(Value::Null);
    if got.as_bool() == Some(expected) {
        return None;
    }

    Some(Verdict::reject(
        Reason::ReceiptClosureMismatch,
        [("got", got), ("expected", Value::Bool(expected))],
    ))
}
