//! Verdicts: the outcome of validating an execution or verifying a receipt.

use std::fmt;

use crate::value::{Map, Value};

/// Machine-readable reason code carried by a [`Verdict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    Ok,

    // Execution validation
    NonAdmissibleStep,
    ReplayError,
    ReplayMismatch,

    // Receipt verification
    ReceiptBadType,
    ReceiptBadSpec,
    ReceiptBadVersion,
    ReceiptExecutionIdMismatch,
    ReceiptBadVerdict,
    ReceiptVerdictMismatch,
    ReceiptBadClosure,
    ReceiptBadClosureTarget,
    ReceiptBadClosureCoords,
    ReceiptBadClosureMeta,
    ReceiptClosureMismatch,
}

impl Reason {
    /// The wire code, e.g. `NON_ADMISSIBLE_STEP`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Reason::Ok => "OK",
            Reason::NonAdmissibleStep => "NON_ADMISSIBLE_STEP",
            Reason::ReplayError => "REPLAY_ERROR",
            Reason::ReplayMismatch => "REPLAY_MISMATCH",
            Reason::ReceiptBadType => "RECEIPT_BAD_TYPE",
            Reason::ReceiptBadSpec => "RECEIPT_BAD_SPEC",
            Reason::ReceiptBadVersion => "RECEIPT_BAD_VERSION",
            Reason::ReceiptExecutionIdMismatch => "RECEIPT_EXECUTION_ID_MISMATCH",
            Reason::ReceiptBadVerdict => "RECEIPT_BAD_VERDICT",
            Reason::ReceiptVerdictMismatch => "RECEIPT_VERDICT_MISMATCH",
            Reason::ReceiptBadClosure => "RECEIPT_BAD_CLOSURE",
            Reason::ReceiptBadClosureTarget => "RECEIPT_BAD_CLOSURE_TARGET",
            Reason::ReceiptBadClosureCoords => "RECEIPT_BAD_CLOSURE_COORDS",
            Reason::ReceiptBadClosureMeta => "RECEIPT_BAD_CLOSURE_META",
            Reason::ReceiptClosureMismatch => "RECEIPT_CLOSURE_MISMATCH",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a check: `ok`, a reason code, and diagnostic details.
///
/// `ok` is true exactly when the reason is [`Reason::Ok`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    ok: bool,
    reason: Reason,
    details: Map,
}

impl Verdict {
    /// A passing verdict with empty details.
    pub fn accept() -> Self {
        Self {
            ok: true,
            reason: Reason::Ok,
            details: Map::new(),
        }
    }

    /// A failing verdict.
    pub fn reject<K, V, I>(reason: Reason, details: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        debug_assert!(reason != Reason::Ok);
        Self {
            ok: false,
            reason,
            details: details
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn ok(&self) -> bool {
        self.ok
    }

    pub fn reason(&self) -> Reason {
        self.reason
    }

    pub fn details(&self) -> &Map {
        &self.details
    }

    /// `{"ok": .., "reason": .., "details": {..}}`
    pub fn to_value(&self) -> Value {
        Value::map([
            ("ok", Value::Bool(self.ok)),
            ("reason", Value::from(self.reason.as_str())),
            ("details", Value::Map(self.details.clone())),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept() {
        let v = Verdict::accept();
        assert!(v.ok());
        assert_eq!(v.reason(), Reason::Ok);
        assert!(v.details().is_empty());
    }

    #[test]
    fn test_reject_details() {
        let v = Verdict::reject(Reason::ReplayError, [("error", "boom")]);
        assert!(!v.ok());
        assert_eq!(v.details().get("error"), Some(&Value::from("boom")));
    }

    #[test]
    fn test_to_value_shape() {
        let v = Verdict::reject(Reason::NonAdmissibleStep, [("index", 0usize)]).to_value();
        assert_eq!(v.get("ok"), Some(&Value::Bool(false)));
        assert_eq!(v.get("reason").and_then(Value::as_str), Some("NON_ADMISSIBLE_STEP"));
        assert_eq!(v.get("details").and_then(|d| d.get("index")), Some(&Value::Int(0)));
    }

    #[test]
    fn test_reason_codes() {
        assert_eq!(Reason::Ok.to_string(), "OK");
        assert_eq!(
            Reason::ReceiptBadClosureTarget.as_str(),
            "RECEIPT_BAD_CLOSURE_TARGET"
        );
    }
}
