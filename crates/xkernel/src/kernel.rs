//! The Kernel: unified API for xkernel.
//!
//! The Kernel ties decoding, validation, hashing, and receipts together
//! behind one configuration. Every operation is pure; a `Kernel` can be
//! shared freely between threads.

use serde_json::Value as Json;
use tracing::{debug, instrument};

use xkernel_core::{
    content_id, validate_execution, ContentAddress, Execution, StateVector, Value, Verdict,
};
use xkernel_receipt::{build_receipt, receipt_id, verify_receipt, Receipt};

use crate::decode::{decode_execution, decode_receipt, decode_target};
use crate::error::Result;

/// Configuration for the Kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelConfig {
    /// Accept execution documents without the `{"execution": ...}` wrapper.
    pub accept_bare_execution: bool,
    /// Require wrapped documents to carry the expected `spec` and `version` tags.
    pub require_envelope_tags: bool,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            accept_bare_execution: true,
            require_envelope_tags: false,
        }
    }
}

/// The main Kernel struct.
///
/// Provides a unified API for:
/// - Loading executions, targets, and receipts from parsed JSON
/// - Validating executions
/// - Computing execution and receipt ids
/// - Building and verifying receipts
#[derive(Debug, Clone, Default)]
pub struct Kernel {
    config: KernelConfig,
}

impl Kernel {
    /// Create a new kernel instance.
    pub fn new(config: KernelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Loading
    // ─────────────────────────────────────────────────────────────────────────

    /// Decode an execution document, wrapped or bare.
    pub fn load_execution(&self, doc: &Json) -> Result<Execution> {
        let execution = decode_execution(doc, &self.config)?;
        debug!(steps = execution.steps().len(), "loaded execution");
        Ok(execution)
    }

    /// Decode a closure target state vector.
    pub fn load_target(&self, doc: &Json) -> Result<StateVector> {
        Ok(decode_target(doc)?)
    }

    /// Decode a receipt document for verification or hashing.
    pub fn load_receipt(&self, doc: &Json) -> Result<Value> {
        Ok(decode_receipt(doc)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Validate an execution by replaying its steps.
    #[instrument(level = "debug", skip_all)]
    pub fn validate(&self, execution: &Execution) -> Verdict {
        let verdict = validate_execution(execution);
        debug!(ok = verdict.ok(), reason = %verdict.reason(), "validated");
        verdict
    }

    /// Content address of an execution (`xk:sha256:...`).
    pub fn hash(&self, execution: &Execution) -> ContentAddress {
        content_id(execution)
    }

    /// Build a receipt, with a closure result if `target` is given.
    pub fn receipt(&self, execution: &Execution, target: Option<&StateVector>) -> Receipt {
        build_receipt(execution, target)
    }

    /// Check a receipt against the execution it claims to describe.
    #[instrument(level = "debug", skip_all)]
    pub fn verify(&self, receipt: &Value, execution: &Execution) -> Verdict {
        let verdict = verify_receipt(receipt, execution);
        debug!(ok = verdict.ok(), reason = %verdict.reason(), "verified receipt");
        verdict
    }

    /// Content address of a receipt mapping (`xr:sha256:...`).
    pub fn receipt_hash(&self, receipt: &Value) -> ContentAddress {
        receipt_id(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use xkernel_core::Reason;

    fn doc(final_coords: [i64; 2]) -> Json {
        json!({
            "execution": {
                "init": {"coords": [0, 0], "meta": {}},
                "steps": [
                    {"id": "s1", "delta": {"coords": [1, 0], "meta": {}}, "action": 1, "witness": {}},
                    {"id": "s2", "delta": {"coords": [0, 1], "meta": {}}, "action": 1, "witness": {}}
                ],
                "final": {"coords": final_coords, "meta": {}},
                "claims": {"intent": "golden"}
            }
        })
    }

    #[test]
    fn test_default_config() {
        let config = KernelConfig::default();
        assert!(config.accept_bare_execution);
        assert!(!config.require_envelope_tags);
    }

    #[test]
    fn test_end_to_end() {
        let kernel = Kernel::default();
        let execution = kernel.load_execution(&doc([1, 1])).unwrap();

        assert!(kernel.validate(&execution).ok());
        assert_eq!(
            kernel.hash(&execution).to_string(),
            "xk:sha256:bd6548f8992226de62fc9849d06c674e14e8d4841f585af438a43d84b36c80b5"
        );

        let target = kernel.load_target(&json!({"coords": [1, 1], "meta": {}})).unwrap();
        let receipt = kernel.receipt(&execution, Some(&target)).to_value();
        assert!(kernel.verify(&receipt, &execution).ok());
        assert_eq!(
            kernel.receipt_hash(&receipt).to_string(),
            "xr:sha256:2b6b9e15d0143bbe472ca4f71f94b4feada9916002380a0f0fb1bd54312f8b6d"
        );
    }

    #[test]
    fn test_reloaded_receipt_verifies() {
        let kernel = Kernel::default();
        let execution = kernel.load_execution(&doc([1, 1])).unwrap();
        let emitted: Json = kernel.receipt(&execution, None).to_value().into();

        let reloaded = kernel.load_receipt(&emitted).unwrap();
        assert!(kernel.verify(&reloaded, &execution).ok());
    }

    #[test]
    fn test_receipt_against_other_execution() {
        let kernel = Kernel::default();
        let good = kernel.load_execution(&doc([1, 1])).unwrap();
        let bad = kernel.load_execution(&doc([9, 9])).unwrap();

        let receipt = kernel.receipt(&good, None).to_value();
        assert_eq!(
            kernel.verify(&receipt, &bad).reason(),
            Reason::ReceiptExecutionIdMismatch
        );
    }

    #[test]
    fn test_load_errors_carry_codes() {
        let kernel = Kernel::new(KernelConfig {
            accept_bare_execution: false,
            require_envelope_tags: false,
        });
        let err = kernel.load_execution(&doc([1, 1])["execution"]).unwrap_err();
        assert_eq!(err.code(), "MISSING_KEY");
        assert_eq!(err.to_string(), "MISSING_KEY: root.execution");

        let err = kernel.load_receipt(&json!({"x": 1.5})).unwrap_err();
        assert_eq!(err.code(), "NON_JSON_SAFE");
        assert_eq!(
            err.to_string(),
            "NON_JSON_SAFE: receipt.x contains a non-JSON-safe value: float (1.5)"
        );

        let mut body = doc([1, 1]);
        body["execution"]["steps"][0]["id"] = json!("");
        let err = kernel.load_execution(&body).unwrap_err();
        assert_eq!(err.code(), "BAD_STEP_ID");
        assert_eq!(err.to_string(), "BAD_STEP_ID: execution.steps[0].id");
    }
}
