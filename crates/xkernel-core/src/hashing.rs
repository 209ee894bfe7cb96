//! Execution content addressing.
//!
//! `content_id(E) = "xk:sha256:" + hex(sha256(canonical_bytes(E)))`.
//! Two executions are the same content iff their ids match.

use crate::canonical::canonical_bytes;
use crate::crypto::Sha256Hash;
use crate::execution::Execution;
use crate::types::{ContentAddress, Namespace};

/// SHA-256 of the execution's canonical bytes.
pub fn sha256_bytes(execution: &Execution) -> [u8; 32] {
    Sha256Hash::hash(&canonical_bytes(execution)).0
}

/// Lowercase hex SHA-256 of the execution's canonical bytes.
pub fn sha256_hex(execution: &Execution) -> String {
    Sha256Hash::hash(&canonical_bytes(execution)).to_hex()
}

/// The execution's content address (`xk:sha256:...`).
pub fn content_id(execution: &Execution) -> ContentAddress {
    ContentAddress::new(
        Namespace::Execution,
        Sha256Hash::hash(&canonical_bytes(execution)),
    )
}

impl Execution {
    /// Compute this execution's content address.
    pub fn content_id(&self) -> ContentAddress {
        content_id(self)
    }
}
