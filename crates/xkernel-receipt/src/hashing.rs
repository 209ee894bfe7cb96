//! Receipt content addressing.
//!
//! Same scheme as execution ids, under the `xr:` namespace.

use xkernel_core::{canonical_json_bytes, ContentAddress, Namespace, Sha256Hash, Value};

/// Canonical bytes of a receipt mapping: UTF-8, sorted keys, no whitespace.
pub fn receipt_json_bytes(receipt: &Value) -> Vec<u8> {
    canonical_json_bytes(receipt)
}

pub fn receipt_sha256_bytes(receipt: &Value) -> [u8; 32] {
    Sha256Hash::hash(&receipt_json_bytes(receipt)).0
}

pub fn receipt_sha256_hex(receipt: &Value) -> String {
    Sha256Hash::hash(&receipt_json_bytes(receipt)).to_hex()
}

/// Content address of a receipt (`xr:sha256:...`).
///
/// Hashes whatever mapping it is given; it does not check that the
/// receipt is truthful. Use [`verify_receipt`](crate::verify_receipt) for that.
pub fn receipt_id(receipt: &Value) -> ContentAddress {
    ContentAddress::new(
        Namespace::Receipt,
        Sha256Hash::hash(&receipt_json_bytes(receipt)),
    )
}
