//! # xkernel receipts
//!
//! Tamper-evident receipts over execution validation.
//!
//! A receipt records an execution's content address, its validation
//! verdict, and optionally whether it closes on a target state. Receipts
//! carry no signature and no authority: they are a reproducibility check.
//! Anyone holding the execution can rebuild the receipt and compare.
//!
//! ## Usage
//!
//! ```rust
//! use xkernel_core::{Execution, Map, StateVector, Step};
//! use xkernel_receipt::{build_receipt, receipt_id, verify_receipt};
//!
//! let sv = |c: Vec<i64>| StateVector::from_coords(c).unwrap();
//! let execution = Execution::new(
//!     sv(vec![0, 0]),
//!     vec![Step::new("s1", sv(vec![1, 1]), 1, Map::new()).unwrap()],
//!     sv(vec![1, 1]),
//!     Map::new(),
//! );
//!
//! let receipt = build_receipt(&execution, Some(&sv(vec![1, 1]))).to_value();
//! assert!(verify_receipt(&receipt, &execution).ok());
//! assert!(receipt_id(&receipt).to_string().starts_with("xr:sha256:"));
//! ```

pub mod hashing;
pub mod receipt;
pub mod verify;

pub use hashing::{receipt_id, receipt_json_bytes, receipt_sha256_bytes, receipt_sha256_hex};
pub use receipt::{build_receipt, Closure, Receipt, RECEIPT_SPEC, RECEIPT_VERSION};
pub use verify::verify_receipt;
