//! # xkernel
//!
//! The unified API for xkernel: validate claimed executions over integer
//! state vectors and produce tamper-evident receipts about them.
//!
//! ## Overview
//!
//! An [`Execution`] claims that applying a sequence of unit steps to an
//! initial state yields a final state. The kernel:
//!
//! - **Validates**: replays the steps and checks the claim ([`Verdict`])
//! - **Hashes**: derives a content address from canonical JSON (`xk:sha256:...`)
//! - **Receipts**: records id, verdict and closure (`xr:sha256:...`)
//! - **Verifies**: recomputes a receipt and compares it field by field
//!
//! ## Usage
//!
//! ```rust
//! use serde_json::json;
//! use xkernel::{Kernel, KernelConfig};
//!
//! let kernel = Kernel::new(KernelConfig::default());
//! let execution = kernel
//!     .load_execution(&json!({
//!         "init": {"coords": [0], "meta": {}},
//!         "steps": [{"id": "s1", "delta": {"coords": [1], "meta": {}}, "action": 1, "witness": {}}],
//!         "final": {"coords": [1], "meta": {}},
//!         "claims": {}
//!     }))
//!     .unwrap();
//!
//! assert!(kernel.validate(&execution).ok());
//! let receipt = kernel.receipt(&execution, None).to_value();
//! assert!(kernel.verify(&receipt, &execution).ok());
//! ```
//!
//! ## Re-exports
//!
//! - `xkernel::core` - Value model, canonical encoding, validation
//! - `xkernel::receipt` - Receipt construction, hashing, verification

pub mod decode;
pub mod error;
pub mod kernel;

// Re-export component crates
pub use xkernel_core as core;
pub use xkernel_receipt as receipt;

pub use decode::DecodeError;
pub use error::{KernelError, Result};
pub use kernel::{Kernel, KernelConfig};

// Re-export commonly used types
pub use xkernel_core::{
    ContentAddress, Execution, Map, Reason, StateVector, Step, Value, Verdict,
};
pub use xkernel_receipt::Receipt;
