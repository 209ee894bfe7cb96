//! # xkernel core
//!
//! Pure primitives for xkernel: the execution value model, canonical
//! encoding, content addressing, and replay validation.
//!
//! This crate contains no I/O. Every operation is a function over immutable
//! values, so the same [`Execution`] can be validated or hashed from any
//! number of threads without coordination.
//!
//! ## Key Types
//!
//! - [`Value`] - JSON-safe dynamic data (no floats)
//! - [`StateVector`], [`Step`], [`Execution`] - the claimed run
//! - [`Verdict`] / [`Reason`] - validation outcome
//! - [`ContentAddress`] - `xk:sha256:...` / `xr:sha256:...` identifiers
//!
//! ## Canonicalization
//!
//! Executions are hashed over sorted-key compact JSON. See [`canonical`].

pub mod canonical;
pub mod crypto;
pub mod error;
pub mod execution;
pub mod hashing;
pub mod types;
pub mod validation;
pub mod value;
pub mod verdict;

pub use canonical::{
    canonical_bytes, canonical_json_bytes, execution_to_value, state_to_value, EXECUTION_SPEC,
    EXECUTION_VERSION,
};
pub use crypto::Sha256Hash;
pub use error::{CoreError, ReplayError, Result};
pub use execution::{Execution, StateVector, Step};
pub use hashing::{content_id, sha256_bytes, sha256_hex};
pub use types::{ContentAddress, Namespace};
pub use validation::{admissible_step, apply_step, closed, replay, validate_execution, STEP_QUANTUM};
pub use value::{json_integer, Map, Value};
pub use verdict::{Reason, Verdict};
