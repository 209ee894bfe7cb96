//! # xkernel testkit
//!
//! Testing utilities for xkernel.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Executions with known ids and verdicts, checked
//!   against an independent implementation
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Sample executions and on-disk documents for CLI tests
//!
//! ## Golden Vectors
//!
//! ```rust
//! use xkernel_testkit::vectors::all_vectors;
//!
//! for vector in all_vectors() {
//!     let execution = vector.execution();
//!     assert_eq!(execution.content_id().to_string(), vector.expected_id);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use xkernel_testkit::generators::{execution_from_params, ExecutionParams};
//!
//! proptest! {
//!     #[test]
//!     fn valid_executions_validate(params: ExecutionParams) {
//!         let e = execution_from_params(&params);
//!         prop_assert!(xkernel_core::validate_execution(&e).ok());
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{sv, unit_walk, TestFixture};
pub use generators::{execution_from_params, ExecutionParams};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
