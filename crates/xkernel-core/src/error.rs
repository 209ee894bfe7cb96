//! Error types for xkernel core.

use thiserror::Error;

/// Construction-time contract violations.
///
/// These are raised when a caller tries to build a value that the model
/// refuses to represent. They indicate an upstream bug, not a rejected
/// execution; rejected executions are reported as a [`Verdict`](crate::Verdict).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("{path} must be a non-empty list of integers")]
    EmptyCoords { path: String },

    #[error("Step.id must be a non-empty string")]
    EmptyStepId,

    #[error("{path} contains a non-JSON-safe value: {found}")]
    NonJsonSafe { path: String, found: String },

    #[error("malformed content address: {0}")]
    MalformedAddress(String),
}

/// Failures while replaying an execution's steps.
///
/// Never escapes the validator: it is folded into a `REPLAY_ERROR` verdict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("Dimension mismatch: {state} != {delta}")]
    DimensionMismatch {
        index: usize,
        state: usize,
        delta: usize,
    },

    #[error("Integer overflow at step {index}, coordinate {coord}")]
    Overflow { index: usize, coord: usize },
}

impl ReplayError {
    /// Index of the step that failed to apply.
    pub fn step_index(&self) -> usize {
        match self {
            ReplayError::DimensionMismatch { index, .. } | ReplayError::Overflow { index, .. } => {
                *index
            }
        }
    }
}

/// Result type for core construction.
pub type Result<T> = std::result::Result<T, CoreError>;
