//! Error types for the Kernel.

use thiserror::Error;

use crate::decode::DecodeError;

/// Errors that can occur during Kernel operations.
///
/// Rejected executions are not errors: they come back as a
/// [`Verdict`](xkernel_core::Verdict). These are inputs the kernel could
/// not interpret at all.
#[derive(Debug, Error)]
pub enum KernelError {
    /// Input document has the wrong shape.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl KernelError {
    /// Stable diagnostic code for the error.
    pub fn code(&self) -> &'static str {
        match self {
            KernelError::Decode(e) => e.code(),
        }
    }
}

/// Result type for Kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;
