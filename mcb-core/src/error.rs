//! Error types for the cycle basis solver.

use thiserror::Error;

/// Errors that can occur while computing a cycle basis.
#[derive(Error, Debug)]
pub enum McbError {
    /// Input validation failed (bad weights, dimension mismatch, bad settings)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The running basis weight left the representable range
    #[error("Arithmetic overflow while accumulating the basis weight")]
    ArithmeticOverflow,

    /// An algorithmic invariant was violated; the result would be meaningless
    #[error("Internal invariant violated: {0}")]
    InternalInvariant(String),

    /// A collective operation failed (disconnected peer, undecodable message)
    #[error("Communication failed: {0}")]
    Communication(String),
}

/// Result type for cycle basis operations.
pub type McbResult<T> = Result<T, McbError>;
