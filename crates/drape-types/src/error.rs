//! Error types for the drape solver.
//!
//! All crates return `DrapeResult<T>` from fallible operations.

use thiserror::Error;

/// Unified error type for the drape solver.
#[derive(Debug, Error)]
pub enum DrapeError {
    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Geometry is too degenerate to build a constraint from
    /// (zero-length edge, zero-area triangle).
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// A color batch could not be executed by the dispatcher.
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    /// A simulation invariant was violated (e.g., two constraints of one
    /// color class share a particle).
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// An operation was called before `initialize()`.
    #[error("Not initialized: {0}")]
    NotInitialized(&'static str),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for `Result<T, DrapeError>`.
pub type DrapeResult<T> = Result<T, DrapeError>;
