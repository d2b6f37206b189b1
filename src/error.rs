//! Error types for the polyresample crate.

use thiserror::Error;

/// Errors reported by construction and configuration paths.
///
/// The per-sample processing functions do not return these; they treat
/// broken preconditions as caller bugs and panic instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResampleError {
    /// A rational was built with a zero denominator.
    #[error("rational denominator must be non-zero")]
    ZeroDenominator,
    /// Division by a zero-valued rational.
    #[error("division by a zero-valued rational")]
    DivisionByZero,
    /// Rational arithmetic left the 64-bit range after reduction.
    #[error("rational arithmetic overflowed the 64-bit range")]
    Overflow,
    /// A polyphase decomposition was requested with zero phases.
    #[error("number of polyphase phases must be positive")]
    ZeroPhases,
    /// The prototype filter has no coefficients.
    #[error("prototype filter must have at least one coefficient")]
    EmptyFilter,
    /// Two buffers that must match in length do not.
    #[error("buffer length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    /// A phase sums to zero, so it cannot be scaled to unity gain.
    #[error("phase {phase} has zero DC gain and cannot be normalized")]
    DegeneratePhase { phase: usize },
    /// Invalid sample rate or sample rate ratio.
    #[error("invalid sample rate ratio: {0}")]
    InvalidRatio(String),
    /// Invalid channel count.
    #[error("invalid channel count: {0}")]
    InvalidChannels(usize),
    /// Malformed input buffer.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result alias used throughout the crate.
pub type ResampleResult<T> = Result<T, ResampleError>;
