//! Closed error surface for the Helios/Selene math engine.
//!
//! There are exactly three failure modes in this crate: invalid point
//! encoding, a field element with no square root, and an oversized divisor
//! input. Every other operation is infallible. None of these propagate
//! through more than one call frame, and none are retried.

use thiserror::Error;

/// The three failure modes exposed by this crate's fallible operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Point deserialisation rejected the input: either the encoded
    /// x-coordinate was non-canonical (`>= p` or `>= q`), or
    /// `x^3 - 3x + B` was not a quadratic residue for that x.
    #[error("point encoding is invalid")]
    InvalidPointEncoding,

    /// `sqrt` was called on a field element with no square root.
    #[error("field element is not a quadratic residue")]
    NotQuadraticResidue,

    /// `divisor::compute` was given more points than this implementation
    /// is willing to allocate for.
    #[error("divisor input size {n} exceeds the maximum of {max}")]
    DivisorTooLarge {
        /// The rejected input size.
        n: usize,
        /// The maximum accepted input size (2^20).
        max: usize,
    },
}

/// Convenience alias used throughout the crate's fallible boundaries.
pub type Result<T> = core::result::Result<T, Error>;
