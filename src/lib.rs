#![doc = include_str!(concat!(env!("OUT_DIR"), "/README-rustdocified.md"))]
#![deny(missing_docs)]

use std::fmt;

pub use crate::{
    buffer::AlignedBuffer,
    element::Element,
    field::{FieldOps, Naive, Portable},
    multi_buffer::MultiBuffer,
    ntt::NttDriver,
    ring::Ring,
};

pub mod arith;
pub mod field;
pub mod ntt;
pub mod ring;
pub mod wide;

mod buffer;
mod element;
mod multi_buffer;

// ======================================================================
// Error - PUBLIC

/// Represents all possible errors that can occur in this library.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// A buffer assignment was given a buffer of the wrong size.
    InvalidArgument {
        /// Expected size.
        expected: usize,
        /// Size actually given.
        got: usize,
    },

    /// [`AlignedBuffer::at`] or [`AlignedBuffer::at_mut`] was called with an out-of-range
    /// index.
    OutOfRange {
        /// Length of the buffer.
        len: usize,
        /// Given out-of-range index.
        index: usize,
    },

    /// [`Ring::log`] found no `r` with `a^r = b`, or [`arith`] found no code length
    /// satisfying its constraints.
    NoSolution,

    /// A precondition that should be impossible to violate through the public API was
    /// violated anyway: zero modulus, a primitive-root search that exhausted `[2, q)`, or
    /// similar. This indicates a bug, not a recoverable runtime condition.
    AssertionFailure {
        /// What invariant was violated.
        reason: &'static str,
    },
}

// ======================================================================
// Error - IMPL DISPLAY

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument { expected, got } => {
                write!(f, "invalid argument: expected size {expected}, got {got}")
            }
            Error::OutOfRange { len, index } => {
                write!(f, "out of range: index {index} >= length {len}")
            }
            Error::NoSolution => write!(f, "no solution"),
            Error::AssertionFailure { reason } => write!(f, "assertion failure: {reason}"),
        }
    }
}

// ======================================================================
// Error - IMPL ERROR

impl std::error::Error for Error {}

// ======================================================================
// TESTS
