//! Errors raised at the boundary of the group layer.
//!
//! The arithmetic itself is total. The only failure inherent to the core is
//! a compressed point with no matching `x`; length checks exist only for
//! the slice-taking constructors, which validate input before reaching the
//! fixed-size core functions.

use std::fmt;

/// Errors returned by point decoding and slice constructors.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Error {
    /// The 32-byte string does not encode a point on the curve: no `x`
    /// satisfies the curve equation for the encoded `y`.
    InvalidPointEncoding,

    /// A byte slice handed to a constructor had the wrong length.
    InvalidLength {
        /// Name of the type being constructed.
        name: &'static str,
        /// Length in bytes the constructor expects.
        expected: usize,
        /// Length in bytes that was supplied.
        actual: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::InvalidPointEncoding => write!(f, "Cannot decompress Edwards point"),
            Error::InvalidLength {
                name,
                expected,
                actual,
            } => write!(f, "{name} must be {expected} bytes in length, got {actual}"),
        }
    }
}

impl std::error::Error for Error {}
