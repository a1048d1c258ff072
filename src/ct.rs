//! Constant-time helpers for signed window digits and byte strings.
//!
//! The table lookup in fixed-base scalar multiplication is the one place
//! where secret scalar digits meet memory accesses. The helpers here turn a
//! signed digit into its magnitude and sign without branching, and hand the
//! result to `subtle` so the selection itself is a sequence of masked
//! assignments rather than an indexed load.

use subtle::{Choice, ConstantTimeEq};

/// Returns a `Choice` set to `1` when `digit` is negative.
#[inline(always)]
pub(crate) fn is_negative(digit: i8) -> Choice {
    Choice::from((digit as u8) >> 7)
}

/// Returns `|digit|` for `digit > i8::MIN`.
///
/// `mask` is all ones for negative inputs and zero otherwise, so
/// `(digit ^ mask) - mask` is a two's complement negation applied only when
/// needed.
#[inline(always)]
pub(crate) fn abs(digit: i8) -> u8 {
    let mask = digit >> 7;
    (digit ^ mask).wrapping_sub(mask) as u8
}

/// Constant-time equality of two 32-byte strings.
///
/// Intended for comparing encodings derived from secret data, such as a
/// recomputed signature component against the one received.
pub fn bytes_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a[..].ct_eq(&b[..]).into()
}
