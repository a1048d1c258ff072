//! Scalars modulo the Edwards25519 group order.
//!
//! Scalars are integers modulo
//!
//! ```text
//! ℓ = 2^252 + 27742317777372353535851937790883648493
//! ```
//!
//! stored as 32 little-endian bytes. The representation does not enforce
//! any invariant by itself: no clamping and no implicit reduction. Functions
//! that produce reduced values say so.
//!
//! ## Implemented operations
//!
//! - Reduction of a 512-bit integer modulo ℓ (`reduce`)
//! - Multiply-add `a·b + c mod ℓ` (`mul_add`)
//! - Signed radix-16 recoding for fixed-base multiplication (`radix16`)
//! - Sliding-window recoding for variable-base multiplication (`slide`)
//! - Range check against ℓ (`is_canonical`) and RFC 8032 clamping
//!
//! ## Limb arithmetic
//!
//! `reduce` and `mul_add` work on signed 21-bit limbs held in `i64`. Limb
//! `k ≥ 12` sits at `2^(21k) = 2^(21(k−12)) · 2^252`, and
//!
//! ```text
//! 2^252 ≡ 666643 + 470296·2^21 + 654183·2^42 − 997805·2^63
//!         + 136657·2^84 − 683901·2^105   (mod ℓ)
//! ```
//!
//! so each high limb is folded into the six limbs twelve places below it.
//! Rounding carries keep limbs centred around zero between folds; two final
//! floor-carry passes bring every limb into `[0, 2^21)`, which yields the
//! representative in `[0, ℓ)`.
//!
//! Both functions are straight-line over fixed limb positions and safe to
//! call on secret scalars.

use std::array;
use std::fmt;

use subtle::{Choice, ConstantTimeEq};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

use crate::errors::Error;
use crate::table::L_BYTES;

/// `2^252 mod ℓ` in signed radix 2²¹.
const REDUCTION: [i64; 6] = [666643, 470296, 654183, -997805, 136657, -683901];

const LIMB_MASK: i64 = (1 << 21) - 1;

/// A 256-bit scalar, 32 little-endian bytes.
#[derive(Clone, Copy)]
pub struct Scalar(pub [u8; 32]);

impl Scalar {
    /// The scalar `0`.
    pub const ZERO: Self = Scalar([0; 32]);

    /// The scalar `1`.
    pub const ONE: Self = Scalar([
        1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0,
    ]);

    /// Wraps 32 little-endian bytes without validation or reduction.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Scalar(bytes)
    }

    /// Returns the 32-byte little-endian encoding.
    pub fn to_bytes(self) -> [u8; 32] {
        self.0
    }

    /// Borrows the 32-byte little-endian encoding.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Interprets 32 bytes as an integer and reduces it modulo ℓ.
    pub fn from_bytes_mod_order(bytes: [u8; 32]) -> Self {
        let mut wide = [0u8; 64];
        wide[..32].copy_from_slice(&bytes);
        Self::reduce(&wide)
    }

    /// Applies RFC 8032 clamping to 32 bytes of hash output.
    ///
    /// Clears the three low bits (cofactor), clears bit 255 and sets bit
    /// 254. The result satisfies the `from_scalar_mul` precondition.
    pub fn clamp(mut bytes: [u8; 32]) -> Self {
        bytes[0] &= 248;
        bytes[31] &= 127;
        bytes[31] |= 64;
        Scalar(bytes)
    }

    /// Returns `1` when the scalar is strictly below ℓ.
    ///
    /// Computed as the final borrow of `self − ℓ`, byte by byte, without
    /// branching on either operand.
    pub fn is_canonical(&self) -> Choice {
        let mut borrow = 0i16;

        for (&s, &l) in self.0.iter().zip(L_BYTES.iter()) {
            let diff = s as i16 - l as i16 - borrow;
            borrow = (diff >> 15) & 1;
        }

        Choice::from(borrow as u8)
    }

    /// Reduces a 512-bit little-endian integer modulo ℓ.
    ///
    /// The input is split into 24 limbs of 21 bits (the top limb keeps the
    /// remaining 29 bits). Limbs 23 down to 18 are folded first, rounding
    /// carries are propagated over the middle limbs, limbs 17 down to 12 are
    /// folded, and two folds of whatever reaches limb 12 with floor carries
    /// in between produce the final value.
    ///
    /// The output is always in `[0, ℓ)`.
    pub fn reduce(wide: &[u8; 64]) -> Self {
        reduce_limbs(load_limbs::<24>(wide))
    }

    /// Computes `a·b + c mod ℓ`.
    ///
    /// The three inputs need not be reduced. The 24-limb product is built
    /// by schoolbook multiplication with `c` added into the low limbs,
    /// carried once so every limb fits the reduction's bounds, then reduced
    /// exactly like the output of `reduce`.
    ///
    /// This is the `S = r + k·a` step of Ed25519 signing.
    pub fn mul_add(a: &Scalar, b: &Scalar, c: &Scalar) -> Self {
        let a = load_limbs::<12>(&a.0);
        let b = load_limbs::<12>(&b.0);
        let c = load_limbs::<12>(&c.0);

        let mut s = [0i64; 24];
        s[..12].copy_from_slice(&c);

        for (i, &ai) in a.iter().enumerate() {
            for (j, &bj) in b.iter().enumerate() {
                s[i + j] += ai * bj;
            }
        }

        for i in (0..=22).step_by(2) {
            carry_round(&mut s, i);
        }
        for i in (1..=21).step_by(2) {
            carry_round(&mut s, i);
        }

        reduce_limbs(s)
    }

    /// Recodes the scalar into 64 signed radix-16 digits.
    ///
    /// Returns `e` with `Σ e[i]·16^i = self` and `e[i] ∈ [−8, 7]` for
    /// `i < 63`. With `self[31] ≤ 127` the top digit lies in `[−8, 8]`,
    /// which is the range `GePrecomp::select` accepts.
    ///
    /// The loop count and operations do not depend on the digits.
    pub fn radix16(&self) -> [i8; 64] {
        debug_assert!(self.0[31] <= 127);

        let mut e = [0i8; 64];
        for (i, &byte) in self.0.iter().enumerate() {
            e[2 * i] = (byte & 15) as i8;
            e[2 * i + 1] = (byte >> 4) as i8;
        }

        // each nibble is now in [0, 15]; borrow 16 from anything above 7
        let mut carry = 0i8;
        for digit in e.iter_mut().take(63) {
            *digit += carry;
            carry = (*digit + 8) >> 4;
            *digit -= carry << 4;
        }
        e[63] += carry;

        e
    }

    /// Recodes the scalar into a sparse signed-digit form.
    ///
    /// Returns `r` with `Σ r[i]·2^i = self`, where every non-zero `r[i]` is
    /// odd and `|r[i]| ≤ 15`. Scanning upwards, each set bit absorbs the set
    /// bits of the next six positions while the combined digit stays within
    /// `[−15, 15]`; when adding would overflow, the higher bit is subtracted
    /// instead and a carry is rippled further up.
    ///
    /// The extra digit `r[256]` receives the carry out of bit 255, so the
    /// decomposition is exact for every 256-bit value.
    ///
    /// The recoding branches on the scalar bits. It is only used by the
    /// variable-time double-base multiplication, whose scalars are public.
    pub fn slide(&self) -> [i8; 257] {
        let mut r = [0i8; 257];
        for (i, digit) in r.iter_mut().take(256).enumerate() {
            *digit = ((self.0[i >> 3] >> (i & 7)) & 1) as i8;
        }

        for i in 0..r.len() {
            if r[i] == 0 {
                continue;
            }

            for b in 1..=6 {
                if i + b >= r.len() {
                    break;
                }
                if r[i + b] == 0 {
                    continue;
                }

                let current = r[i] as i32;
                let shifted = (r[i + b] as i32) << b;

                if current + shifted <= 15 {
                    r[i] = (current + shifted) as i8;
                    r[i + b] = 0;
                } else if current - shifted >= -15 {
                    r[i] = (current - shifted) as i8;

                    for digit in r.iter_mut().skip(i + b) {
                        if *digit == 0 {
                            *digit = 1;
                            break;
                        }
                        *digit = 0;
                    }
                } else {
                    break;
                }
            }
        }

        r
    }
}

/// Splits little-endian bytes into `N` limbs of 21 bits.
///
/// The last limb keeps every remaining bit.
fn load_limbs<const N: usize>(bytes: &[u8]) -> [i64; N] {
    array::from_fn(|i| {
        let bit = 21 * i;
        let start = bit / 8;
        let end = (start + 4).min(bytes.len());

        let word = bytes[start..end]
            .iter()
            .rev()
            .fold(0u64, |acc, &byte| (acc << 8) | byte as u64)
            >> (bit % 8);

        if i == N - 1 {
            word as i64
        } else {
            word as i64 & LIMB_MASK
        }
    })
}

/// Folds limb `k ≥ 12` into limbs `k − 12 ..= k − 7` and clears it.
#[inline(always)]
fn fold(s: &mut [i64; 24], k: usize) {
    let top = s[k];
    for (j, coeff) in REDUCTION.iter().enumerate() {
        s[k - 12 + j] += top * coeff;
    }
    s[k] = 0;
}

/// Moves the rounded overflow of limb `i` into limb `i + 1`, leaving limb
/// `i` in `[−2^20, 2^20)`.
#[inline(always)]
fn carry_round(s: &mut [i64; 24], i: usize) {
    let carry = (s[i] + (1 << 20)) >> 21;
    s[i + 1] += carry;
    s[i] -= carry << 21;
}

/// Moves the floored overflow of limb `i` into limb `i + 1`, leaving limb
/// `i` in `[0, 2^21)`.
#[inline(always)]
fn carry_floor(s: &mut [i64; 24], i: usize) {
    let carry = s[i] >> 21;
    s[i + 1] += carry;
    s[i] -= carry << 21;
}

fn reduce_limbs(mut s: [i64; 24]) -> Scalar {
    for k in (18..=23).rev() {
        fold(&mut s, k);
    }

    for i in (6..=16).step_by(2) {
        carry_round(&mut s, i);
    }
    for i in (7..=15).step_by(2) {
        carry_round(&mut s, i);
    }

    for k in (12..=17).rev() {
        fold(&mut s, k);
    }

    for i in (0..=10).step_by(2) {
        carry_round(&mut s, i);
    }
    for i in (1..=11).step_by(2) {
        carry_round(&mut s, i);
    }

    fold(&mut s, 12);
    for i in 0..12 {
        carry_floor(&mut s, i);
    }

    // at most one unit reached limb 12; fold it and settle the low limbs
    fold(&mut s, 12);
    for i in 0..11 {
        carry_floor(&mut s, i);
    }

    Scalar(pack_limbs(&s))
}

/// Serializes limbs `0..12`, each in `[0, 2^21)` except the top one, into
/// 32 little-endian bytes.
fn pack_limbs(s: &[i64; 24]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut acc = 0u64;
    let mut bits = 0;
    let mut index = 0;

    for &limb in &s[..12] {
        acc |= (limb as u64) << bits;
        bits += 21;

        while bits >= 8 {
            out[index] = acc as u8;
            acc >>= 8;
            bits -= 8;
            index += 1;
        }
    }

    for byte in out.iter_mut().skip(index) {
        *byte = acc as u8;
        acc >>= 8;
    }

    out
}

impl TryFrom<&[u8]> for Scalar {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| Error::InvalidLength {
            name: "Scalar",
            expected: 32,
            actual: bytes.len(),
        })?;

        Ok(Scalar(bytes))
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0[..].ct_eq(&other.0[..])
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Scalar {}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scalar({:?})", &self.0[..])
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}
