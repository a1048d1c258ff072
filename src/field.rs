//! Finite field arithmetic for Edwards25519.
//!
//! This module implements arithmetic in the prime field
//!
//! ```text
//! 𝔽ₚ where p = 2²⁵⁵ − 19
//! ```
//!
//! and is the only place in the crate that knows how a field element is laid
//! out in memory. The group layer treats `FieldElement` as an opaque value
//! with the usual operators plus a handful of named helpers.
//!
//! ## Representation
//!
//! Field elements are stored as five unsigned 64-bit limbs in radix 2⁵¹:
//!
//! ```text
//! x = l₀ + l₁·2⁵¹ + l₂·2¹⁰² + l₃·2¹⁵³ + l₄·2²⁰⁴
//! ```
//!
//! Products are accumulated in `u128`. Every operation returns limbs below
//! 2⁵² (a weak reduction), which leaves enough headroom that the curve
//! formulas can chain additions before a multiplication without overflow.
//! Only `to_bytes` produces the canonical representative in `[0, p)`.
//!
//! ## Constant-time behaviour
//!
//! No operation branches on limb values or indexes memory with them.
//! Conditional selection goes through `subtle::ConditionallySelectable`.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

const LOW_51_BIT_MASK: u64 = (1u64 << 51) - 1;

/// `16·p`, limb by limb. Added before a subtraction so limbs never underflow.
const SIXTEEN_P: [u64; 5] = [
    36028797018963664,
    36028797018963952,
    36028797018963952,
    36028797018963952,
    36028797018963952,
];

#[inline(always)]
fn m(x: u64, y: u64) -> u128 {
    (x as u128) * (y as u128)
}

/// Reads eight little-endian bytes starting at `offset`.
#[inline(always)]
fn load_8(input: &[u8], offset: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&input[offset..offset + 8]);
    u64::from_le_bytes(word)
}

/// Field element modulo `2^255 - 19`, radix 2⁵¹.
#[derive(Clone, Copy)]
pub(crate) struct FieldElement(pub(crate) [u64; 5]);

impl FieldElement {
    /// The additive identity.
    pub(crate) const ZERO: Self = FieldElement([0; 5]);

    /// The multiplicative identity.
    pub(crate) const ONE: Self = FieldElement([1, 0, 0, 0, 0]);

    /// Carries every limb into the next one, folding the top carry back
    /// into limb 0 with a factor of 19 (`2²⁵⁵ ≡ 19`).
    ///
    /// Inputs may use the full 64 bits of each limb; outputs are below
    /// `2⁵¹ + 2¹⁸`.
    #[inline(always)]
    fn weak_reduce(mut limbs: [u64; 5]) -> Self {
        let c0 = limbs[0] >> 51;
        let c1 = limbs[1] >> 51;
        let c2 = limbs[2] >> 51;
        let c3 = limbs[3] >> 51;
        let c4 = limbs[4] >> 51;

        for limb in limbs.iter_mut() {
            *limb &= LOW_51_BIT_MASK;
        }

        limbs[0] += c4 * 19;
        limbs[1] += c0;
        limbs[2] += c1;
        limbs[3] += c2;
        limbs[4] += c3;

        FieldElement(limbs)
    }

    /// Carries a 5-term wide product back into 51-bit limbs.
    #[inline(always)]
    fn carry_wide(mut c: [u128; 5]) -> Self {
        let mut out = [0u64; 5];

        for i in 0..4 {
            c[i + 1] += c[i] >> 51;
            out[i] = (c[i] as u64) & LOW_51_BIT_MASK;
        }

        let carry = (c[4] >> 51) as u64;
        out[4] = (c[4] as u64) & LOW_51_BIT_MASK;

        out[0] += carry * 19;
        out[1] += out[0] >> 51;
        out[0] &= LOW_51_BIT_MASK;

        FieldElement(out)
    }

    /// Decodes a field element from 32 little-endian bytes.
    ///
    /// The most significant bit (bit 255) is ignored. Values in `[p, 2²⁵⁵)`
    /// are accepted and behave as their residue modulo `p`; re-encoding
    /// them yields the canonical form.
    pub(crate) fn from_bytes(input: &[u8; 32]) -> Self {
        FieldElement([
            load_8(input, 0) & LOW_51_BIT_MASK,
            (load_8(input, 6) >> 3) & LOW_51_BIT_MASK,
            (load_8(input, 12) >> 6) & LOW_51_BIT_MASK,
            (load_8(input, 19) >> 1) & LOW_51_BIT_MASK,
            (load_8(input, 24) >> 12) & LOW_51_BIT_MASK,
        ])
    }

    /// Encodes this element into its canonical 32-byte little-endian form.
    ///
    /// The value is first fully reduced into `[0, p)`: after a weak
    /// reduction, `q` is computed as the carry out of `x + 19`, which is `1`
    /// exactly when `x ≥ p`, and `19·q` is added before dropping bit 255.
    pub(crate) fn to_bytes(self) -> [u8; 32] {
        let mut limbs = Self::weak_reduce(self.0).0;

        let mut q = (limbs[0] + 19) >> 51;
        q = (limbs[1] + q) >> 51;
        q = (limbs[2] + q) >> 51;
        q = (limbs[3] + q) >> 51;
        q = (limbs[4] + q) >> 51;

        limbs[0] += 19 * q;

        for i in 0..4 {
            limbs[i + 1] += limbs[i] >> 51;
            limbs[i] &= LOW_51_BIT_MASK;
        }
        limbs[4] &= LOW_51_BIT_MASK;

        let mut output = [0u8; 32];
        let mut acc: u128 = 0;
        let mut bits = 0;
        let mut index = 0;

        for limb in limbs {
            acc |= (limb as u128) << bits;
            bits += 51;

            while bits >= 8 {
                output[index] = acc as u8;
                acc >>= 8;
                bits -= 8;
                index += 1;
            }
        }
        output[index] = acc as u8;

        output
    }

    /// Returns `1` when the canonical encoding is odd.
    ///
    /// This is the "sign" of `x` stored in bit 255 of a compressed point.
    pub(crate) fn is_negative(&self) -> Choice {
        Choice::from(self.to_bytes()[0] & 1)
    }

    /// Returns `1` unless this element is congruent to zero.
    pub(crate) fn is_non_zero(&self) -> Choice {
        !self.to_bytes()[..].ct_eq(&[0u8; 32][..])
    }

    /// Computes `self²`.
    pub(crate) fn square(self) -> Self {
        let a = self.0;
        let a3_19 = 19 * a[3];
        let a4_19 = 19 * a[4];

        Self::carry_wide([
            m(a[0], a[0]) + 2 * (m(a[1], a4_19) + m(a[2], a3_19)),
            m(a[3], a3_19) + 2 * (m(a[0], a[1]) + m(a[2], a4_19)),
            m(a[1], a[1]) + 2 * (m(a[0], a[2]) + m(a[4], a3_19)),
            m(a[4], a4_19) + 2 * (m(a[0], a[3]) + m(a[1], a[2])),
            m(a[2], a[2]) + 2 * (m(a[0], a[4]) + m(a[1], a[3])),
        ])
    }

    /// Computes `2·self²`, used by the projective doubling formula.
    pub(crate) fn double_square(self) -> Self {
        let square = self.square();
        square + square
    }

    /// Squares `k ≥ 1` times in a row.
    fn pow2k(self, k: u32) -> Self {
        debug_assert!(k > 0);

        let mut out = self;
        for _ in 0..k {
            out = out.square();
        }
        out
    }

    /// Returns `(self^(2²⁵⁰ − 1), self¹¹)`, the shared prefix of the
    /// inversion and square-root exponent chains.
    fn pow22501(self) -> (Self, Self) {
        let t0 = self.square(); // 2
        let t1 = t0.pow2k(2); // 8
        let t2 = self * t1; // 9
        let t3 = t0 * t2; // 11
        let t4 = t3.square(); // 22
        let t5 = t2 * t4; // 2^5 - 1
        let t6 = t5.pow2k(5);
        let t7 = t6 * t5; // 2^10 - 1
        let t8 = t7.pow2k(10);
        let t9 = t8 * t7; // 2^20 - 1
        let t10 = t9.pow2k(20);
        let t11 = t10 * t9; // 2^40 - 1
        let t12 = t11.pow2k(10);
        let t13 = t12 * t7; // 2^50 - 1
        let t14 = t13.pow2k(50);
        let t15 = t14 * t13; // 2^100 - 1
        let t16 = t15.pow2k(100);
        let t17 = t16 * t15; // 2^200 - 1
        let t18 = t17.pow2k(50);
        let t19 = t18 * t13; // 2^250 - 1

        (t19, t3)
    }

    /// Computes `self^(p − 2)`, the multiplicative inverse.
    ///
    /// The inverse of zero is zero.
    pub(crate) fn invert(&self) -> Self {
        let (t19, t3) = self.pow22501();
        t19.pow2k(5) * t3
    }

    /// Computes `self^((p − 5) / 8) = self^(2²⁵² − 3)`.
    ///
    /// Used by point decompression to extract a square root of a ratio
    /// without a separate inversion.
    pub(crate) fn pow22523(&self) -> Self {
        let (t19, _) = self.pow22501();
        t19.pow2k(2) * *self
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({:?})", &self.0[..])
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        FieldElement([
            u64::conditional_select(&a.0[0], &b.0[0], choice),
            u64::conditional_select(&a.0[1], &b.0[1], choice),
            u64::conditional_select(&a.0[2], &b.0[2], choice),
            u64::conditional_select(&a.0[3], &b.0[3], choice),
            u64::conditional_select(&a.0[4], &b.0[4], choice),
        ])
    }

    fn conditional_swap(a: &mut Self, b: &mut Self, choice: Choice) {
        for (x, y) in a.0.iter_mut().zip(b.0.iter_mut()) {
            u64::conditional_swap(x, y, choice);
        }
    }
}

impl ConstantTimeEq for FieldElement {
    /// Compares canonical encodings, so distinct limb representations of
    /// the same residue are equal.
    fn ct_eq(&self, other: &Self) -> Choice {
        self.to_bytes()[..].ct_eq(&other.to_bytes()[..])
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for FieldElement {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Add for FieldElement {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        let a = self.0;
        let b = rhs.0;

        Self::weak_reduce([
            a[0] + b[0],
            a[1] + b[1],
            a[2] + b[2],
            a[3] + b[3],
            a[4] + b[4],
        ])
    }
}

impl Sub for FieldElement {
    type Output = Self;

    /// Computes `self + 16p − rhs`, which keeps every limb non-negative
    /// for any weakly reduced `rhs`.
    fn sub(self, rhs: Self) -> Self::Output {
        let a = self.0;
        let b = rhs.0;

        Self::weak_reduce([
            (a[0] + SIXTEEN_P[0]) - b[0],
            (a[1] + SIXTEEN_P[1]) - b[1],
            (a[2] + SIXTEEN_P[2]) - b[2],
            (a[3] + SIXTEEN_P[3]) - b[3],
            (a[4] + SIXTEEN_P[4]) - b[4],
        ])
    }
}

impl Mul for FieldElement {
    type Output = Self;

    /// Schoolbook multiplication with the high cross terms folded by 19.
    fn mul(self, rhs: Self) -> Self::Output {
        let a = self.0;
        let b = rhs.0;

        let b1_19 = 19 * b[1];
        let b2_19 = 19 * b[2];
        let b3_19 = 19 * b[3];
        let b4_19 = 19 * b[4];

        Self::carry_wide([
            m(a[0], b[0]) + m(a[4], b1_19) + m(a[3], b2_19) + m(a[2], b3_19) + m(a[1], b4_19),
            m(a[1], b[0]) + m(a[0], b[1]) + m(a[4], b2_19) + m(a[3], b3_19) + m(a[2], b4_19),
            m(a[2], b[0]) + m(a[1], b[1]) + m(a[0], b[2]) + m(a[4], b3_19) + m(a[3], b4_19),
            m(a[3], b[0]) + m(a[2], b[1]) + m(a[1], b[2]) + m(a[0], b[3]) + m(a[4], b4_19),
            m(a[4], b[0]) + m(a[3], b[1]) + m(a[2], b[2]) + m(a[1], b[3]) + m(a[0], b[4]),
        ])
    }
}

impl Neg for FieldElement {
    type Output = Self;

    fn neg(self) -> Self::Output {
        FieldElement::ZERO - self
    }
}
