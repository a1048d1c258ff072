//! Edwards25519 group operations.
//!
//! Points live on the twisted Edwards curve
//!
//! ```text
//! −x² + y² = 1 + d·x²·y²   over 𝔽ₚ, p = 2²⁵⁵ − 19
//! ```
//!
//! with `d = −121665/121666`.
//!
//! ## Coordinate systems
//!
//! Each representation has one job:
//!
//! - **GeP3**: extended `(X : Y : Z : T)` with `X·Y = Z·T`. The working form
//!   and the left operand of every addition.
//! - **GeP2**: projective `(X : Y : Z)`. The input to doubling; converting
//!   into it only drops `T`.
//! - **GeP1P1**: completed `((X : Z), (Y : T))`. Every addition and doubling
//!   produces one; it is converted to `GeP2` or `GeP3` straight away.
//! - **GeCached**: `(Y + X, Y − X, Z, 2d·T)` derived from a `GeP3`, the
//!   right operand for repeated additions of the same point.
//! - **GePrecomp**: `(y + x, y − x, 2d·x·y)` with `Z = 1`, used only for the
//!   static multiples of the base point.
//!
//! ## Implemented operations
//!
//! - Addition and subtraction against cached and precomputed points
//! - Doubling
//! - Constant-time fixed-base multiplication `a·B`
//! - Variable-time double-base multiplication `a·A + b·B`
//! - Compression and decompression
//!
//! ## Security properties
//!
//! `from_scalar_mul` and `GePrecomp::select` take the same path and touch
//! the same memory for every scalar. `double_scalar_mul_vartime` and the
//! decoders branch on their inputs and must only see public data.

use std::ops::{Add, Neg, Sub};

use subtle::{Choice, ConditionallyNegatable, ConditionallySelectable, ConstantTimeEq};

use crate::ct;
use crate::errors::Error;
use crate::field::FieldElement;
use crate::scalar::Scalar;
use crate::table::{BASE, BASEPOINT, BI, D, D2, SQRTM1};

/// A point in completed coordinates `((X : Z), (Y : T))`.
///
/// Represents the affine point `(X / Z, Y / T)`. This is the output format
/// of the addition and doubling formulas; it carries no invariant between
/// its coordinates and is never stored.
#[derive(Clone, Copy, Debug)]
pub struct GeP1P1 {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
    pub(crate) t: FieldElement,
}

impl GeP1P1 {
    /// Computes `p + q` for a cached right operand.
    ///
    /// ```text
    /// A = (Y₁ − X₁)·(Y₂ − X₂)    B = (Y₁ + X₁)·(Y₂ + X₂)
    /// C = T₁·2d·T₂              D = 2·Z₁·Z₂
    /// result = (B − A, B + A, D + C, D − C)
    /// ```
    pub fn from_sum(p: &GeP3, q: &GeCached) -> Self {
        let pp = (p.y + p.x) * q.yplusx;
        let mm = (p.y - p.x) * q.yminusx;
        let tt2d = p.t * q.t2d;
        let zz = p.z * q.z;
        let zz2 = zz + zz;

        GeP1P1 {
            x: pp - mm,
            y: pp + mm,
            z: zz2 + tt2d,
            t: zz2 - tt2d,
        }
    }

    /// Computes `p − q` for a cached right operand.
    ///
    /// Same formula as `from_sum` with `q` negated, which swaps its
    /// `Y ± X` terms and flips the sign of `2d·T`.
    pub fn from_difference(p: &GeP3, q: &GeCached) -> Self {
        let pm = (p.y + p.x) * q.yminusx;
        let mp = (p.y - p.x) * q.yplusx;
        let tt2d = p.t * q.t2d;
        let zz = p.z * q.z;
        let zz2 = zz + zz;

        GeP1P1 {
            x: pm - mp,
            y: pm + mp,
            z: zz2 - tt2d,
            t: zz2 + tt2d,
        }
    }

    /// Computes `p + q` for a precomputed affine right operand.
    ///
    /// `q` has `Z = 1`, which saves the `Z₁·Z₂` multiplication.
    pub fn from_mixed_sum(p: &GeP3, q: &GePrecomp) -> Self {
        let pp = (p.y + p.x) * q.yplusx;
        let mm = (p.y - p.x) * q.yminusx;
        let txy2d = p.t * q.xy2d;
        let z2 = p.z + p.z;

        GeP1P1 {
            x: pp - mm,
            y: pp + mm,
            z: z2 + txy2d,
            t: z2 - txy2d,
        }
    }

    /// Computes `p − q` for a precomputed affine right operand.
    pub fn from_mixed_difference(p: &GeP3, q: &GePrecomp) -> Self {
        let pm = (p.y + p.x) * q.yminusx;
        let mp = (p.y - p.x) * q.yplusx;
        let txy2d = p.t * q.xy2d;
        let z2 = p.z + p.z;

        GeP1P1 {
            x: pm - mp,
            y: pm + mp,
            z: z2 - txy2d,
            t: z2 + txy2d,
        }
    }
}

/// A point in projective coordinates `(X : Y : Z)`.
///
/// Represents the affine point `(X / Z, Y / Z)`. Doubling only needs these
/// three coordinates, so chains of doublings stay in this form.
#[derive(Clone, Copy, Debug)]
pub struct GeP2 {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
}

impl GeP2 {
    /// The neutral element `(0 : 1 : 1)`.
    pub const IDENTITY: Self = GeP2 {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ONE,
    };

    /// Converts from completed coordinates: `(X·T, Y·Z, Z·T)`.
    pub fn from_p1p1(p: &GeP1P1) -> Self {
        GeP2 {
            x: p.x * p.t,
            y: p.y * p.z,
            z: p.z * p.t,
        }
    }

    /// Drops the `T` coordinate of an extended point.
    pub fn from_p3(p: &GeP3) -> Self {
        GeP2 {
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }

    /// Computes `2·self`.
    ///
    /// ```text
    /// XX = X²    YY = Y²    ZZ2 = 2·Z²
    /// result = ((X + Y)² − YY − XX, YY + XX, YY − XX, ZZ2 − (YY − XX))
    /// ```
    pub fn double(&self) -> GeP1P1 {
        let xx = self.x.square();
        let yy = self.y.square();
        let zz2 = self.z.double_square();
        let x_plus_y_sq = (self.x + self.y).square();
        let yy_plus_xx = yy + xx;
        let yy_minus_xx = yy - xx;

        GeP1P1 {
            x: x_plus_y_sq - yy_plus_xx,
            y: yy_plus_xx,
            z: yy_minus_xx,
            t: zz2 - yy_minus_xx,
        }
    }

    /// Encodes the point into its 32-byte compressed form.
    ///
    /// Costs one field inversion.
    pub fn to_bytes(&self) -> [u8; 32] {
        compress(&self.x, &self.y, &self.z)
    }
}

/// A point in extended coordinates `(X : Y : Z : T)`.
///
/// Represents the affine point `(X / Z, Y / Z)` with the extra invariant
/// `X·Y = Z·T`. Extended coordinates give complete addition formulas with
/// no inversion, so this is the form every computation accumulates in.
#[derive(Clone, Copy, Debug)]
pub struct GeP3 {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
    pub(crate) t: FieldElement,
}

impl GeP3 {
    /// The neutral element `(0 : 1 : 1 : 0)`.
    pub const IDENTITY: Self = GeP3 {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ONE,
        t: FieldElement::ZERO,
    };

    /// The standard base point `B`, the point with `y = 4/5` and even `x`.
    pub const BASEPOINT: Self = BASEPOINT;

    /// Converts from completed coordinates: `(X·T, Y·Z, Z·T, X·Y)`.
    pub fn from_p1p1(p: &GeP1P1) -> Self {
        GeP3 {
            x: p.x * p.t,
            y: p.y * p.z,
            z: p.z * p.t,
            t: p.x * p.y,
        }
    }

    /// Computes `2·self` through the projective doubling formula.
    #[inline(always)]
    pub fn double(&self) -> GeP1P1 {
        GeP2::from_p3(self).double()
    }

    /// Computes `2ᵏ·self` for `k ≥ 1`, staying in projective form between
    /// doublings.
    fn mul_by_pow_2(&self, k: u32) -> GeP3 {
        debug_assert!(k > 0);

        let mut r = self.double();
        for _ in 1..k {
            r = GeP2::from_p1p1(&r).double();
        }

        GeP3::from_p1p1(&r)
    }

    /// Computes `8·self`.
    ///
    /// The result is the identity exactly when `self` lies in the
    /// small-order subgroup.
    pub fn mul_by_cofactor(&self) -> GeP3 {
        self.mul_by_pow_2(3)
    }

    /// Returns `true` when this is the neutral element.
    pub fn is_identity(&self) -> bool {
        self.ct_eq(&GeP3::IDENTITY).into()
    }

    /// Computes `a·B` for the fixed base point `B`.
    ///
    /// ## Algorithm
    ///
    /// `a` is recoded into 64 signed radix-16 digits `e[i] ∈ [−8, 8]`, so
    ///
    /// ```text
    /// a·B = Σ e[i]·16ⁱ·B
    ///     = Σ e[2j]·256ʲ·B + 16·Σ e[2j+1]·256ʲ·B
    /// ```
    ///
    /// Each `e[k]·256ʲ·B` is looked up in row `j` of the base table. The
    /// odd-position digits are accumulated first, the sum is multiplied by
    /// 16 with four doublings, and the even-position digits are added on
    /// top.
    ///
    /// ## Security
    ///
    /// The sequence of operations and memory accesses is the same for every
    /// scalar. Lookups go through `GePrecomp::select`.
    ///
    /// ## Precondition
    ///
    /// `a[31] ≤ 127`, which clamped and reduced scalars satisfy. Larger
    /// values would push the top digit outside `[−8, 8]`.
    pub fn from_scalar_mul(a: &Scalar) -> Self {
        debug_assert!(a.0[31] <= 127);

        let e = a.radix16();

        let mut h = GeP3::IDENTITY;
        for i in (1..64).step_by(2) {
            h = GeP3::from_p1p1(&(&h + &GePrecomp::select(i / 2, e[i])));
        }

        h = h.mul_by_pow_2(4);

        for i in (0..64).step_by(2) {
            h = GeP3::from_p1p1(&(&h + &GePrecomp::select(i / 2, e[i])));
        }

        h
    }

    /// Computes `a·self + b·B` in variable time.
    ///
    /// Both scalars are recoded with `Scalar::slide`. The odd multiples
    /// `self, 3·self, …, 15·self` are built as cached points, while the odd
    /// multiples of `B` come from the static `BI` table. The main loop
    /// starts at the highest position where either recoding is non-zero,
    /// doubles once per position and adds or subtracts the table entry for
    /// every non-zero digit, indexed directly by `|d| / 2`.
    ///
    /// Branches and table indices depend on the scalars, so this is only
    /// for public inputs such as signature verification. Any 256-bit
    /// scalars are accepted; neither needs to be reduced.
    pub fn double_scalar_mul_vartime(&self, a: &Scalar, b: &Scalar) -> GeP2 {
        let aslide = a.slide();
        let bslide = b.slide();

        let mut ai = [GeCached::from_p3(self); 8];
        let a2 = GeP3::from_p1p1(&self.double());
        for j in 1..8 {
            ai[j] = GeCached::from_p3(&GeP3::from_p1p1(&(&a2 + &ai[j - 1])));
        }

        let Some(top) = (0..aslide.len())
            .rev()
            .find(|&i| aslide[i] != 0 || bslide[i] != 0)
        else {
            return GeP2::IDENTITY;
        };

        let mut r = GeP2::IDENTITY;

        for i in (0..=top).rev() {
            let mut t = r.double();

            let digit = aslide[i];
            if digit > 0 {
                t = &GeP3::from_p1p1(&t) + &ai[(digit / 2) as usize];
            } else if digit < 0 {
                t = &GeP3::from_p1p1(&t) - &ai[(-digit / 2) as usize];
            }

            let digit = bslide[i];
            if digit > 0 {
                t = &GeP3::from_p1p1(&t) + &BI[(digit / 2) as usize];
            } else if digit < 0 {
                t = &GeP3::from_p1p1(&t) - &BI[(-digit / 2) as usize];
            }

            r = GeP2::from_p1p1(&t);
        }

        r
    }

    /// Encodes the point into its 32-byte compressed form.
    ///
    /// The affine `y` is serialized little-endian and the low bit of the
    /// affine `x` goes into bit 7 of byte 31. Costs one field inversion.
    pub fn to_bytes(&self) -> [u8; 32] {
        compress(&self.x, &self.y, &self.z)
    }

    /// Decompresses a point and returns its negation.
    ///
    /// Solves the curve equation for `x`:
    ///
    /// ```text
    /// x² = u / v    with u = y² − 1,  v = d·y² + 1
    /// ```
    ///
    /// The candidate root is `x = u·v³·(u·v⁷)^((p − 5)/8)`. If `v·x² = u` it
    /// is kept; if `v·x² = −u` it is multiplied by `√−1`; otherwise no `x`
    /// exists and the encoding is rejected.
    ///
    /// The sign of the returned `x` is the **opposite** of the encoded sign
    /// bit, which hands signature verification `−A` directly. Use
    /// `from_bytes` for the point itself.
    ///
    /// `y` values in `[p, 2²⁵⁵)` are reduced modulo `p`. When `x = 0` the
    /// sign bit cannot be honoured and is ignored.
    ///
    /// # Errors
    ///
    /// `Error::InvalidPointEncoding` when `(y² − 1)/(d·y² + 1)` is not a
    /// square.
    pub fn from_bytes_negate(s: &[u8; 32]) -> Result<Self, Error> {
        let y = FieldElement::from_bytes(s);
        let z = FieldElement::ONE;

        let yy = y.square();
        let u = yy - z;
        let v = yy * D + z;

        let v3 = v.square() * v;
        let v7 = v3.square() * v;
        let mut x = (u * v7).pow22523() * u * v3;

        let vxx = x.square() * v;
        if bool::from((vxx - u).is_non_zero()) {
            if bool::from((vxx + u).is_non_zero()) {
                return Err(Error::InvalidPointEncoding);
            }
            x = x * SQRTM1;
        }

        if x.is_negative().unwrap_u8() == s[31] >> 7 {
            x = -x;
        }

        Ok(GeP3 {
            x,
            y,
            z,
            t: x * y,
        })
    }

    /// Decompresses a point.
    ///
    /// `to_bytes` of the result reproduces `s` for every canonical
    /// encoding.
    ///
    /// # Errors
    ///
    /// `Error::InvalidPointEncoding` when no `x` matches the encoded `y`.
    pub fn from_bytes(s: &[u8; 32]) -> Result<Self, Error> {
        Ok(-GeP3::from_bytes_negate(s)?)
    }

    /// Length-checked wrapper around `from_bytes_negate`.
    ///
    /// # Errors
    ///
    /// `Error::InvalidLength` when `bytes` is not 32 bytes long, otherwise
    /// whatever `from_bytes_negate` returns.
    pub fn from_slice_negate(bytes: &[u8]) -> Result<Self, Error> {
        let s: &[u8; 32] = bytes.try_into().map_err(|_| Error::InvalidLength {
            name: "GeP3",
            expected: 32,
            actual: bytes.len(),
        })?;

        GeP3::from_bytes_negate(s)
    }
}

/// Shared body of the `to_bytes` methods.
fn compress(x: &FieldElement, y: &FieldElement, z: &FieldElement) -> [u8; 32] {
    let recip = z.invert();
    let x = *x * recip;
    let y = *y * recip;

    let mut output = y.to_bytes();
    output[31] ^= x.is_negative().unwrap_u8() << 7;

    output
}

/// Builds a compressed point from big-endian affine coordinates.
///
/// Used to import uncompressed public keys, which carry `X || Y` in
/// big-endian byte order. The top bit of either coordinate is ignored and
/// both are reduced modulo `p`.
///
/// # Errors
///
/// `Error::InvalidPointEncoding` when `(x, y)` is not on the curve.
pub fn compress_affine(x: &[u8; 32], y: &[u8; 32]) -> Result<[u8; 32], Error> {
    let x = FieldElement::from_bytes(&reversed(x));
    let y = FieldElement::from_bytes(&reversed(y));

    let xx = x.square();
    let yy = y.square();
    let lhs = yy - xx;
    let rhs = FieldElement::ONE + D * xx * yy;

    if !bool::from(lhs.ct_eq(&rhs)) {
        return Err(Error::InvalidPointEncoding);
    }

    Ok(compress(&x, &y, &FieldElement::ONE))
}

fn reversed(bytes: &[u8; 32]) -> [u8; 32] {
    let mut out = *bytes;
    out.reverse();
    out
}

impl ConstantTimeEq for GeP3 {
    /// Compares the affine points: `X₁·Z₂ = X₂·Z₁` and `Y₁·Z₂ = Y₂·Z₁`.
    fn ct_eq(&self, other: &Self) -> Choice {
        (self.x * other.z).ct_eq(&(other.x * self.z))
            & (self.y * other.z).ct_eq(&(other.y * self.z))
    }
}

impl PartialEq for GeP3 {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for GeP3 {}

impl Neg for &GeP3 {
    type Output = GeP3;

    fn neg(self) -> GeP3 {
        GeP3 {
            x: -self.x,
            y: self.y,
            z: self.z,
            t: -self.t,
        }
    }
}

impl Neg for GeP3 {
    type Output = GeP3;

    fn neg(self) -> GeP3 {
        -&self
    }
}

impl<'b> Add<&'b GeCached> for &GeP3 {
    type Output = GeP1P1;

    fn add(self, rhs: &'b GeCached) -> GeP1P1 {
        GeP1P1::from_sum(self, rhs)
    }
}

impl<'b> Sub<&'b GeCached> for &GeP3 {
    type Output = GeP1P1;

    fn sub(self, rhs: &'b GeCached) -> GeP1P1 {
        GeP1P1::from_difference(self, rhs)
    }
}

impl<'b> Add<&'b GePrecomp> for &GeP3 {
    type Output = GeP1P1;

    fn add(self, rhs: &'b GePrecomp) -> GeP1P1 {
        GeP1P1::from_mixed_sum(self, rhs)
    }
}

impl<'b> Sub<&'b GePrecomp> for &GeP3 {
    type Output = GeP1P1;

    fn sub(self, rhs: &'b GePrecomp) -> GeP1P1 {
        GeP1P1::from_mixed_difference(self, rhs)
    }
}

/// A point prepared for repeated addition: `(Y + X, Y − X, Z, 2d·T)`.
///
/// Built from a `GeP3` and never modified afterwards.
#[derive(Clone, Copy, Debug)]
pub struct GeCached {
    pub(crate) yplusx: FieldElement,
    pub(crate) yminusx: FieldElement,
    pub(crate) z: FieldElement,
    pub(crate) t2d: FieldElement,
}

impl GeCached {
    /// Converts an extended point into cached form.
    pub fn from_p3(p: &GeP3) -> Self {
        GeCached {
            yplusx: p.y + p.x,
            yminusx: p.y - p.x,
            z: p.z,
            t2d: p.t * D2,
        }
    }
}

impl Neg for &GeCached {
    type Output = GeCached;

    fn neg(self) -> GeCached {
        GeCached {
            yplusx: self.yminusx,
            yminusx: self.yplusx,
            z: self.z,
            t2d: -self.t2d,
        }
    }
}

/// An affine point prepared for mixed addition: `(y + x, y − x, 2d·x·y)`.
///
/// Only ever holds a fixed multiple of the base point taken from the static
/// tables.
#[derive(Clone, Copy, Debug)]
pub struct GePrecomp {
    pub(crate) yplusx: FieldElement,
    pub(crate) yminusx: FieldElement,
    pub(crate) xy2d: FieldElement,
}

impl GePrecomp {
    /// The neutral element `(1, 1, 0)`.
    pub const IDENTITY: Self = GePrecomp {
        yplusx: FieldElement::ONE,
        yminusx: FieldElement::ONE,
        xy2d: FieldElement::ZERO,
    };

    /// Returns `b·256^pos·B` from the fixed-base table in constant time.
    ///
    /// `b` must lie in `[−8, 8]` and `pos` in `[0, 32)`.
    ///
    /// ## Algorithm
    ///
    /// 1. Split `b` into `|b|` and its sign without branching.
    /// 2. Walk all eight entries of row `pos`, merging entry `j` into the
    ///    result when `|b| = j + 1`. For `b = 0` nothing matches and the
    ///    identity is returned.
    /// 3. Negate the result when `b < 0`.
    ///
    /// ## Security
    ///
    /// Every entry is read and merged with a masked assignment, so neither
    /// the branch history nor the memory trace depends on `b`.
    pub fn select(pos: usize, b: i8) -> Self {
        debug_assert!((-8..=8).contains(&b));

        let negative = ct::is_negative(b);
        let babs = ct::abs(b);

        let mut t = GePrecomp::IDENTITY;
        for (j, entry) in BASE[pos].iter().enumerate() {
            t.conditional_assign(entry, babs.ct_eq(&(j as u8 + 1)));
        }

        t.conditional_negate(negative);
        t
    }
}

impl ConditionallySelectable for GePrecomp {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        GePrecomp {
            yplusx: FieldElement::conditional_select(&a.yplusx, &b.yplusx, choice),
            yminusx: FieldElement::conditional_select(&a.yminusx, &b.yminusx, choice),
            xy2d: FieldElement::conditional_select(&a.xy2d, &b.xy2d, choice),
        }
    }
}

impl Neg for &GePrecomp {
    type Output = GePrecomp;

    fn neg(self) -> GePrecomp {
        GePrecomp {
            yplusx: self.yminusx,
            yminusx: self.yplusx,
            xy2d: -self.xy2d,
        }
    }
}
