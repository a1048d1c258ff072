//! Edwards25519 group arithmetic.
//!
//! This crate provides the point and scalar layer that Ed25519 signing and
//! verification are built on: point representations and conversions, the
//! addition and doubling formulas, scalar recoding, fixed-base and
//! double-base scalar multiplication, reduction modulo the group order, and
//! point compression.
//!
//! It does not hash, sign or verify by itself. Callers combine
//! `GeP3::from_scalar_mul`, `Scalar::reduce`, `Scalar::mul_add` and
//! `GeP3::double_scalar_mul_vartime` with their own SHA-512 to build the
//! signature scheme.
//!
//! # Module overview
//!
//! - `group`
//!   Point types (`GeP2`, `GeP3`, `GeP1P1`, `GeCached`, `GePrecomp`), the
//!   curve formulas, scalar multiplication, and encoding.
//!
//! - `scalar`
//!   Scalars modulo the group order: reduction, multiply-add, and the two
//!   signed-digit recodings used by scalar multiplication.
//!
//! - `ct`
//!   Constant-time helpers built on `subtle`.
//!
//! - `errors`
//!   The crate's error type.
//!
//! The field backend (`field`) and the precomputed tables (`table`) are
//! internal.
//!
//! # Example
//!
//! ```
//! use edwards25519::{GeP3, Scalar};
//!
//! let a = Scalar::from_bytes_mod_order([7u8; 32]);
//! let point = GeP3::from_scalar_mul(&a);
//! let encoded = point.to_bytes();
//!
//! assert_eq!(GeP3::from_bytes(&encoded).unwrap(), point);
//! ```
//!
//! # Features
//!
//! - `zeroize`: implements `zeroize::Zeroize` for `Scalar`.

pub mod ct;
pub mod errors;
pub mod group;
pub mod scalar;

mod field;
mod table;

pub use errors::Error;
pub use group::{GeCached, GeP1P1, GeP2, GeP3, GePrecomp, compress_affine};
pub use scalar::Scalar;
