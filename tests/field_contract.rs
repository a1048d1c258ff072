//! Field properties the group layer relies on, observed through points.

use edwards25519::{GeCached, GeP2, GeP3, Scalar};

use hex_literal::hex;
use rand::{RngCore, SeedableRng, rngs::StdRng};

#[test]
fn test_sqrt_minus_one_squares_to_minus_one() {
    // decoding y = 0 needs x² = −1, so x is the stored √−1 (up to sign)
    let order_four = GeP3::from_bytes(&[0u8; 32]).unwrap();

    // 2·(x, 0) = (0, −1)
    let order_two = GeP3::from_p1p1(&order_four.double());
    assert_eq!(
        order_two.to_bytes(),
        hex!("ecffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f")
    );

    let twice = GeP3::from_p1p1(&order_two.double());
    assert!(twice.is_identity());
}

#[test]
fn test_encoding_is_independent_of_projective_scaling() {
    // the same affine point reached through different Z coordinates
    let direct = GeP3::BASEPOINT;
    let via_table = GeP3::from_scalar_mul(&Scalar::ONE);

    let three = Scalar::from_bytes_mod_order([3; 32]);
    let p = GeP3::from_scalar_mul(&three);
    let p_cached = GeCached::from_p3(&p);
    let sum = GeP3::from_p1p1(&(&direct + &p_cached));
    let back = GeP3::from_p1p1(&(&sum - &p_cached));

    assert_eq!(via_table.to_bytes(), direct.to_bytes());
    assert_eq!(back.to_bytes(), direct.to_bytes());
    assert_eq!(GeP2::from_p3(&back).to_bytes(), direct.to_bytes());
}

#[test]
fn test_canonical_encoding_of_reduced_values() {
    // random encodings include y ≥ p; re-encoding must land below p
    let mut rng = StdRng::seed_from_u64(0x5eed_00f1);
    let mut accepted = 0;

    for _ in 0..64 {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);

        if let Ok(point) = GeP3::from_bytes(&bytes) {
            accepted += 1;

            let encoded = point.to_bytes();
            let y_canonical = encoded[31] & 0x7f < 0x7f
                || encoded[1..31].iter().any(|&b| b != 0xff)
                || encoded[0] < 0xed;
            assert!(y_canonical, "re-encoding must be below p");

            // the point decoded from a canonical encoding is the same point
            assert_eq!(GeP3::from_bytes(&encoded).unwrap(), point);
        }
    }

    // roughly half of all y values have a matching x
    assert!(accepted > 16);
}

#[test]
fn test_decompression_recovers_both_root_branches() {
    // pow22523 yields a root directly for some points and needs √−1 for
    // others; across many multiples of B both paths are taken
    let mut rng = StdRng::seed_from_u64(0x5eed_00f2);

    for _ in 0..64 {
        let mut wide = [0u8; 64];
        rng.fill_bytes(&mut wide);

        let point = GeP3::from_scalar_mul(&Scalar::reduce(&wide));
        let bytes = point.to_bytes();

        assert_eq!(GeP3::from_bytes(&bytes).unwrap().to_bytes(), bytes);
    }
}
