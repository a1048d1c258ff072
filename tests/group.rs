use edwards25519::{
    Error, GeCached, GeP1P1, GeP2, GeP3, GePrecomp, Scalar, compress_affine, ct::bytes_eq,
};

use hex_literal::hex;
use rand::{RngCore, SeedableRng, rngs::StdRng};

const BASEPOINT_BYTES: [u8; 32] =
    hex!("5866666666666666666666666666666666666666666666666666666666666666");

const IDENTITY_BYTES: [u8; 32] =
    hex!("0100000000000000000000000000000000000000000000000000000000000000");

fn random_scalar(rng: &mut StdRng) -> Scalar {
    let mut wide = [0u8; 64];
    rng.fill_bytes(&mut wide);
    Scalar::reduce(&wide)
}

fn p3(p: GeP1P1) -> GeP3 {
    GeP3::from_p1p1(&p)
}

/// Plain double-and-add over the bits of `a`, most significant first.
fn reference_mul(a: &Scalar, point: &GeP3) -> GeP3 {
    let cached = GeCached::from_p3(point);
    let mut r = GeP3::IDENTITY;

    for i in (0..256).rev() {
        r = p3(r.double());
        if (a.0[i >> 3] >> (i & 7)) & 1 == 1 {
            r = p3(&r + &cached);
        }
    }

    r
}

#[test]
fn test_basepoint_encoding() {
    assert_eq!(GeP3::BASEPOINT.to_bytes(), BASEPOINT_BYTES);
    assert_eq!(GeP3::IDENTITY.to_bytes(), IDENTITY_BYTES);
    assert_eq!(GeP2::IDENTITY.to_bytes(), IDENTITY_BYTES);
}

#[test]
fn test_fixed_base_small_scalars() {
    assert_eq!(GeP3::from_scalar_mul(&Scalar::ONE), GeP3::BASEPOINT);
    assert_eq!(
        GeP3::from_scalar_mul(&Scalar::ONE).to_bytes(),
        BASEPOINT_BYTES
    );

    let zero = GeP3::from_scalar_mul(&Scalar::ZERO);
    assert!(zero.is_identity());
    assert_eq!(zero.to_bytes(), IDENTITY_BYTES);

    let mut two = [0u8; 32];
    two[0] = 2;
    assert_eq!(
        GeP3::from_scalar_mul(&Scalar(two)).to_bytes(),
        hex!("c9a3f86aae465f0e56513864510f3997561fa2c9e85ea21dc2292309f3cd6022")
    );
}

#[test]
fn test_fixed_base_matches_double_and_add() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0001);

    for _ in 0..16 {
        let a = random_scalar(&mut rng);
        assert_eq!(
            GeP3::from_scalar_mul(&a),
            reference_mul(&a, &GeP3::BASEPOINT)
        );
    }
}

#[test]
fn test_encoding_round_trip() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0002);

    for _ in 0..32 {
        let point = GeP3::from_scalar_mul(&random_scalar(&mut rng));
        let bytes = point.to_bytes();

        let decoded = GeP3::from_bytes(&bytes).expect("encoding of a valid point");
        assert_eq!(decoded.to_bytes(), bytes);
        assert_eq!(decoded, point);

        let negated = GeP3::from_bytes_negate(&bytes).expect("encoding of a valid point");
        let mut flipped = bytes;
        flipped[31] ^= 0x80;
        assert_eq!(negated.to_bytes(), flipped, "only the sign bit may change");
        assert_eq!(negated, -point);
    }
}

#[test]
fn test_sign_bit_negates_x_only() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0003);
    let bytes = GeP3::from_scalar_mul(&random_scalar(&mut rng)).to_bytes();

    let mut flipped = bytes;
    flipped[31] ^= 0x80;

    let p = GeP3::from_bytes(&bytes).unwrap();
    let q = GeP3::from_bytes(&flipped).unwrap();

    assert_eq!(q, -p);
    assert!(p3(&p + &GeCached::from_p3(&q)).is_identity());
    assert_eq!(q.to_bytes()[..31], p.to_bytes()[..31]);
}

#[test]
fn test_non_canonical_y_is_reduced() {
    // y = p reduces to y = 0, the point (±√−1, 0) of order 4
    let y_is_p = hex!("edffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f");
    let y_is_zero = [0u8; 32];

    let a = GeP3::from_bytes(&y_is_p).expect("y = p reduces to a valid y");
    let b = GeP3::from_bytes(&y_is_zero).expect("y = 0 is on the curve");

    assert_eq!(a, b);
    assert_eq!(a.to_bytes(), y_is_zero);
    assert_ne!(a.to_bytes(), y_is_p);

    // y = p + 1 reduces to the identity
    let y_is_p_plus_one =
        hex!("eeffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f");
    let c = GeP3::from_bytes(&y_is_p_plus_one).unwrap();
    assert!(c.is_identity());
    assert_eq!(c.to_bytes(), IDENTITY_BYTES);
}

#[test]
fn test_zero_x_with_sign_bit_is_accepted() {
    let mut bytes = IDENTITY_BYTES;
    bytes[31] |= 0x80;

    let point = GeP3::from_bytes_negate(&bytes).expect("x = 0 ignores the sign bit");
    assert!(point.is_identity());
    assert_eq!(point.to_bytes(), IDENTITY_BYTES);
}

#[test]
fn test_invalid_encoding_is_rejected() {
    let mut y_is_two = [0u8; 32];
    y_is_two[0] = 2;

    assert_eq!(
        GeP3::from_bytes_negate(&y_is_two).unwrap_err(),
        Error::InvalidPointEncoding
    );
    assert_eq!(
        GeP3::from_bytes(&y_is_two).unwrap_err(),
        Error::InvalidPointEncoding
    );
}

#[test]
fn test_from_slice_negate_checks_length() {
    assert_eq!(
        GeP3::from_slice_negate(&BASEPOINT_BYTES[..31]).unwrap_err(),
        Error::InvalidLength {
            name: "GeP3",
            expected: 32,
            actual: 31,
        }
    );

    let negated = GeP3::from_slice_negate(&BASEPOINT_BYTES[..]).unwrap();
    assert_eq!(negated, -GeP3::BASEPOINT);
}

#[test]
fn test_double_scalar_mul_is_linear() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0004);

    for _ in 0..16 {
        let a = random_scalar(&mut rng);
        let b = random_scalar(&mut rng);
        let sum = Scalar::mul_add(&a, &Scalar::ONE, &b);

        let lhs = GeP3::BASEPOINT.double_scalar_mul_vartime(&a, &b);
        let rhs = GeP3::from_scalar_mul(&sum);

        assert_eq!(lhs.to_bytes(), rhs.to_bytes());
    }
}

#[test]
fn test_double_scalar_mul_matches_double_and_add() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0005);

    for _ in 0..8 {
        let point = GeP3::from_scalar_mul(&random_scalar(&mut rng));
        let a = random_scalar(&mut rng);

        let lhs = point.double_scalar_mul_vartime(&a, &Scalar::ZERO);
        let rhs = reference_mul(&a, &point);

        assert_eq!(lhs.to_bytes(), rhs.to_bytes());
    }
}

#[test]
fn test_double_scalar_mul_full_width_scalars() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0006);
    let max = Scalar([0xff; 32]);

    assert_eq!(
        GeP3::BASEPOINT
            .double_scalar_mul_vartime(&max, &Scalar::ZERO)
            .to_bytes(),
        reference_mul(&max, &GeP3::BASEPOINT).to_bytes()
    );

    let point = GeP3::from_scalar_mul(&random_scalar(&mut rng));
    assert_eq!(
        point
            .double_scalar_mul_vartime(&Scalar::ZERO, &max)
            .to_bytes(),
        reference_mul(&max, &GeP3::BASEPOINT).to_bytes()
    );

    for _ in 0..4 {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        rng.fill_bytes(&mut a);
        rng.fill_bytes(&mut b);
        a[31] |= 0x80;
        b[31] |= 0x80;
        let (a, b) = (Scalar(a), Scalar(b));

        let lhs = point.double_scalar_mul_vartime(&a, &b);
        let rhs = p3(&reference_mul(&a, &point)
            + &GeCached::from_p3(&reference_mul(&b, &GeP3::BASEPOINT)));

        assert_eq!(lhs.to_bytes(), rhs.to_bytes());
    }
}

#[test]
fn test_double_scalar_mul_with_zero_scalars() {
    let point = GeP3::from_scalar_mul(&Scalar::from_bytes_mod_order([3u8; 32]));

    assert_eq!(
        point
            .double_scalar_mul_vartime(&Scalar::ZERO, &Scalar::ZERO)
            .to_bytes(),
        IDENTITY_BYTES
    );
    assert_eq!(
        point
            .double_scalar_mul_vartime(&Scalar::ZERO, &Scalar::ONE)
            .to_bytes(),
        BASEPOINT_BYTES
    );
    assert_eq!(
        point
            .double_scalar_mul_vartime(&Scalar::ONE, &Scalar::ZERO)
            .to_bytes(),
        point.to_bytes()
    );
}

#[test]
fn table_rows_are_multiples_of_the_base_point() {
    let mut row_base = GeP3::BASEPOINT;

    for pos in 0..32 {
        let cached = GeCached::from_p3(&row_base);
        let mut expected = GeP3::IDENTITY;

        assert!(p3(&GeP3::IDENTITY + &GePrecomp::select(pos, 0)).is_identity());

        for j in 1..=8i8 {
            expected = p3(&expected + &cached);

            let positive = p3(&GeP3::IDENTITY + &GePrecomp::select(pos, j));
            let negative = p3(&GeP3::IDENTITY + &GePrecomp::select(pos, -j));

            assert_eq!(positive, expected, "row {pos}, digit {j}");
            assert_eq!(negative, -expected, "row {pos}, digit -{j}");
        }

        // 256^(pos + 1)·B
        for _ in 0..8 {
            row_base = p3(row_base.double());
        }
    }
}

#[test]
fn test_addition_formulas_agree() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0006);
    let p = GeP3::from_scalar_mul(&random_scalar(&mut rng));
    let q = GeP3::from_scalar_mul(&random_scalar(&mut rng));
    let q_cached = GeCached::from_p3(&q);

    // P + Q − Q == P
    let sum = p3(&p + &q_cached);
    assert_eq!(p3(&sum - &q_cached), p);
    assert_eq!(p3(GeP1P1::from_difference(&sum, &q_cached)), p);

    // 2P == P + P, through both doubling entry points
    let p_cached = GeCached::from_p3(&p);
    let doubled = p3(&p + &p_cached);
    assert_eq!(p3(p.double()), doubled);
    assert_eq!(p3(GeP2::from_p3(&p).double()), doubled);
    assert_eq!(GeP2::from_p1p1(&p.double()).to_bytes(), doubled.to_bytes());

    // mixed and cached additions of B agree
    let b_precomp = GePrecomp::select(0, 1);
    let b_cached = GeCached::from_p3(&GeP3::BASEPOINT);
    assert_eq!(p3(&p + &b_precomp), p3(&p + &b_cached));
    assert_eq!(p3(&p - &b_precomp), p3(&p - &b_cached));
    assert_eq!(
        p3(GeP1P1::from_mixed_difference(&p, &b_precomp)),
        p3(GeP1P1::from_sum(&p, &-&b_cached))
    );
    assert_eq!(
        p3(GeP1P1::from_mixed_sum(&p, &-&b_precomp)),
        p3(&p - &b_cached)
    );

    // P + (−P) == O
    assert!(p3(&p + &GeCached::from_p3(&-p)).is_identity());
}

#[test]
fn test_cofactor_clears_small_order_points() {
    let order_four = GeP3::from_bytes(&[0u8; 32]).unwrap();
    assert!(!order_four.is_identity());
    assert!(order_four.mul_by_cofactor().is_identity());

    let eight_b = GeP3::BASEPOINT.mul_by_cofactor();
    let mut eight = [0u8; 32];
    eight[0] = 8;
    assert_eq!(eight_b, GeP3::from_scalar_mul(&Scalar(eight)));
    assert!(!eight_b.is_identity());
}

#[test]
fn test_compress_affine() {
    // affine B, big-endian
    let x = hex!("216936d3cd6e53fec0a4e231fdd6dc5c692cc7609525a7b2c9562d608f25d51a");
    let y = hex!("6666666666666666666666666666666666666666666666666666666666666658");

    assert_eq!(compress_affine(&x, &y), Ok(BASEPOINT_BYTES));

    let mut off_curve = y;
    off_curve[31] ^= 1;
    assert_eq!(
        compress_affine(&x, &off_curve),
        Err(Error::InvalidPointEncoding)
    );
}

#[test]
fn test_compress_affine_reads_big_endian() {
    let x_le = hex!("1ad5258f602d56c9b2a7259560c72c695cdcd6fd31e2a4c0fe536ecdd3366921");
    let y_le = BASEPOINT_BYTES;

    assert_ne!(compress_affine(&x_le, &y_le), Ok(BASEPOINT_BYTES));
}

#[test]
fn test_bytes_eq() {
    let mut other = BASEPOINT_BYTES;
    assert!(bytes_eq(&BASEPOINT_BYTES, &other));

    other[17] ^= 0x01;
    assert!(!bytes_eq(&BASEPOINT_BYTES, &other));
}
