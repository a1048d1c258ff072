use edwards25519::{Error, Scalar};

use hex_literal::hex;
use num_bigint::{BigInt, BigUint};
use rand::{RngCore, SeedableRng, rngs::StdRng};

const L: [u8; 32] = hex!("edd3f55c1a631258d69cf7a2def9de1400000000000000000000000000000010");

fn group_order() -> BigUint {
    BigUint::from_bytes_le(&L)
}

fn to_scalar(n: &BigUint) -> Scalar {
    let mut bytes = [0u8; 32];
    let le = n.to_bytes_le();
    bytes[..le.len()].copy_from_slice(&le);
    Scalar(bytes)
}

fn random_bytes<const N: usize>(rng: &mut StdRng) -> [u8; N] {
    let mut bytes = [0u8; N];
    rng.fill_bytes(&mut bytes);
    bytes
}

fn widen(s: &Scalar) -> [u8; 64] {
    let mut wide = [0u8; 64];
    wide[..32].copy_from_slice(&s.0);
    wide
}

#[test]
fn test_reduce_matches_big_integers() {
    let mut rng = StdRng::seed_from_u64(0x5ca1_0001);
    let l = group_order();

    for _ in 0..256 {
        let wide: [u8; 64] = random_bytes(&mut rng);
        let expected = BigUint::from_bytes_le(&wide) % &l;

        assert_eq!(Scalar::reduce(&wide), to_scalar(&expected));
    }
}

#[test]
fn test_reduce_edge_cases() {
    let l = group_order();

    assert_eq!(Scalar::reduce(&[0u8; 64]), Scalar::ZERO);
    assert_eq!(Scalar::reduce(&widen(&Scalar(L))), Scalar::ZERO);

    let l_minus_one = to_scalar(&(&l - 1u32));
    assert_eq!(Scalar::reduce(&widen(&l_minus_one)), l_minus_one);

    let l_plus_one = to_scalar(&(&l + 1u32));
    assert_eq!(Scalar::reduce(&widen(&l_plus_one)), Scalar::ONE);

    assert_eq!(
        Scalar::reduce(&[0xff; 64]).0,
        hex!("000f9c44e31106a447938568a71b0ed065bef517d273ecce3d9a307c1b419903")
    );
}

#[test]
fn test_reduce_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(0x5ca1_0002);

    for _ in 0..128 {
        let once = Scalar::reduce(&random_bytes(&mut rng));
        let twice = Scalar::reduce(&widen(&once));

        assert_eq!(once, twice);
        assert!(bool::from(once.is_canonical()));
    }
}

#[test]
fn test_mul_add_matches_big_integers() {
    let mut rng = StdRng::seed_from_u64(0x5ca1_0003);
    let l = group_order();

    for _ in 0..256 {
        // unreduced inputs, full 256 bits
        let a = Scalar(random_bytes(&mut rng));
        let b = Scalar(random_bytes(&mut rng));
        let c = Scalar(random_bytes(&mut rng));

        let expected = (BigUint::from_bytes_le(&a.0) * BigUint::from_bytes_le(&b.0)
            + BigUint::from_bytes_le(&c.0))
            % &l;

        assert_eq!(Scalar::mul_add(&a, &b, &c), to_scalar(&expected));

        let product = (BigUint::from_bytes_le(&a.0) * BigUint::from_bytes_le(&b.0)) % &l;
        assert_eq!(Scalar::mul_add(&a, &b, &Scalar::ZERO), to_scalar(&product));
    }
}

#[test]
fn test_mul_add_extremes() {
    let l = group_order();
    let max = Scalar([0xff; 32]);
    let n = BigUint::from_bytes_le(&max.0);

    assert_eq!(
        Scalar::mul_add(&max, &max, &max),
        to_scalar(&((&n * &n + &n) % &l))
    );

    let l_minus_one = to_scalar(&(&l - 1u32));
    // (−1)·(−1) + 0 = 1
    assert_eq!(
        Scalar::mul_add(&l_minus_one, &l_minus_one, &Scalar::ZERO),
        Scalar::ONE
    );
    // (−1)·1 + 1 = 0
    assert_eq!(
        Scalar::mul_add(&l_minus_one, &Scalar::ONE, &Scalar::ONE),
        Scalar::ZERO
    );
}

#[test]
fn test_radix16_reconstructs_scalar() {
    let mut rng = StdRng::seed_from_u64(0x5ca1_0004);

    let mut cases: Vec<Scalar> = (0..128)
        .map(|_| {
            let mut bytes: [u8; 32] = random_bytes(&mut rng);
            bytes[31] &= 0x7f;
            Scalar(bytes)
        })
        .collect();

    let mut top = [0x88u8; 32];
    top[31] = 0x7f;
    cases.extend([Scalar::ZERO, Scalar::ONE, Scalar(top), Scalar(L)]);

    for s in cases {
        let e = s.radix16();

        let mut sum = BigInt::from(0);
        for &digit in e.iter().rev() {
            sum = sum * 16u32 + BigInt::from(digit);
        }
        assert_eq!(sum, BigInt::from(BigUint::from_bytes_le(&s.0)));

        assert!(e[..63].iter().all(|&d| (-8..=7).contains(&d)));
        assert!((-8..=8).contains(&e[63]));
    }
}

#[test]
fn test_slide_reconstructs_scalar() {
    let mut rng = StdRng::seed_from_u64(0x5ca1_0005);

    let mut cases: Vec<Scalar> = (0..128)
        .map(|_| {
            let mut bytes: [u8; 32] = random_bytes(&mut rng);
            bytes[31] &= 0x7f;
            Scalar(bytes)
        })
        .collect();

    let mut ones = [0xffu8; 32];
    ones[31] = 0x7f;
    cases.extend([Scalar::ZERO, Scalar::ONE, Scalar(ones), Scalar(L)]);

    for s in cases {
        let r = s.slide();

        let mut sum = BigInt::from(0);
        for &digit in r.iter().rev() {
            sum = sum * 2u32 + BigInt::from(digit);
        }
        assert_eq!(sum, BigInt::from(BigUint::from_bytes_le(&s.0)));

        for &d in r.iter() {
            assert!(d == 0 || (d % 2 != 0 && (-15..=15).contains(&d)), "digit {d}");
        }
    }
}

#[test]
fn test_slide_is_exact_for_full_width_scalars() {
    let mut rng = StdRng::seed_from_u64(0x5ca1_0006);

    let mut cases: Vec<Scalar> = (0..128)
        .map(|_| {
            let mut bytes: [u8; 32] = random_bytes(&mut rng);
            bytes[31] |= 0x80;
            Scalar(bytes)
        })
        .collect();

    let mut top_bit = [0xffu8; 32];
    top_bit[31] = 0x80;
    cases.extend([Scalar([0xff; 32]), Scalar(top_bit)]);

    for s in cases {
        let r = s.slide();
        assert_eq!(r.len(), 257);

        let mut sum = BigInt::from(0);
        for &digit in r.iter().rev() {
            sum = sum * 2u32 + BigInt::from(digit);
        }
        assert_eq!(sum, BigInt::from(BigUint::from_bytes_le(&s.0)));

        for &d in r.iter() {
            assert!(d == 0 || (d % 2 != 0 && (-15..=15).contains(&d)), "digit {d}");
        }
    }

    // carry out of bit 255 lands in the extra digit
    assert_eq!(Scalar([0xff; 32]).slide()[256], 1);
}

#[test]
fn test_is_canonical() {
    let l = group_order();

    assert!(bool::from(Scalar::ZERO.is_canonical()));
    assert!(bool::from(to_scalar(&(&l - 1u32)).is_canonical()));
    assert!(!bool::from(Scalar(L).is_canonical()));
    assert!(!bool::from(to_scalar(&(&l + 1u32)).is_canonical()));
    assert!(!bool::from(Scalar([0xff; 32]).is_canonical()));
}

#[test]
fn test_clamp() {
    let clamped = Scalar::clamp([0xff; 32]);

    assert_eq!(clamped.0[0] & 7, 0);
    assert_eq!(clamped.0[31] & 0x80, 0);
    assert_eq!(clamped.0[31] & 0x40, 0x40);
    assert_eq!(clamped.0[1..31], [0xff; 30]);

    assert_eq!(Scalar::clamp([0; 32]).0[31], 0x40);
}

#[test]
fn test_from_bytes_mod_order() {
    assert_eq!(Scalar::from_bytes_mod_order(L), Scalar::ZERO);

    let mut l_plus_two = L;
    l_plus_two[0] += 2;
    let mut two = [0u8; 32];
    two[0] = 2;
    assert_eq!(Scalar::from_bytes_mod_order(l_plus_two), Scalar(two));
}

#[test]
fn test_try_from_slice() {
    let bytes = [7u8; 40];

    assert_eq!(
        Scalar::try_from(&bytes[..32]).unwrap(),
        Scalar::from_bytes([7u8; 32])
    );
    assert_eq!(
        Scalar::try_from(&bytes[..]).unwrap_err(),
        Error::InvalidLength {
            name: "Scalar",
            expected: 32,
            actual: 40,
        }
    );
}
