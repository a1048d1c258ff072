//! RFC 8032 section 7.1 vectors, signed and verified with the group layer.

use edwards25519::{GeP3, Scalar, ct::bytes_eq};

use hex_literal::hex;
use sha2::{Digest, Sha512};

struct Vector {
    secret: [u8; 32],
    public: [u8; 32],
    message: &'static [u8],
    signature: [u8; 64],
}

const VECTORS: [Vector; 3] = [
    Vector {
        secret: hex!("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60"),
        public: hex!("d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"),
        message: &[],
        signature: hex!(
            "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e06522490155"
            "5fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b"
        ),
    },
    Vector {
        secret: hex!("4ccd089b28ff96da9db6c346ec114e0f5b8a319f35aba624da8cf6ed4fb8a6fb"),
        public: hex!("3d4017c3e843895a92b70aa74d1b7ebc9c982ccf2ec4968cc0cd55f12af4660c"),
        message: b"\x72",
        signature: hex!(
            "92a009a9f0d4cab8720e820b5f642540a2b27b5416503f8fb3762223ebdb69da"
            "085ac1e43e15996e458f3613d0f11d8c387b2eaeb4302aeeb00d291612bb0c00"
        ),
    },
    Vector {
        secret: hex!("c5aa8df43f9f837bedb7442f31dcb7b166d38535076f094b85ce3a2e0b4458f7"),
        public: hex!("fc51cd8e6218a1a38da47ed00230f0580816ed13ba3303ac5deb911548908025"),
        message: b"\xaf\x82",
        signature: hex!(
            "6291d657deec24024827e69c3abe01a30ce548a284743a445e3680d7db5ac3ac"
            "18ff9b538d16f290ae67f760984dc6594a7c15e9716ed28dc027beceea1ec40a"
        ),
    },
];

fn sha512(parts: &[&[u8]]) -> [u8; 64] {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part);
    }

    let mut digest = [0u8; 64];
    digest.copy_from_slice(&hasher.finalize());
    digest
}

fn expand_secret(secret: &[u8; 32]) -> (Scalar, [u8; 32]) {
    let h = sha512(&[&secret[..]]);

    let mut lower = [0u8; 32];
    let mut prefix = [0u8; 32];
    lower.copy_from_slice(&h[..32]);
    prefix.copy_from_slice(&h[32..]);

    (Scalar::clamp(lower), prefix)
}

fn public_key(secret: &[u8; 32]) -> [u8; 32] {
    let (a, _) = expand_secret(secret);
    GeP3::from_scalar_mul(&a).to_bytes()
}

fn sign(secret: &[u8; 32], message: &[u8]) -> [u8; 64] {
    let (a, prefix) = expand_secret(secret);
    let public = GeP3::from_scalar_mul(&a).to_bytes();

    let r = Scalar::reduce(&sha512(&[&prefix[..], message]));
    let big_r = GeP3::from_scalar_mul(&r).to_bytes();

    let k = Scalar::reduce(&sha512(&[&big_r[..], &public[..], message]));
    let s = Scalar::mul_add(&k, &a, &r);

    let mut signature = [0u8; 64];
    signature[..32].copy_from_slice(&big_r);
    signature[32..].copy_from_slice(s.as_bytes());
    signature
}

/// Checks `[S]B − [k]A == R` using the negating decoder for `A`.
fn verify(public: &[u8; 32], message: &[u8], signature: &[u8; 64]) -> bool {
    let Ok(minus_a) = GeP3::from_bytes_negate(public) else {
        return false;
    };

    let Ok(s) = Scalar::try_from(&signature[32..]) else {
        return false;
    };
    if !bool::from(s.is_canonical()) {
        return false;
    }

    let k = Scalar::reduce(&sha512(&[&signature[..32], &public[..], message]));
    let check = minus_a.double_scalar_mul_vartime(&k, &s).to_bytes();

    let mut big_r = [0u8; 32];
    big_r.copy_from_slice(&signature[..32]);
    bytes_eq(&check, &big_r)
}

#[test]
fn test_public_key_vector_1() {
    let vector = &VECTORS[0];
    assert_eq!(public_key(&vector.secret), vector.public);
}

#[test]
fn test_public_keys() {
    for vector in VECTORS.iter() {
        assert_eq!(public_key(&vector.secret), vector.public);
    }
}

#[test]
fn test_signatures_match_vectors() {
    for vector in VECTORS.iter() {
        assert_eq!(sign(&vector.secret, vector.message), vector.signature);
    }
}

#[test]
fn test_signatures_verify() {
    for vector in VECTORS.iter() {
        assert!(
            verify(&vector.public, vector.message, &vector.signature),
            "signature should be valid"
        );
    }
}

#[test]
fn test_tampering_is_detected() {
    for vector in VECTORS.iter() {
        let mut signature = vector.signature;
        signature[44] ^= 0x10;
        assert!(
            !verify(&vector.public, vector.message, &signature),
            "signature modification must be detected"
        );

        let mut signature = vector.signature;
        signature[3] ^= 0x01;
        assert!(!verify(&vector.public, vector.message, &signature));

        assert!(!verify(&vector.public, b"another message", &vector.signature));
    }
}

#[test]
fn test_non_canonical_s_is_rejected() {
    let vector = &VECTORS[0];
    let order = hex!("edd3f55c1a631258d69cf7a2def9de1400000000000000000000000000000010");

    // S + L encodes the same residue but is out of range
    let mut s_plus_l = [0u8; 32];
    let mut carry = 0u16;
    for (i, out) in s_plus_l.iter_mut().enumerate() {
        let sum = vector.signature[32 + i] as u16 + order[i] as u16 + carry;
        *out = sum as u8;
        carry = sum >> 8;
    }
    assert_eq!(carry, 0);

    let mut signature = vector.signature;
    signature[32..].copy_from_slice(&s_plus_l);
    assert!(!verify(&vector.public, vector.message, &signature));
}
