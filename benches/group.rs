use edwards25519::{GeP3, Scalar};

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn scalar(seed: u8) -> Scalar {
    let mut wide = [0u8; 64];
    for (i, byte) in wide.iter_mut().enumerate() {
        *byte = seed.wrapping_mul(31).wrapping_add(i as u8);
    }
    Scalar::reduce(&wide)
}

pub fn bench_fixed_base(c: &mut Criterion) {
    let a = scalar(1);

    c.bench_function("fixed-base scalar multiplication", |b| {
        b.iter(|| GeP3::from_scalar_mul(black_box(&a)))
    });
}

pub fn bench_double_base(c: &mut Criterion) {
    let a = scalar(2);
    let b = scalar(3);
    let point = GeP3::from_scalar_mul(&scalar(4));

    c.bench_function("double-base scalar multiplication", |bench| {
        bench.iter(|| black_box(&point).double_scalar_mul_vartime(black_box(&a), black_box(&b)))
    });
}

pub fn bench_encoding(c: &mut Criterion) {
    let point = GeP3::from_scalar_mul(&scalar(5));
    let encoded = point.to_bytes();

    c.bench_function("compress", |b| b.iter(|| black_box(&point).to_bytes()));
    c.bench_function("decompress", |b| {
        b.iter(|| GeP3::from_bytes_negate(black_box(&encoded)))
    });
}

pub fn bench_scalar(c: &mut Criterion) {
    let wide = [0xa5u8; 64];
    let a = scalar(6);
    let b = scalar(7);
    let d = scalar(8);

    c.bench_function("scalar reduce", |bench| {
        bench.iter(|| Scalar::reduce(black_box(&wide)))
    });
    c.bench_function("scalar mul_add", |bench| {
        bench.iter(|| Scalar::mul_add(black_box(&a), black_box(&b), black_box(&d)))
    });
}

criterion_group!(
    benches,
    bench_fixed_base,
    bench_double_base,
    bench_encoding,
    bench_scalar
);
criterion_main!(benches);
