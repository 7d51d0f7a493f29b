use criterion::{black_box, criterion_group, criterion_main, Criterion};

use helioselene::prelude::*;

fn bench_fp_mul(c: &mut Criterion) {
    let a = Fp::from_bytes(&[3u8; 32]);
    let b = Fp::from_bytes(&[5u8; 32]);
    c.bench_function("fp_mul", |bencher| bencher.iter(|| black_box(a).mul(&black_box(b))));
}

fn bench_fq_mul(c: &mut Criterion) {
    let a = Fq::from_bytes(&[3u8; 32]);
    let b = Fq::from_bytes(&[5u8; 32]);
    c.bench_function("fq_mul", |bencher| bencher.iter(|| black_box(a).mul(&black_box(b))));
}

fn bench_scalar_mult_ct(c: &mut Criterion) {
    let base = generators::helios_base_point();
    let mut scalar = [7u8; 32];
    scalar[31] &= 0x7f;
    c.bench_function("helios_scalar_mult_ct", |bencher| {
        bencher.iter(|| scalar_mult_ct::<HeliosCurve>(black_box(&base), black_box(&scalar)))
    });
}

fn bench_msm(c: &mut Criterion) {
    let points: Vec<_> = (0..64)
        .map(|i| generators::helios_generator("bench/msm", i))
        .collect();
    let mut scalars = vec![[0u8; 32]; 64];
    for (i, s) in scalars.iter_mut().enumerate() {
        s[0] = i as u8 + 1;
    }
    c.bench_function("helios_msm_vartime_64", |bencher| {
        bencher.iter(|| msm_vartime::<HeliosCurve>(black_box(&points), black_box(&scalars)))
    });
}

criterion_group!(benches, bench_fp_mul, bench_fq_mul, bench_scalar_mult_ct, bench_msm);
criterion_main!(benches);
