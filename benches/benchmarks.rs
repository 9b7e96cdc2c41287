use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use ntt_field::field::{Naive, Portable};
use ntt_field::ntt::RadixTwoDriver;
use ntt_field::{AlignedBuffer, FieldOps, NttDriver, Ring};

// ======================================================================
// CONST

/// A widely used NTT-friendly prime: `q - 1 = 15 * 2^27`, so it supports every transform
/// length benchmarked below while staying small enough that [`Ring::new`]'s trial-division
/// factoring of `q - 1` is instant.
const Q: u64 = 2_013_265_921;

// ======================================================================
// UTIL

fn generate_buffer(len: usize, seed: u64) -> AlignedBuffer<u64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut buf = AlignedBuffer::with_capacity(len);
    for slot in buf.as_mut_slice() {
        *slot = rng.gen_range(0..Q);
    }
    buf
}

fn ring() -> std::sync::Arc<Ring<u64>> {
    Ring::new(Q).unwrap().shared()
}

// ======================================================================
// BENCHMARKS - RING SCALAR OPS

fn benchmarks_ring(c: &mut Criterion) {
    let ring = ring();
    let mut group = c.benchmark_group("ring");

    let a = 123_456_789_u64;
    let b = 987_654_321_u64;

    group.bench_function("add", |b_| b_.iter(|| ring.add(black_box(a), black_box(b))));
    group.bench_function("sub", |b_| b_.iter(|| ring.sub(black_box(a), black_box(b))));
    group.bench_function("mul", |b_| b_.iter(|| ring.mul(black_box(a), black_box(b))));
    group.bench_function("inv", |b_| b_.iter(|| ring.inv(black_box(a))));
    group.bench_function("exp", |b_| {
        b_.iter(|| ring.exp(black_box(a), black_box(65536)))
    });
    group.bench_function("get_nth_root 65536", |b_| {
        b_.iter(|| ring.get_nth_root(black_box(65536)))
    });

    group.finish();
}

// ======================================================================
// BENCHMARKS - BUFFER PRIMITIVES

fn benchmarks_buffer(c: &mut Criterion) {
    let ring = ring();
    let naive = Naive::new(ring.clone());
    let portable = Portable::new(ring.clone());

    let mut group = c.benchmark_group("buffer");

    for len in [256usize, 4096, 65536] {
        group.throughput(Throughput::Elements(len as u64));

        let src = generate_buffer(len, 0);
        let other = generate_buffer(len, 1);

        for (name, field): (&str, &dyn FieldOps<u64>) in
            [("Naive", &naive as &dyn FieldOps<u64>), ("Portable", &portable as &dyn FieldOps<u64>)]
        {
            group.bench_with_input(BenchmarkId::new(format!("{name}/mul_coef_to_buf"), len), &src, |b_, src| {
                let mut dst = AlignedBuffer::with_capacity(len);
                b_.iter(|| field.mul_coef_to_buf(black_box(12345), src, &mut dst));
            });

            group.bench_with_input(BenchmarkId::new(format!("{name}/add_two_bufs"), len), &src, |b_, src| {
                let mut dst = other.clone();
                b_.iter(|| field.add_two_bufs(black_box(src), &mut dst));
            });

            group.bench_with_input(BenchmarkId::new(format!("{name}/hadamard_mul"), len), &src, |b_, src| {
                let mut x = other.clone();
                b_.iter(|| field.hadamard_mul(&mut x, black_box(src)));
            });

            group.bench_with_input(BenchmarkId::new(format!("{name}/butterfly_ct"), len), &src, |b_, src| {
                let mut p = src.clone();
                let mut q = other.clone();
                b_.iter(|| field.butterfly_ct(black_box(7), &mut p, &mut q));
            });

            group.bench_with_input(BenchmarkId::new(format!("{name}/butterfly_gs"), len), &src, |b_, src| {
                let mut p = src.clone();
                let mut q = other.clone();
                b_.iter(|| field.butterfly_gs(black_box(7), &mut p, &mut q));
            });
        }
    }

    group.finish();
}

// ======================================================================
// BENCHMARKS - AVX2

#[cfg(all(feature = "avx2", any(target_arch = "x86", target_arch = "x86_64")))]
fn benchmarks_avx2(c: &mut Criterion) {
    use ntt_field::field::avx2::Avx2U64;

    let ring = ring();
    let avx2 = Avx2U64::new(ring).unwrap();
    let mut group = c.benchmark_group("buffer-avx2");

    for len in [256usize, 4096, 65536] {
        group.throughput(Throughput::Elements(len as u64));

        let src = generate_buffer(len, 0);
        let other = generate_buffer(len, 1);

        group.bench_with_input(BenchmarkId::new("Avx2U64/add_two_bufs", len), &src, |b_, src| {
            let mut dst = other.clone();
            b_.iter(|| avx2.add_two_bufs(black_box(src), &mut dst));
        });

        group.bench_with_input(BenchmarkId::new("Avx2U64/butterfly_ct", len), &src, |b_, src| {
            let mut p = src.clone();
            let mut q = other.clone();
            b_.iter(|| avx2.butterfly_ct(black_box(7), &mut p, &mut q));
        });
    }

    group.finish();
}

#[cfg(not(all(feature = "avx2", any(target_arch = "x86", target_arch = "x86_64"))))]
fn benchmarks_avx2(_c: &mut Criterion) {}

// ======================================================================
// BENCHMARKS - NTT DRIVER

fn benchmarks_ntt(c: &mut Criterion) {
    let ring = ring();
    let mut group = c.benchmark_group("ntt");

    for len in [256usize, 4096, 65536] {
        group.throughput(Throughput::Elements(len as u64));

        let omega = ring.get_nth_root(len as u128);
        let field = Naive::new(ring.clone());
        let driver = RadixTwoDriver::new(field, len, omega).unwrap();

        let input = generate_buffer(len, 2);
        let mut output = AlignedBuffer::with_capacity(len);

        group.bench_with_input(BenchmarkId::new("fft", len), &input, |b_, input| {
            b_.iter(|| driver.fft(black_box(input), &mut output).unwrap());
        });

        let transformed = {
            let mut out = AlignedBuffer::with_capacity(len);
            driver.fft(&input, &mut out).unwrap();
            out
        };

        group.bench_with_input(BenchmarkId::new("ifft", len), &transformed, |b_, transformed| {
            b_.iter(|| driver.ifft(black_box(transformed), &mut output).unwrap());
        });
    }

    group.finish();
}

// ======================================================================
// MAIN

criterion_group!(benches_ring, benchmarks_ring);
criterion_group!(benches_buffer, benchmarks_buffer);
criterion_group!(benches_avx2, benchmarks_avx2);
criterion_group!(benches_ntt, benchmarks_ntt);
criterion_main!(benches_ring, benches_buffer, benches_avx2, benches_ntt);
