//! Benchmarks for folding errors into an accumulator.
//!
//! `append` on an accumulator that nothing else has seen should grow in place, so the fold stays
//! linear. The `combine` fold copies every time and is here for comparison.

use std::io;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use multierror::{append, combine, shared, SharedError};

fn make_errors(n: usize) -> Vec<SharedError> {
    (0..n).map(|i| shared(io::Error::other(format!("error {i}")))).collect()
}

/// Benchmark folding `n` errors one at a time
fn benchmark_fold(c: &mut Criterion) {
    let mut group = c.benchmark_group("fold");

    for size in [16, 256, 4096] {
        group.throughput(Throughput::Elements(size as u64));
        let errors = make_errors(size);

        group.bench_with_input(BenchmarkId::new("append", size), &errors, |b, errors| {
            b.iter(|| {
                let mut acc = None;
                for error in errors {
                    acc = append(acc, Some(error.clone()));
                }
                std::hint::black_box(acc);
            });
        });

        // Quadratic; keep the sizes small enough to finish.
        if size <= 256 {
            group.bench_with_input(BenchmarkId::new("combine", size), &errors, |b, errors| {
                b.iter(|| {
                    let mut acc = None;
                    for error in errors {
                        acc = combine(&[acc, Some(error.clone())]);
                    }
                    std::hint::black_box(acc);
                });
            });
        }
    }
    group.finish();
}

/// Benchmark rendering an aggregate in both modes
fn benchmark_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("format");
    let err = combine(&make_errors(64).into_iter().map(Some).collect::<Vec<_>>()).unwrap();

    group.bench_function("compact", |b| b.iter(|| std::hint::black_box(err.to_string())));
    group.bench_function("verbose", |b| b.iter(|| std::hint::black_box(format!("{err:#}"))));
    group.finish();
}

criterion_group!(benches, benchmark_fold, benchmark_format);
criterion_main!(benches);
