//! Benchmarks for label normalization and contrast evaluation.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use yarnview::color::{is_dark_background, normalize};

/// Benchmark normalization of typical user input
fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    for raw in ["slate", "  Forest Green ", "DUSTY ROSE", "#AABBCC"] {
        group.bench_with_input(BenchmarkId::from_parameter(raw), raw, |b, raw| {
            b.iter(|| normalize(black_box(Some(raw))))
        });
    }
    group.finish();
}

/// Benchmark contrast decisions across the accepted and rejected forms
fn bench_contrast(c: &mut Criterion) {
    let mut group = c.benchmark_group("is_dark_background");
    for color in ["black", "#336699", "#abc", "mauve", "#12345"] {
        group.bench_with_input(BenchmarkId::from_parameter(color), color, |b, color| {
            b.iter(|| is_dark_background(black_box(color)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_normalize, bench_contrast);
criterion_main!(benches);
