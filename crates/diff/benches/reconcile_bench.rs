//! Benchmarks for vitrine-diff reconciliation.
//!
//! Target: a 1000-row catalog reconciles well under one frame (16ms)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vitrine_core::Product;
use vitrine_diff::reconcile;

fn catalog(size: u64) -> Vec<Product> {
    (0..size)
        .map(|id| Product::new(id, format!("Product {id}"), "bench item", 100))
        .collect()
}

fn bench_price_change(c: &mut Criterion) {
    let mut group = c.benchmark_group("price_change");

    for size in [10, 100, 1000, 10_000] {
        let old = catalog(size);
        let mut new = old.clone();
        let middle = new.len() / 2;
        new[middle].price += 1;

        group.bench_with_input(BenchmarkId::new("single", size), &(old, new), |b, (old, new)| {
            b.iter(|| reconcile(black_box(old), black_box(new)))
        });
    }

    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");

    // A search narrowing the list to every third product
    for size in [100, 1000, 10_000] {
        let old = catalog(size);
        let new: Vec<Product> = old.iter().filter(|p| p.id % 3 == 0).cloned().collect();

        group.bench_with_input(BenchmarkId::new("every_third", size), &(old, new), |b, (old, new)| {
            b.iter(|| reconcile(black_box(old), black_box(new)))
        });
    }

    group.finish();
}

fn bench_reorder(c: &mut Criterion) {
    let mut group = c.benchmark_group("reorder");

    for size in [100, 1000] {
        let old = catalog(size);
        let mut rotated = old.clone();
        rotated.rotate_left(1);
        let mut reversed = old.clone();
        reversed.reverse();

        group.bench_with_input(BenchmarkId::new("rotate", size), &(old.clone(), rotated), |b, (old, new)| {
            b.iter(|| reconcile(black_box(old), black_box(new)))
        });
        group.bench_with_input(BenchmarkId::new("reverse", size), &(old, reversed), |b, (old, new)| {
            b.iter(|| reconcile(black_box(old), black_box(new)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_price_change, bench_filter, bench_reorder);
criterion_main!(benches);
