//! Benchmarks for the sort engine.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use packplan_core::Item;
use packplan_sort::{SortAlgorithm, SortEngine};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_items(count: usize, seed: u64) -> Vec<Item> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            Item::new(
                i as i64,
                rng.gen_range(100..=10_000),
                rng.gen_range(1..=100),
                rng.gen_range(0.1..50.0),
            )
        })
        .collect()
}

fn sort_benchmark(c: &mut Criterion) {
    let engine = SortEngine::new(4);
    let mut group = c.benchmark_group("sort_descending");

    for size in [1_000usize, 10_000, 100_000] {
        let items = random_items(size, 42);
        for &algorithm in SortAlgorithm::all() {
            if algorithm == SortAlgorithm::Insertion && size > 1_000 {
                continue;
            }
            group.bench_with_input(
                BenchmarkId::new(algorithm.name(), size),
                &items,
                |b, items| {
                    b.iter(|| {
                        let mut data = items.clone();
                        engine.sort_with(algorithm, black_box(&mut data), false);
                        black_box(data)
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, sort_benchmark);
criterion_main!(benches);
