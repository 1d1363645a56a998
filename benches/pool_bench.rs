//! Benchmark for the asynchronous paths: `map` with pending mappers versus
//! `map_pool` at several concurrency limits.
//!
//! Uses `criterion::to_async()` so runtime enter/exit is batched per sample.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tacit::{Eventual, Value, map, map_pool, map_series};

fn yielding(value: Value) -> Eventual<Value> {
    Eventual::pending(async move {
        tokio::task::yield_now().await;
        Ok(Value::from(value.as_i64().unwrap_or(0) * 2))
    })
}

fn numbers(size: i64) -> Value {
    Value::from((0..size).collect::<Vec<_>>())
}

// =============================================================================
// Unbounded vs Bounded
// =============================================================================

fn benchmark_pending_map(criterion: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let mut group = criterion.benchmark_group("pending_map");
    let unbounded = map(yielding);
    let series = map_series(yielding);

    for size in [10, 100, 1000] {
        let array = numbers(size);
        group.bench_with_input(BenchmarkId::new("map", size), &array, |bencher, array| {
            bencher
                .to_async(&runtime)
                .iter(|| async { black_box(unbounded.apply(black_box(array.clone())).await) });
        });
        group.bench_with_input(BenchmarkId::new("map_series", size), &array, |bencher, array| {
            bencher
                .to_async(&runtime)
                .iter(|| async { black_box(series.apply(black_box(array.clone())).await) });
        });
    }

    group.finish();
}

fn benchmark_pool_limits(criterion: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let mut group = criterion.benchmark_group("map_pool");
    let array = numbers(1000);

    for limit in [1, 4, 16, 64] {
        let pool = map_pool(limit, yielding).expect("limit is positive");
        group.bench_with_input(BenchmarkId::new("limit", limit), &array, |bencher, array| {
            bencher
                .to_async(&runtime)
                .iter(|| async { black_box(pool.apply(black_box(array.clone())).await) });
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Group and Main
// =============================================================================

criterion_group!(benches, benchmark_pending_map, benchmark_pool_limits);

criterion_main!(benches);
