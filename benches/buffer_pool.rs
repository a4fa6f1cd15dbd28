//! Benchmarks for cell-buffer pool performance

use coordmap::{BufferPool, PoolConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn benchmark_rent_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_pool_rent_miss");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let pool = BufferPool::<u32>::new();
            b.iter(|| {
                // Never handed back, so every rent allocates
                black_box(pool.rent(black_box(size)));
            });
        });
    }

    group.finish();
}

fn benchmark_rent_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_pool_rent_hit");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let pool = BufferPool::<u32>::new();
            pool.give_back(pool.rent(size));
            b.iter(|| {
                let buffer = pool.rent(black_box(size));
                pool.give_back(buffer);
            });
        });
    }

    group.finish();
}

fn benchmark_fill_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_pool_fill_cycle");

    let size = 4096;

    group.bench_function("pooled", |b| {
        let pool = BufferPool::<u64>::new();
        b.iter(|| {
            let mut buffer = pool.rent(size);
            buffer.resize(size, black_box(7));
            pool.give_back(buffer);
        });
    });

    group.bench_function("unpooled", |b| {
        b.iter(|| {
            let buffer = vec![black_box(7u64); size];
            black_box(buffer);
        });
    });

    group.finish();
}

fn benchmark_hit_rate(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_pool_hit_rate");

    // Four live buffers at a time, sizes cycling over three buckets,
    // two idle buffers kept per bucket
    let pattern: Vec<usize> = vec![16, 64, 16, 256, 64, 16, 256, 16, 64, 256];
    let config = PoolConfig {
        max_buffer_len: 1 << 12,
        max_buffers_per_bucket: 2,
    };

    group.bench_function("mixed_sizes", |b| {
        b.iter(|| {
            let pool = BufferPool::<u8>::with_config(config).unwrap();
            let mut live = Vec::with_capacity(4);

            for &size in pattern.iter().cycle().take(10000) {
                if live.len() == 4 {
                    pool.give_back(live.remove(0));
                }
                live.push(pool.rent(size));
            }

            black_box(pool.stats().hit_rate());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_rent_miss,
    benchmark_rent_hit,
    benchmark_fill_cycle,
    benchmark_hit_rate
);
criterion_main!(benches);
