use std::hint::black_box;
use std::time::{Duration, Instant};

use bench::{apply_large_runtime_config, apply_medium_runtime_config, default_rng, random_bigints};
use bigint_sort::{
    Algorithm, DEFAULT_CONFIG, algorithm_name, all_algorithms, parallel_partition, sort_with,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use num_bigint::BigInt;

const BENCH_SIZES: [usize; 3] = [16384, 65536, 262144];
const BIT_WIDTHS: [u32; 2] = [64, 1024];
const THREAD_COUNTS: [usize; 4] = [1, 2, 4, 8];

fn bench_algorithms(c: &mut Criterion) {
    let mut rng = default_rng();
    for &bits in &BIT_WIDTHS {
        let mut group = c.benchmark_group(format!("sort/bits_{bits}"));
        apply_large_runtime_config(&mut group);

        for &size in &BENCH_SIZES {
            let base = random_bigints(&mut rng, size, bits);
            for &algo in all_algorithms() {
                let threads = if algo == Algorithm::ParallelQuicksort { 4 } else { 1 };
                group.bench_function(BenchmarkId::new(algorithm_name(algo), size), |bencher| {
                    bencher.iter_custom(|iters| {
                        time_sorts(iters, &base, |data| {
                            sort_with(algo, data, threads, &DEFAULT_CONFIG).unwrap()
                        })
                    });
                });
            }

            group.bench_function(BenchmarkId::new("std_unstable", size), |bencher| {
                bencher.iter_custom(|iters| time_sorts(iters, &base, |data| data.sort_unstable()));
            });
        }
        group.finish();
    }
}

fn bench_thread_scaling(c: &mut Criterion) {
    let mut rng = default_rng();
    let base = random_bigints(&mut rng, 262144, 256);

    let mut group = c.benchmark_group("parallel_quicksort/threads");
    apply_large_runtime_config(&mut group);
    for &threads in &THREAD_COUNTS {
        group.bench_function(BenchmarkId::from_parameter(threads), |bencher| {
            bencher.iter_custom(|iters| {
                time_sorts(iters, &base, |data| {
                    sort_with(Algorithm::ParallelQuicksort, data, threads, &DEFAULT_CONFIG)
                        .unwrap()
                })
            });
        });
    }
    group.finish();

    let mut group = c.benchmark_group("parallel_partition/threads");
    apply_medium_runtime_config(&mut group);
    let pivot = BigInt::ZERO;
    for &threads in &THREAD_COUNTS {
        group.bench_function(BenchmarkId::from_parameter(threads), |bencher| {
            bencher.iter_custom(|iters| {
                time_sorts(iters, &base, |data| {
                    black_box(
                        parallel_partition(data, |x| *x < pivot, threads, &DEFAULT_CONFIG)
                            .unwrap(),
                    );
                })
            });
        });
    }
    group.finish();
}

fn time_sorts<F>(iters: u64, base: &[BigInt], mut run: F) -> Duration
where
    F: FnMut(&mut [BigInt]),
{
    let mut total = Duration::ZERO;
    for _ in 0..iters {
        let mut data = base.to_vec();
        let start = Instant::now();
        run(&mut data);
        total += start.elapsed();
        black_box(&data);
    }
    total
}

criterion_group!(benches, bench_algorithms, bench_thread_scaling);
criterion_main!(benches);
