mod algorithms;
mod bigint_io;
mod config;
mod error;
mod partition;
mod quicksort;
mod sequential;
mod sync;

use num_bigint::BigInt;

pub use algorithms::heap_sort::heap_sort;
pub use algorithms::merge_sort::merge_sort;
pub use bigint_io::{load_bigints, read_bigints, write_bigints};
pub use config::{DEFAULT_CONFIG, SortConfig};
pub use error::{LoadError, SortError};
pub use partition::{parallel_partition, parallel_partition_with_barrier};
pub use quicksort::parallel_sort;
pub use sequential::{Band, partition, partition_3way, partition_by, sequential_sort};
pub use sync::PhaseBarrier;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Algorithm {
    Quicksort,
    ParallelQuicksort,
    Mergesort,
    Heapsort,
}

pub const ALL_ALGORITHMS: [Algorithm; 4] = [
    Algorithm::Quicksort,
    Algorithm::ParallelQuicksort,
    Algorithm::Mergesort,
    Algorithm::Heapsort,
];

pub fn all_algorithms() -> &'static [Algorithm] {
    &ALL_ALGORITHMS
}

pub fn algorithm_name(algo: Algorithm) -> &'static str {
    match algo {
        Algorithm::Quicksort => "quicksort",
        Algorithm::ParallelQuicksort => "parallel_quicksort",
        Algorithm::Mergesort => "mergesort",
        Algorithm::Heapsort => "heapsort",
    }
}

/// Sorts `data` ascending with `algo`. Only the parallel quicksort uses the
/// thread budget and the chunk/sample settings of `config`.
pub fn sort_with<T>(
    algo: Algorithm,
    data: &mut [T],
    num_threads: usize,
    config: &SortConfig,
) -> Result<(), SortError>
where
    T: Ord + Clone + Send + Sync,
{
    match algo {
        Algorithm::Quicksort => {
            sequential_sort(data);
            Ok(())
        }
        Algorithm::ParallelQuicksort => parallel_sort(data, num_threads, config),
        Algorithm::Mergesort => merge_sort(data),
        Algorithm::Heapsort => {
            heap_sort(data);
            Ok(())
        }
    }
}

/// Sorts big integers in place with the default configuration.
pub fn sort_bigints(data: &mut [BigInt], num_threads: usize) -> Result<(), SortError> {
    parallel_sort(data, num_threads, &DEFAULT_CONFIG)
}

pub fn is_sorted<T: Ord>(data: &[T]) -> bool {
    data.windows(2).all(|w| w[0] <= w[1])
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn assert_sorts_like_std(data: &[BigInt], num_threads: usize) {
        let config = DEFAULT_CONFIG.with_chunk_size(8);
        for &algo in all_algorithms() {
            let mut actual = data.to_vec();
            sort_with(algo, &mut actual, num_threads, &config).unwrap();

            let mut expected = data.to_vec();
            expected.sort_unstable();

            assert_eq!(
                actual,
                expected,
                "algorithm={} input_len={} threads={num_threads}",
                algorithm_name(algo),
                data.len(),
            );
        }
    }

    #[test]
    fn algorithm_names_are_unique() {
        let mut seen = HashSet::new();
        for &algo in all_algorithms() {
            assert!(seen.insert(algorithm_name(algo)));
        }
    }

    #[test]
    fn edge_cases() {
        let big = BigInt::from(u128::MAX) * BigInt::from(u128::MAX);
        let cases = [
            vec![],
            vec![BigInt::from(42)],
            (1..=6).map(BigInt::from).collect(),
            (1..=6).rev().map(BigInt::from).collect(),
            vec![BigInt::from(7); 128],
            vec![
                big.clone(),
                BigInt::from(1),
                -big.clone(),
                BigInt::from(0),
                big - 1,
                BigInt::from(-2),
            ],
            [5, 5, 3, 3, 1, 1, 4, 4, 2, 2, 0, 0].map(BigInt::from).to_vec(),
        ];

        for case in &cases {
            for threads in [1, 2, 4] {
                assert_sorts_like_std(case, threads);
            }
        }
    }

    #[test]
    fn fixed_seed_random_cases() {
        let mut rng = StdRng::seed_from_u64(0x5EED_2026);
        for &size in &[2_usize, 3, 8, 31, 64, 511, 2048] {
            let data = (0..size)
                .map(|_| {
                    let limbs = (0..rng.random_range(1..6))
                        .map(|_| rng.random::<u32>())
                        .collect::<Vec<_>>();
                    let magnitude = num_bigint::BigUint::new(limbs);
                    if rng.random::<bool>() {
                        BigInt::from(magnitude)
                    } else {
                        -BigInt::from(magnitude)
                    }
                })
                .collect::<Vec<_>>();
            assert_sorts_like_std(&data, 4);
        }
    }

    #[test]
    fn sort_bigints_uses_defaults() {
        let mut data = [5, 3, 8, 1, 9, 2].map(BigInt::from);
        sort_bigints(&mut data, 2).unwrap();
        assert_eq!(data, [1, 2, 3, 5, 8, 9].map(BigInt::from));
        assert!(is_sorted(&data));
        assert!(!is_sorted(&[BigInt::from(2), BigInt::from(1)]));
    }
}
