//! Unbalanced parallel quicksort.
//!
//! Each level draws evenly spaced samples, picks the pivot whose rank matches
//! the share of threads handed to the left branch, partitions in parallel,
//! then sorts both sides concurrently with the thread budget split between
//! them.

use log::{debug, trace};

use crate::SortError;
use crate::config::SortConfig;
use crate::partition::parallel_partition;
use crate::sequential::sequential_sort;

/// Sorts `data` ascending using at most `num_threads` threads.
///
/// The budget is clamped to `[1, data.len()]`.
pub fn parallel_sort<T>(
    data: &mut [T],
    num_threads: usize,
    config: &SortConfig,
) -> Result<(), SortError>
where
    T: Ord + Clone + Send + Sync,
{
    config.validate()?;
    let n = data.len();
    if n < 2 {
        return Ok(());
    }

    let num_threads = num_threads.clamp(1, n);
    debug!("parallel sort of {n} elements with {num_threads} threads");
    conquer(data, num_threads, config)
}

/// `i * num / den` without intermediate overflow.
#[inline]
fn scale(i: usize, num: usize, den: usize) -> usize {
    (i as u128 * num as u128 / den as u128) as usize
}

fn conquer<T>(data: &mut [T], num_threads: usize, config: &SortConfig) -> Result<(), SortError>
where
    T: Ord + Clone + Send + Sync,
{
    if num_threads <= 1 {
        sequential_sort(data);
        return Ok(());
    }

    let n = data.len();
    if n <= 1 {
        return Ok(());
    }

    let num_threads = num_threads.min(n);
    let left_threads = num_threads.div_ceil(2);
    let pivot_rank = scale(n, left_threads, num_threads);

    let split = divide(data, pivot_rank, num_threads, config)?;
    trace!("divided {n} elements at {split} ({left_threads}/{num_threads} threads left)");

    let (left, right) = data.split_at_mut(split);
    let (left_result, right_result) = rayon::join(
        || conquer(left, left_threads, config),
        || conquer(right, num_threads - left_threads, config),
    );
    left_result?;
    right_result
}

/// Picks a pivot of approximately rank `pivot_rank` from a sorted sample and
/// partitions `data` around it, returning the split index.
fn divide<T>(
    data: &mut [T],
    pivot_rank: usize,
    num_threads: usize,
    config: &SortConfig,
) -> Result<usize, SortError>
where
    T: Ord + Clone + Send + Sync,
{
    let n = data.len();
    let num_samples = config.sample_count.min(n);

    let mut samples = Vec::new();
    samples
        .try_reserve_exact(num_samples)
        .map_err(|_| SortError::OutOfMemory {
            buffer: "pivot samples",
            len: num_samples,
        })?;
    samples.extend((0..num_samples).map(|s| data[scale(s, n, num_samples)].clone()));
    sequential_sort(&mut samples);

    let pivot = samples.swap_remove(scale(pivot_rank, num_samples, n));
    drop(samples);

    parallel_partition(data, |x| *x < pivot, num_threads, config)
}
