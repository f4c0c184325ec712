//! Chunk-claiming parallel partition.
//!
//! Workers repeatedly claim one chunk from each frontier of the unclaimed
//! region and run a two-finger swap across the pair. When the budget runs
//! dry, partially processed chunks are swapped next to the frontiers, the
//! frontiers are moved back over them, and the next round starts on the
//! shrunken gap. A final single-threaded pass resolves what is left.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicIsize, Ordering};
use std::sync::{Barrier, Mutex, PoisonError};

use log::{debug, trace, warn};

use crate::SortError;
use crate::config::SortConfig;
use crate::sync::{Frontiers, PhaseBarrier, ReservationTable, SharedSlice};

/// Reorders `data` so that every element satisfying `pred` precedes the
/// returned index and every other element follows it.
///
/// At most `num_threads` workers are used, and only while the unclaimed
/// region holds at least two chunks per worker. A panic raised by `pred` on
/// any worker is resumed on the calling thread once every worker has stopped.
pub fn parallel_partition<T, F>(
    data: &mut [T],
    pred: F,
    num_threads: usize,
    config: &SortConfig,
) -> Result<usize, SortError>
where
    T: Send + Sync,
    F: Fn(&T) -> bool + Sync,
{
    parallel_partition_with_barrier(data, pred, num_threads, config, Barrier::new)
}

/// Same as [`parallel_partition`], with the phase barrier built by
/// `make_barrier` from the number of workers that will wait on it.
///
/// `make_barrier` is only called when the parallel rounds actually run.
pub fn parallel_partition_with_barrier<T, F, B, M>(
    data: &mut [T],
    pred: F,
    num_threads: usize,
    config: &SortConfig,
    make_barrier: M,
) -> Result<usize, SortError>
where
    T: Send + Sync,
    F: Fn(&T) -> bool + Sync,
    B: PhaseBarrier,
    M: FnOnce(usize) -> B,
{
    config.validate()?;
    let n = data.len();
    if n == 0 {
        return Ok(0);
    }

    let num_threads = num_threads.clamp(1, n);
    let chunk = config.effective_chunk_size(n, num_threads);
    let shared = SharedSlice::new(data);

    let (left, right) = if num_threads > 1 && round_is_parallel(n as isize, num_threads, chunk)
    {
        let barrier = make_barrier(num_threads);
        claim_rounds(&shared, &pred, num_threads, chunk as isize, &barrier)?
    } else {
        debug!("partition of {n} elements runs single-threaded");
        (0, n as isize - 1)
    };

    Ok(finish_partition(&shared, &pred, left, right))
}

#[inline]
fn round_is_parallel(dist: isize, num_threads: usize, chunk: usize) -> bool {
    dist >= 0 && dist as usize >= num_threads.saturating_mul(chunk).saturating_mul(2)
}

type PanicPayload = Box<dyn Any + Send + 'static>;

struct PartitionState {
    frontiers: Frontiers,
    leftover_left: AtomicIsize,
    leftover_right: AtomicIsize,
    reserved_left: ReservationTable,
    reserved_right: ReservationTable,
    poisoned: AtomicBool,
    panic: Mutex<Option<PanicPayload>>,
}

impl PartitionState {
    fn try_new(n: isize, num_threads: usize) -> Result<Self, SortError> {
        Ok(Self {
            frontiers: Frontiers::new(0, n - 1),
            leftover_left: AtomicIsize::new(0),
            leftover_right: AtomicIsize::new(0),
            reserved_left: ReservationTable::try_new(num_threads)?,
            reserved_right: ReservationTable::try_new(num_threads)?,
            poisoned: AtomicBool::new(false),
            panic: Mutex::new(None),
        })
    }

    /// Records the first panic raised by a worker. Later payloads are dropped.
    fn poison(&self, payload: PanicPayload) {
        self.poisoned.store(true, Ordering::Release);
        let mut slot = self.panic.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(payload);
        }
    }

    #[inline]
    fn is_poisoned(&self) -> bool {
        self.poisoned.load(Ordering::Acquire)
    }

    fn take_panic(&self) -> Option<PanicPayload> {
        self.panic
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// Runs the parallel rounds and returns the final unclaimed gap `[left, right]`.
fn claim_rounds<T, F, B>(
    data: &SharedSlice<'_, T>,
    pred: &F,
    num_threads: usize,
    chunk: isize,
    barrier: &B,
) -> Result<(isize, isize), SortError>
where
    T: Send + Sync,
    F: Fn(&T) -> bool + Sync,
    B: PhaseBarrier,
{
    let state = PartitionState::try_new(data.len() as isize, num_threads)?;
    let state = &state;

    let gap = std::thread::scope(|s| {
        for _ in 1..num_threads {
            s.spawn(move || worker(data, pred, state, num_threads, chunk, barrier));
        }
        worker(data, pred, state, num_threads, chunk, barrier)
    });

    if let Some(payload) = state.take_panic() {
        panic::resume_unwind(payload);
    }
    Ok(gap)
}

/// Per-worker view of the chunk pair it currently owns.
///
/// The left chunk is `[left_border - chunk + 1, left_border]` with cursor
/// `left`; the right chunk is `[right_border, right_border + chunk - 1]` with
/// cursor `right`. A chunk is held while its cursor has not crossed its border.
struct ChunkPair {
    left: isize,
    left_border: isize,
    right: isize,
    right_border: isize,
}

impl ChunkPair {
    fn empty() -> Self {
        Self {
            left: 1,
            left_border: 0,
            right: 0,
            right_border: 1,
        }
    }

    #[inline]
    fn holds_left(&self) -> bool {
        self.left <= self.left_border
    }

    #[inline]
    fn holds_right(&self) -> bool {
        self.right >= self.right_border
    }
}

fn worker<T, F, B>(
    data: &SharedSlice<'_, T>,
    pred: &F,
    state: &PartitionState,
    num_threads: usize,
    chunk: isize,
    barrier: &B,
) -> (isize, isize)
where
    T: Send + Sync,
    F: Fn(&T) -> bool + Sync,
    B: PhaseBarrier,
{
    let mut gap = (0, data.len() as isize - 1);

    while round_is_parallel(gap.1 - gap.0 + 1, num_threads, chunk as usize) {
        // `pred` is the only user code run by a worker. Its panic must not
        // leave the other workers parked on the barrier.
        let claimed = panic::catch_unwind(AssertUnwindSafe(|| {
            claim_and_swap(data, pred, &state.frontiers, chunk)
        }));
        let pair = match claimed {
            Ok(pair) => pair,
            Err(payload) => {
                state.poison(payload);
                ChunkPair::empty()
            }
        };

        if pair.holds_left() {
            state.leftover_left.fetch_add(1, Ordering::AcqRel);
        }
        if pair.holds_right() {
            state.leftover_right.fetch_add(1, Ordering::AcqRel);
        }

        // Claims finished: frontiers and leftover counts are final.
        let leader = barrier.wait();

        // Every worker sees the same flag here, so all of them leave together.
        if state.is_poisoned() {
            if leader {
                warn!("partition abandoned after a panicking predicate");
            }
            break;
        }

        let left_old = state.frontiers.left();
        let right_old = state.frontiers.right();
        let num_left = state.leftover_left.load(Ordering::Acquire);
        let num_right = state.leftover_right.load(Ordering::Acquire);
        let left_new = left_old - num_left * chunk;
        let right_new = right_old + num_right * chunk;

        if pair.holds_left() && pair.left_border >= left_new {
            state
                .reserved_left
                .mark(((left_old - (pair.left_border + 1)) / chunk) as usize);
        }
        if pair.holds_right() && pair.right_border <= right_new {
            state
                .reserved_right
                .mark(((pair.right_border - 1 - right_old) / chunk) as usize);
        }

        // Reservations marked: every in-place chunk owns its slot.
        barrier.wait();

        if pair.holds_left() && pair.left_border < left_new {
            let Some(slot) = state.reserved_left.acquire_free(num_left as usize) else {
                unreachable!("misplaced left chunk without a free slot");
            };
            let target = left_old - (slot as isize + 1) * chunk;
            let source = pair.left_border - (chunk - 1);
            // SAFETY: the source chunk is ours and the target slot was reserved above.
            unsafe { data.swap_ranges(source as usize, target as usize, chunk as usize) };
        }
        if pair.holds_right() && pair.right_border > right_new {
            let Some(slot) = state.reserved_right.acquire_free(num_right as usize) else {
                unreachable!("misplaced right chunk without a free slot");
            };
            let target = right_old + slot as isize * chunk + 1;
            // SAFETY: as for the left side.
            unsafe {
                data.swap_ranges(pair.right_border as usize, target as usize, chunk as usize)
            };
        }

        // Swaps finished: the leader publishes the next round.
        if barrier.wait() {
            trace!("partition round converged to [{left_new}, {right_new}]");
            state.frontiers.publish(left_new, right_new);
            state.leftover_left.store(0, Ordering::Release);
            state.leftover_right.store(0, Ordering::Release);
            state.reserved_left.clear();
            state.reserved_right.clear();
        }

        // Next round published.
        barrier.wait();
        gap = (left_new, right_new);
    }

    gap
}

/// Claims chunk pairs until the shared budget is exhausted, returning the
/// pair that was held when claiming stopped.
fn claim_and_swap<T, F>(
    data: &SharedSlice<'_, T>,
    pred: &F,
    frontiers: &Frontiers,
    chunk: isize,
) -> ChunkPair
where
    F: Fn(&T) -> bool,
{
    let mut pair = ChunkPair::empty();

    loop {
        if !pair.holds_left() {
            let Some(start) = frontiers.claim_left(chunk) else {
                return pair;
            };
            pair.left = start;
            pair.left_border = start + (chunk - 1);
        }
        if !pair.holds_right() {
            let Some(end) = frontiers.claim_right(chunk) else {
                return pair;
            };
            pair.right = end;
            pair.right_border = end - (chunk - 1);
        }

        // SAFETY: both chunks were claimed by this worker alone.
        unsafe {
            while pair.left < pair.right {
                while pair.holds_left() && pred(data.get(pair.left as usize)) {
                    pair.left += 1;
                }
                while pair.holds_right() && !pred(data.get(pair.right as usize)) {
                    pair.right -= 1;
                }
                if !pair.holds_left() || !pair.holds_right() {
                    break;
                }
                data.swap(pair.left as usize, pair.right as usize);
                pair.left += 1;
                pair.right -= 1;
            }
        }
    }
}

/// Two-finger pass over the closed range `[left, right]`, returning the exact
/// split index of the whole slice.
fn finish_partition<T, F>(
    data: &SharedSlice<'_, T>,
    pred: &F,
    mut left: isize,
    mut right: isize,
) -> usize
where
    F: Fn(&T) -> bool,
{
    let n = data.len() as isize;

    // SAFETY: called after every worker has joined.
    unsafe {
        while left < right {
            while left < right && pred(data.get(left as usize)) {
                left += 1;
            }
            while left < right && !pred(data.get(right as usize)) {
                right -= 1;
            }
            if left == right {
                break;
            }
            data.swap(left as usize, right as usize);
            left += 1;
            right -= 1;
        }

        if left < n && !pred(data.get(left as usize)) {
            left as usize
        } else {
            left as usize + 1
        }
    }
}
