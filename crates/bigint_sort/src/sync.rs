//! Shared state for the chunk-claiming partition.
//!
//! All cross-worker counters are plain atomics. Claims use `AcqRel`
//! read-modify-write so a worker that obtains a chunk also observes every
//! element write published before the previous phase barrier.

use std::marker::PhantomData;
use std::ptr;
use std::sync::Barrier;
use std::sync::atomic::{AtomicBool, AtomicIsize, Ordering};

use crossbeam_utils::CachePadded;

use crate::SortError;

/// Synchronization point shared by every worker of one partition call.
///
/// `wait` returns `true` on exactly one worker per phase.
pub trait PhaseBarrier: Sync {
    fn wait(&self) -> bool;
}

impl PhaseBarrier for Barrier {
    #[inline]
    fn wait(&self) -> bool {
        Barrier::wait(self).is_leader()
    }
}

/// Left and right frontier of the unclaimed region `[left, right]` plus the
/// remaining width `dist`.
///
/// The three fields are updated independently. `dist` is always taken first,
/// so a frontier only moves once the budget for a whole chunk is secured.
#[derive(Debug)]
pub(crate) struct Frontiers {
    left: CachePadded<AtomicIsize>,
    right: CachePadded<AtomicIsize>,
    dist: CachePadded<AtomicIsize>,
}

impl Frontiers {
    pub fn new(left: isize, right: isize) -> Self {
        Self {
            left: CachePadded::new(AtomicIsize::new(left)),
            right: CachePadded::new(AtomicIsize::new(right)),
            dist: CachePadded::new(AtomicIsize::new(right - left + 1)),
        }
    }

    #[inline]
    fn take_budget(&self, chunk: isize) -> bool {
        let former = self.dist.fetch_sub(chunk, Ordering::AcqRel);
        if former < chunk {
            self.dist.fetch_add(chunk, Ordering::AcqRel);
            return false;
        }
        true
    }

    /// Claims the next chunk at the left frontier, returning its first index.
    #[inline]
    pub fn claim_left(&self, chunk: isize) -> Option<isize> {
        if !self.take_budget(chunk) {
            return None;
        }
        Some(self.left.fetch_add(chunk, Ordering::AcqRel))
    }

    /// Claims the next chunk at the right frontier, returning its last index.
    #[inline]
    pub fn claim_right(&self, chunk: isize) -> Option<isize> {
        if !self.take_budget(chunk) {
            return None;
        }
        Some(self.right.fetch_sub(chunk, Ordering::AcqRel))
    }

    #[inline]
    pub fn left(&self) -> isize {
        self.left.load(Ordering::Acquire)
    }

    #[inline]
    pub fn right(&self) -> isize {
        self.right.load(Ordering::Acquire)
    }

    #[cfg(test)]
    pub fn dist(&self) -> isize {
        self.dist.load(Ordering::Acquire)
    }

    /// Moves both frontiers and resets the budget. Only called while every
    /// other worker is parked on a barrier.
    pub fn publish(&self, left: isize, right: isize) {
        self.left.store(left, Ordering::Release);
        self.right.store(right, Ordering::Release);
        self.dist.store(right - left + 1, Ordering::Release);
    }
}

/// One flag per leftover-chunk slot on one side of the partition.
#[derive(Debug)]
pub(crate) struct ReservationTable {
    slots: Vec<AtomicBool>,
}

impl ReservationTable {
    pub fn try_new(len: usize) -> Result<Self, SortError> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(len)
            .map_err(|_| SortError::OutOfMemory {
                buffer: "reservation table",
                len,
            })?;
        slots.extend((0..len).map(|_| AtomicBool::new(false)));
        Ok(Self { slots })
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Marks `slot` as already holding its final chunk.
    #[inline]
    pub fn mark(&self, slot: usize) -> bool {
        self.slots[slot]
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
    }

    /// Reserves the first free slot among the first `limit` slots.
    pub fn acquire_free(&self, limit: usize) -> Option<usize> {
        self.slots[..limit.min(self.slots.len())]
            .iter()
            .position(|flag| {
                !flag.load(Ordering::Acquire)
                    && flag
                        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Relaxed)
                        .is_ok()
            })
    }

    pub fn clear(&self) {
        for flag in &self.slots {
            flag.store(false, Ordering::Release);
        }
    }
}

/// Shared view of a mutable slice for workers that touch disjoint indices.
pub(crate) struct SharedSlice<'a, T> {
    ptr: *mut T,
    len: usize,
    _marker: PhantomData<&'a mut [T]>,
}

// SAFETY: every access goes through the unsafe accessors below, whose callers
// guarantee that no index is touched by two workers between barriers.
unsafe impl<T: Send + Sync> Sync for SharedSlice<'_, T> {}
unsafe impl<T: Send> Send for SharedSlice<'_, T> {}

impl<'a, T> SharedSlice<'a, T> {
    pub fn new(data: &'a mut [T]) -> Self {
        Self {
            ptr: data.as_mut_ptr(),
            len: data.len(),
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// # Safety
    /// `i` must be in bounds and not concurrently written by another worker.
    #[inline]
    pub unsafe fn get(&self, i: usize) -> &T {
        debug_assert!(i < self.len);
        unsafe { &*self.ptr.add(i) }
    }

    /// # Safety
    /// Both indices must be in bounds and owned by the calling worker.
    #[inline]
    pub unsafe fn swap(&self, i: usize, j: usize) {
        debug_assert!(i < self.len && j < self.len);
        unsafe { ptr::swap(self.ptr.add(i), self.ptr.add(j)) }
    }

    /// Swaps `[a, a + count)` with `[b, b + count)`.
    ///
    /// # Safety
    /// The ranges must be in bounds, disjoint and owned by the calling worker.
    #[inline]
    pub unsafe fn swap_ranges(&self, a: usize, b: usize, count: usize) {
        debug_assert!(a + count <= self.len && b + count <= self.len);
        debug_assert!(a + count <= b || b + count <= a);
        unsafe { ptr::swap_nonoverlapping(self.ptr.add(a), self.ptr.add(b), count) }
    }
}
