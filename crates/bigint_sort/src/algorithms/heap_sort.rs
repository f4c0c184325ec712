//! Bottom-up heapsort.
//!
//! Re-heapifying walks the hole left at the root straight down to a leaf
//! along the larger children, then lifts the displaced element back up.

pub fn heap_sort<T: Ord>(data: &mut [T]) {
    make_heap(data);
    for end in (1..data.len()).rev() {
        data.swap(0, end);
        adjust_heap(&mut data[..end], 0);
    }
}

/// Arranges `heap` as a max-heap.
pub(crate) fn make_heap<T: Ord>(heap: &mut [T]) {
    for parent in (0..heap.len() / 2).rev() {
        adjust_heap(heap, parent);
    }
}

/// Restores the heap below `top`, assuming both subtrees of `top` are heaps.
fn adjust_heap<T: Ord>(heap: &mut [T], top: usize) {
    let len = heap.len();
    let mut hole = top;
    let mut child = 2 * hole + 2;
    while child < len {
        if heap[child] < heap[child - 1] {
            child -= 1;
        }
        heap.swap(hole, child);
        hole = child;
        child = 2 * hole + 2;
    }
    // Lone left child at the end of an even-length heap.
    if child == len {
        heap.swap(hole, child - 1);
        hole = child - 1;
    }
    push_heap(heap, hole, top);
}

/// Moves the element at `hole` up until its parent is not smaller, never
/// past `top`.
fn push_heap<T: Ord>(heap: &mut [T], mut hole: usize, top: usize) {
    while hole > top {
        let parent = (hole - 1) / 2;
        if heap[parent] >= heap[hole] {
            break;
        }
        heap.swap(parent, hole);
        hole = parent;
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn is_max_heap<T: Ord>(heap: &[T]) -> bool {
        (1..heap.len()).all(|i| heap[(i - 1) / 2] >= heap[i])
    }

    #[test]
    fn sorts_bigints() {
        let mut data = [9_i64, -4, 7, 7, 0, 123, -99, 5]
            .map(|x| BigInt::from(x) * BigInt::from(10_u64).pow(30));
        let mut expected = data.clone();
        expected.sort();
        heap_sort(&mut data);
        assert_eq!(data, expected);
    }

    #[test]
    fn trivial_inputs() {
        let mut empty: [u8; 0] = [];
        heap_sort(&mut empty);
        let mut one = [1];
        heap_sort(&mut one);
        assert_eq!(one, [1]);
        let mut two = [2, 1];
        heap_sort(&mut two);
        assert_eq!(two, [1, 2]);
    }

    #[test]
    fn make_heap_odd_and_even_lengths() {
        let mut rng = StdRng::seed_from_u64(0x4EA9_2026);
        for len in 0..64 {
            let mut heap = (0..len).map(|_| rng.random_range(0..16_u8)).collect::<Vec<_>>();
            let mut expected = heap.clone();
            make_heap(&mut heap);
            assert!(is_max_heap(&heap), "len={len} heap={heap:?}");

            heap.sort_unstable();
            expected.sort_unstable();
            assert_eq!(heap, expected);
        }
    }

    #[test]
    fn random_inputs_match_std() {
        let mut rng = StdRng::seed_from_u64(0x4EA9_2027);
        for &size in &[3_usize, 17, 256, 1001] {
            let data = (0..size).map(|_| rng.random::<i32>()).collect::<Vec<_>>();
            let mut actual = data.clone();
            heap_sort(&mut actual);
            let mut expected = data;
            expected.sort_unstable();
            assert_eq!(actual, expected, "size={size}");
        }
    }
}
