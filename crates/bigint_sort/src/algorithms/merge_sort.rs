use std::mem;

use crate::SortError;

/// Stable top-down merge sort. Needs a scratch buffer of half the input.
pub fn merge_sort<T: Ord + Clone>(data: &mut [T]) -> Result<(), SortError> {
    let len = data.len();
    if len < 2 {
        return Ok(());
    }

    let half = len / 2;
    let mut buf = Vec::new();
    buf.try_reserve_exact(half)
        .map_err(|_| SortError::OutOfMemory {
            buffer: "merge scratch",
            len: half,
        })?;
    merge_sort_recursive(data, &mut buf);
    Ok(())
}

fn merge_sort_recursive<T: Ord + Clone>(data: &mut [T], buf: &mut Vec<T>) {
    let len = data.len();
    if len < 2 {
        return;
    }

    let mid = len / 2;
    merge_sort_recursive(&mut data[..mid], buf);
    merge_sort_recursive(&mut data[mid..], buf);

    if data[mid - 1] <= data[mid] {
        return;
    }

    buf.clear();
    buf.extend_from_slice(&data[..mid]);

    // Slots behind `out` hold stale values that are overwritten before the
    // merge completes, so moving by swap keeps `data` a permutation.
    let (mut i, mut j, mut out) = (0, mid, 0);
    while i < buf.len() && j < len {
        if data[j] < buf[i] {
            data.swap(out, j);
            j += 1;
        } else {
            mem::swap(&mut data[out], &mut buf[i]);
            i += 1;
        }
        out += 1;
    }
    while i < buf.len() {
        mem::swap(&mut data[out], &mut buf[i]);
        i += 1;
        out += 1;
    }
}
