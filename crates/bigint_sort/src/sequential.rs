/// Which band of a three-way split a partition pass pulls to the front.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Band {
    /// Elements strictly less than the pivot.
    Less,
    /// Elements not greater than the pivot.
    NotGreater,
}

impl Band {
    #[inline]
    fn holds<T: Ord>(self, x: &T, pivot: &T) -> bool {
        match self {
            Band::Less => x < pivot,
            Band::NotGreater => !(pivot < x),
        }
    }
}

/// One forward scan with a trailing write cursor. Elements satisfying `pred`
/// end up before the returned index, the rest after it. No order is kept
/// within either side.
pub fn partition_by<T, F>(data: &mut [T], mut pred: F) -> usize
where
    F: FnMut(&T) -> bool,
{
    let Some(mut write) = data.iter().position(|x| !pred(x)) else {
        return data.len();
    };

    for read in (write + 1)..data.len() {
        if pred(&data[read]) {
            data.swap(read, write);
            write += 1;
        }
    }
    write
}

/// Moves the elements of `band` relative to `pivot` to the front of `data`.
#[inline]
pub fn partition<T: Ord>(data: &mut [T], pivot: &T, band: Band) -> usize {
    partition_by(data, |x| band.holds(x, pivot))
}

/// Splits `data` into `< pivot`, `== pivot`, `> pivot` and returns the two
/// band boundaries.
pub fn partition_3way<T: Ord>(data: &mut [T], pivot: &T) -> (usize, usize) {
    let mid1 = partition(data, pivot, Band::Less);
    let mid2 = mid1 + partition(&mut data[mid1..], pivot, Band::NotGreater);
    (mid1, mid2)
}

/// Single-threaded quicksort with a midpoint pivot. The band equal to the
/// pivot is never revisited, so runs of duplicates cost one scan.
pub fn sequential_sort<T: Ord + Clone>(mut data: &mut [T]) {
    while data.len() >= 2 {
        let pivot = data[data.len() / 2].clone();
        let (mid1, mid2) = partition_3way(data, &pivot);

        let (left, rest) = data.split_at_mut(mid1);
        let (_, right) = rest.split_at_mut(mid2 - mid1);

        // Recurse into the smaller side to bound stack depth.
        if left.len() < right.len() {
            sequential_sort(left);
            data = right;
        } else {
            sequential_sort(right);
            data = left;
        }
    }
}
