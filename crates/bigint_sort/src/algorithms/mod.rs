pub mod heap_sort;
pub mod merge_sort;
