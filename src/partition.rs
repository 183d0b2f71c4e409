//! Row partitioning: fixed-size chunking of the ordered image list.

use std::num::NonZeroUsize;

/// Number of rows needed for `len` items at `per_row` items per row.
pub fn row_count(len: usize, per_row: NonZeroUsize) -> usize {
    len.div_ceil(per_row.get())
}

/// Split `items` into consecutive rows of `per_row` items.
///
/// Row `i` holds `items[i * per_row .. min((i + 1) * per_row, len)]`. Order is
/// preserved and only the last row may be shorter. An empty slice yields no rows.
pub fn partition<T>(items: &[T], per_row: NonZeroUsize) -> Vec<&[T]> {
    items.chunks(per_row.get()).collect()
}

/// Row that holds the item at `index`.
pub fn row_of(index: usize, per_row: NonZeroUsize) -> usize {
    index / per_row.get()
}
