//! Sort keys.

use packplan_core::Item;

/// A value that can be ordered by an unsigned 32-bit key.
///
/// Sorters move values by copy, so implementors must be `Copy`, and the
/// parallel sorters share them across worker threads.
pub trait RadixKey: Copy + Send + Sync {
    /// Returns the ordering key.
    fn radix_key(&self) -> u32;
}

impl RadixKey for u32 {
    #[inline]
    fn radix_key(&self) -> u32 {
        *self
    }
}

impl RadixKey for Item {
    #[inline]
    fn radix_key(&self) -> u32 {
        self.length()
    }
}

/// Returns `(min, max)` of the keys, or `None` for an empty slice.
pub(crate) fn key_bounds<T: RadixKey>(data: &[T]) -> Option<(u32, u32)> {
    let first = data.first()?.radix_key();
    Some(data.iter().fold((first, first), |(lo, hi), v| {
        let k = v.radix_key();
        (lo.min(k), hi.max(k))
    }))
}

/// Number of 8-bit passes needed to cover `max_key`. Zero for a zero key.
pub(crate) fn passes_for(max_key: u32) -> u32 {
    let bits = u32::BITS - max_key.leading_zeros();
    bits.div_ceil(8)
}

/// Returns true if `data` is ordered in the requested direction.
pub fn is_sorted_by_key<T: RadixKey>(data: &[T], ascending: bool) -> bool {
    data.windows(2).all(|w| {
        let (a, b) = (w[0].radix_key(), w[1].radix_key());
        if ascending {
            a <= b
        } else {
            a >= b
        }
    })
}
