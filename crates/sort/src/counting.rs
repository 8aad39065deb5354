//! Counting sorts over the exact key value.
//!
//! Both variants allocate one counter per distinct value in `min..=max`, so
//! they refuse inputs whose key range exceeds [`MAX_COUNTING_RANGE`] and
//! leave the data untouched.

use std::sync::atomic::{AtomicUsize, Ordering};

use packplan_core::{chunk_ranges, scoped_map, MAX_THREADS};

use crate::key::{key_bounds, RadixKey};
use crate::scatter::ScatterBuffer;

/// Largest `max - min` key span a counting sort will bucket.
pub const MAX_COUNTING_RANGE: u32 = 1_000_000;

/// Smallest chunk worth handing to a worker.
const MIN_CHUNK_LEN: usize = 4_096;

/// Key span of `data` if it is small enough to count.
fn countable_span<T: RadixKey>(data: &[T]) -> Option<(u32, usize)> {
    let (min, max) = key_bounds(data)?;
    let span = max - min;
    (span <= MAX_COUNTING_RANGE).then_some((min, span as usize + 1))
}

/// Stable counting sort. Returns `false` without touching `data` when the
/// key range is too wide.
pub fn counting_sort<T: RadixKey>(data: &mut [T], ascending: bool) -> bool {
    if data.len() < 2 {
        return true;
    }
    let Some((min, buckets)) = countable_span(data) else {
        return false;
    };

    let mut counts = vec![0usize; buckets];
    for value in data.iter() {
        counts[(value.radix_key() - min) as usize] += 1;
    }

    let mut offsets = exclusive_offsets(counts, ascending);
    let source = data.to_vec();
    for value in &source {
        let bucket = (value.radix_key() - min) as usize;
        data[offsets[bucket]] = *value;
        offsets[bucket] += 1;
    }
    true
}

/// Counting sort with parallel counting and scatter phases.
///
/// Workers count into shared atomic buckets. The calling thread turns the
/// counts into start offsets in place, and the same atomics then serve as
/// write cursors for the scatter. Order within equal keys is not preserved.
/// Returns `false` without touching `data` when the key range is too wide.
pub fn parallel_counting_sort<T: RadixKey>(data: &mut [T], ascending: bool, threads: usize) -> bool {
    let workers = threads.clamp(1, MAX_THREADS).min(data.len() / MIN_CHUNK_LEN);
    if workers <= 1 {
        return counting_sort(data, ascending);
    }
    let Some((min, buckets)) = countable_span(data) else {
        return false;
    };

    let source = data.to_vec();
    let ranges = chunk_ranges(source.len(), workers);
    let cursors: Vec<AtomicUsize> = (0..buckets).map(|_| AtomicUsize::new(0)).collect();

    scoped_map(&ranges, |_, range| {
        for value in &source[range.clone()] {
            cursors[(value.radix_key() - min) as usize].fetch_add(1, Ordering::Relaxed);
        }
    });

    // Counts become start offsets; workers are joined, so plain loads suffice.
    let mut running = 0;
    let mut seed = |cursor: &AtomicUsize| {
        let count = cursor.load(Ordering::Relaxed);
        cursor.store(running, Ordering::Relaxed);
        running += count;
    };
    if ascending {
        cursors.iter().for_each(&mut seed);
    } else {
        cursors.iter().rev().for_each(&mut seed);
    }

    let out = ScatterBuffer::new(data);
    scoped_map(&ranges, |_, range| {
        for value in &source[range.clone()] {
            let slot = cursors[(value.radix_key() - min) as usize].fetch_add(1, Ordering::Relaxed);
            // SAFETY: every slot index is handed out exactly once by fetch_add.
            unsafe { out.write(slot, *value) };
        }
    });
    true
}

/// Converts per-bucket counts to start offsets in the requested direction.
fn exclusive_offsets(mut counts: Vec<usize>, ascending: bool) -> Vec<usize> {
    let mut running = 0;
    let mut visit = |slot: &mut usize| {
        let count = *slot;
        *slot = running;
        running += count;
    };
    if ascending {
        counts.iter_mut().for_each(&mut visit);
    } else {
        counts.iter_mut().rev().for_each(&mut visit);
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use packplan_core::Item;

    #[test]
    fn test_exclusive_offsets() {
        assert_eq!(exclusive_offsets(vec![2, 0, 3], true), vec![0, 2, 2]);
        assert_eq!(exclusive_offsets(vec![2, 0, 3], false), vec![3, 3, 0]);
    }

    #[test]
    fn test_counting_sort_both_directions() {
        let mut data = vec![500u32, 100, 300, 100, 200];
        assert!(counting_sort(&mut data, true));
        assert_eq!(data, vec![100, 100, 200, 300, 500]);
        assert!(counting_sort(&mut data, false));
        assert_eq!(data, vec![500, 300, 200, 100, 100]);
    }

    #[test]
    fn test_counting_sort_is_stable() {
        let mut items = vec![
            Item::new(1, 20, 1, 1.0),
            Item::new(2, 10, 1, 1.0),
            Item::new(3, 20, 1, 1.0),
        ];
        assert!(counting_sort(&mut items, true));
        let ids: Vec<i64> = items.iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_counting_sort_rejects_wide_range() {
        let mut data = vec![0u32, MAX_COUNTING_RANGE + 1, 5];
        assert!(!counting_sort(&mut data, true));
        assert_eq!(data, vec![0, MAX_COUNTING_RANGE + 1, 5]);

        let mut edge = vec![0u32, MAX_COUNTING_RANGE, 5];
        assert!(counting_sort(&mut edge, true));
        assert_eq!(edge, vec![0, 5, MAX_COUNTING_RANGE]);
    }

    #[test]
    fn test_counting_sort_offset_keys() {
        let mut data = vec![4_000_000_010u32, 4_000_000_000, 4_000_000_005];
        assert!(counting_sort(&mut data, true));
        assert_eq!(data, vec![4_000_000_000, 4_000_000_005, 4_000_000_010]);
    }

    #[test]
    fn test_parallel_counting_matches_std() {
        let original: Vec<u32> = (0..50_000u32).map(|i| (i * 7919) % 10_007).collect();
        let mut expected = original.clone();
        expected.sort_unstable();

        let mut asc = original.clone();
        assert!(parallel_counting_sort(&mut asc, true, 4));
        assert_eq!(asc, expected);

        let mut desc = original;
        assert!(parallel_counting_sort(&mut desc, false, 4));
        expected.reverse();
        assert_eq!(desc, expected);
    }

    #[test]
    fn test_parallel_counting_rejects_wide_range() {
        let mut data: Vec<u32> = (0..20_000u32).map(|i| i * 1_000).collect();
        let copy = data.clone();
        assert!(!parallel_counting_sort(&mut data, true, 4));
        assert_eq!(data, copy);
    }
}
