//! Chunk-parallel LSD radix sort.
//!
//! Every pass runs in two parallel phases separated by a full join:
//! workers histogram their own contiguous chunk, then the calling thread
//! turns the per-worker histograms into per-worker, per-bucket write
//! offsets, and workers scatter their chunk into the shared output buffer.
//! Worker `w`'s slots for bucket `b` sit after those of workers `0..w`, so
//! each pass stays stable and no two workers touch the same slot.

use packplan_core::{chunk_ranges, scoped_map, MAX_THREADS};

use crate::key::{passes_for, RadixKey};
use crate::radix::{self, digit, histogram, BUCKETS};
use crate::scatter::ScatterBuffer;

/// Smallest chunk worth handing to a worker.
pub const MIN_CHUNK_LEN: usize = 4_096;

/// Sorts `data` by key using up to `threads` workers per pass.
pub fn parallel_radix_sort<T: RadixKey>(data: &mut [T], ascending: bool, threads: usize) {
    let workers = threads.clamp(1, MAX_THREADS).min(data.len() / MIN_CHUNK_LEN);
    if workers <= 1 {
        log::debug!("parallel radix: {} items, running serially", data.len());
        radix::radix_sort(data, ascending);
        return;
    }

    let len = data.len();
    let ranges = chunk_ranges(len, workers);

    // Local maxima, reduced on the calling thread.
    let max = scoped_map(&ranges, |_, range| {
        data[range.clone()]
            .iter()
            .map(RadixKey::radix_key)
            .max()
            .unwrap_or(0)
    })
    .into_iter()
    .max()
    .unwrap_or(0);

    let passes = passes_for(max);
    log::debug!(
        "parallel radix: {} items, {} workers, {} passes",
        len,
        ranges.len(),
        passes
    );

    let mut buffer = data.to_vec();
    let mut in_data = true;

    for pass in 0..passes {
        let (src, dst): (&[T], &mut [T]) = if in_data {
            (&*data, &mut buffer[..])
        } else {
            (&buffer[..], &mut *data)
        };

        let histograms = scoped_map(&ranges, |_, range| histogram(&src[range.clone()], pass));
        let Some(offsets) = worker_offsets(&histograms, ascending, len) else {
            continue;
        };

        let jobs: Vec<_> = ranges.iter().cloned().zip(offsets).collect();
        let out = ScatterBuffer::new(dst);
        scoped_map(&jobs, |_, (range, start)| {
            let mut cursor = *start;
            for value in &src[range.clone()] {
                let bucket = digit(value.radix_key(), pass);
                // SAFETY: slots `cursor[bucket]..` up to this worker's count
                // for the bucket belong to this worker alone.
                unsafe { out.write(cursor[bucket], *value) };
                cursor[bucket] += 1;
            }
        });
        in_data = !in_data;
    }

    if !in_data {
        data.copy_from_slice(&buffer);
    }
}

/// Per-worker exclusive start offsets for every bucket.
///
/// Returns `None` if every key falls in one bucket, in which case the pass
/// would not move anything.
fn worker_offsets(
    histograms: &[[usize; BUCKETS]],
    ascending: bool,
    len: usize,
) -> Option<Vec<[usize; BUCKETS]>> {
    let mut totals = [0usize; BUCKETS];
    for hist in histograms {
        for (total, count) in totals.iter_mut().zip(hist) {
            *total += count;
        }
    }
    if radix::is_trivial_pass(&totals, len) {
        return None;
    }

    let mut offsets = vec![[0usize; BUCKETS]; histograms.len()];
    let mut running = 0;
    let mut visit = |bucket: usize| {
        for (worker, hist) in histograms.iter().enumerate() {
            offsets[worker][bucket] = running;
            running += hist[bucket];
        }
    };

    if ascending {
        (0..BUCKETS).for_each(&mut visit);
    } else {
        (0..BUCKETS).rev().for_each(&mut visit);
    }

    Some(offsets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use packplan_core::Item;

    fn pseudo_random(n: usize) -> Vec<u32> {
        (0..n as u32)
            .map(|i| i.wrapping_mul(2_654_435_761) % 5_000_000)
            .collect()
    }

    #[test]
    fn test_worker_offsets_interleave_workers() {
        let mut a = [0usize; BUCKETS];
        let mut b = [0usize; BUCKETS];
        a[1] = 2;
        a[3] = 1;
        b[1] = 1;
        b[3] = 2;

        let asc = worker_offsets(&[a, b], true, 6).unwrap();
        assert_eq!((asc[0][1], asc[1][1], asc[0][3], asc[1][3]), (0, 2, 3, 4));

        let desc = worker_offsets(&[a, b], false, 6).unwrap();
        assert_eq!((desc[0][3], desc[1][3], desc[0][1], desc[1][1]), (0, 1, 3, 5));
    }

    #[test]
    fn test_worker_offsets_trivial_pass() {
        let mut a = [0usize; BUCKETS];
        a[7] = 10;
        assert!(worker_offsets(&[a], true, 10).is_none());
    }

    #[test]
    fn test_parallel_matches_std() {
        let original = pseudo_random(60_000);
        let mut expected = original.clone();
        expected.sort_unstable();

        let mut asc = original.clone();
        parallel_radix_sort(&mut asc, true, 4);
        assert_eq!(asc, expected);

        let mut desc = original;
        parallel_radix_sort(&mut desc, false, 8);
        expected.reverse();
        assert_eq!(desc, expected);
    }

    #[test]
    fn test_parallel_is_stable() {
        let mut items: Vec<Item> = (0..40_000i64)
            .map(|i| Item::new(i, (i % 17) as u32 * 300, 1, 1.0))
            .collect();
        parallel_radix_sort(&mut items, true, 4);
        for pair in items.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.length() <= b.length());
            if a.length() == b.length() {
                assert!(a.id() < b.id());
            }
        }
    }

    #[test]
    fn test_small_input_runs_serially() {
        let mut data = vec![3u32, 1, 2];
        parallel_radix_sort(&mut data, false, 16);
        assert_eq!(data, vec![3, 2, 1]);
    }
}
