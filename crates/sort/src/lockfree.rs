//! Lock-free parallel bucket sorts.
//!
//! Buckets are multi-producer queues instead of arrays with shared cursors,
//! so workers never agree on a prefix-sum table. Each worker pushes its
//! chunk into the buckets; once every worker has joined, the calling thread
//! drains the buckets in key order (reversed for descending).

use crossbeam::queue::SegQueue;
use packplan_core::{chunk_ranges, scoped_map, MAX_THREADS};

use crate::key::{key_bounds, passes_for, RadixKey};
use crate::radix::{self, BUCKETS, RADIX_BITS};

/// Largest `max - min` key span the lock-free counting sort will bucket.
/// Wider inputs go to [`lock_free_radix_sort`].
pub const LOCKFREE_COUNTING_MAX_RANGE: u32 = 16_384;

/// Smallest chunk worth handing to a worker.
const MIN_CHUNK_LEN: usize = 2_048;

fn worker_count(len: usize, threads: usize) -> usize {
    threads.clamp(1, MAX_THREADS).min(len / MIN_CHUNK_LEN).max(1)
}

/// Most-significant-digit bucket sort.
///
/// One lock-free pass buckets every value by its top significant byte.
/// Bucket contents are drained into `data` in bucket order, and the buckets
/// are then finished with a serial radix sort on the remaining bytes, with
/// workers pulling whole buckets from a shared queue.
pub fn lock_free_radix_sort<T: RadixKey>(data: &mut [T], ascending: bool, threads: usize) {
    let Some((_, max)) = key_bounds(data) else {
        return;
    };
    let passes = passes_for(max);
    if data.len() < 2 || passes == 0 {
        return;
    }

    let shift = (passes - 1) * RADIX_BITS;
    let workers = worker_count(data.len(), threads);
    let ranges = chunk_ranges(data.len(), workers);

    let buckets: Vec<SegQueue<Vec<T>>> = (0..BUCKETS).map(|_| SegQueue::new()).collect();
    {
        let source: &[T] = data;
        scoped_map(&ranges, |_, range| {
            let mut local: Vec<Vec<T>> = vec![Vec::new(); BUCKETS];
            for value in &source[range.clone()] {
                local[((value.radix_key() >> shift) & 0xFF) as usize].push(*value);
            }
            for (bucket, batch) in local.into_iter().enumerate() {
                if !batch.is_empty() {
                    buckets[bucket].push(batch);
                }
            }
        });
    }

    let order: Box<dyn Iterator<Item = usize>> = if ascending {
        Box::new(0..BUCKETS)
    } else {
        Box::new((0..BUCKETS).rev())
    };

    let mut sizes = Vec::with_capacity(BUCKETS);
    let mut cursor = 0;
    for bucket in order {
        let start = cursor;
        while let Some(batch) = buckets[bucket].pop() {
            data[cursor..cursor + batch.len()].copy_from_slice(&batch);
            cursor += batch.len();
        }
        if cursor > start {
            sizes.push(cursor - start);
        }
    }

    let remaining = passes - 1;
    if remaining == 0 {
        return;
    }

    let pending: SegQueue<&mut [T]> = SegQueue::new();
    let mut rest = &mut *data;
    for size in sizes {
        let (bucket, tail) = std::mem::take(&mut rest).split_at_mut(size);
        if bucket.len() > 1 {
            pending.push(bucket);
        }
        rest = tail;
    }

    let finishers: Vec<usize> = (0..workers).collect();
    scoped_map(&finishers, |_, _| {
        while let Some(bucket) = pending.pop() {
            radix::radix_sort_passes(bucket, ascending, remaining);
        }
    });
}

/// Counting sort with one lock-free queue per distinct key.
///
/// Order within equal keys is not preserved. Falls back to
/// [`lock_free_radix_sort`] when the key span exceeds
/// [`LOCKFREE_COUNTING_MAX_RANGE`].
pub fn lock_free_counting_sort<T: RadixKey>(data: &mut [T], ascending: bool, threads: usize) {
    let Some((min, max)) = key_bounds(data) else {
        return;
    };
    if data.len() < 2 || min == max {
        return;
    }
    if max - min > LOCKFREE_COUNTING_MAX_RANGE {
        log::debug!(
            "lock-free counting: key span {} too wide, using lock-free radix",
            max - min
        );
        lock_free_radix_sort(data, ascending, threads);
        return;
    }

    let span = (max - min) as usize + 1;
    let workers = worker_count(data.len(), threads);
    let ranges = chunk_ranges(data.len(), workers);
    let buckets: Vec<SegQueue<T>> = (0..span).map(|_| SegQueue::new()).collect();

    {
        let source: &[T] = data;
        scoped_map(&ranges, |_, range| {
            for value in &source[range.clone()] {
                buckets[(value.radix_key() - min) as usize].push(*value);
            }
        });
    }

    let mut cursor = 0;
    let mut drain = |bucket: &SegQueue<T>| {
        while let Some(value) = bucket.pop() {
            data[cursor] = value;
            cursor += 1;
        }
    };
    if ascending {
        buckets.iter().for_each(&mut drain);
    } else {
        buckets.iter().rev().for_each(&mut drain);
    }
}
