//! Sorter selection and dispatch.

use std::fmt;
use std::str::FromStr;

use packplan_core::{Error, SortOrder, MAX_THREADS};

use crate::counting::{counting_sort, parallel_counting_sort, MAX_COUNTING_RANGE};
use crate::insertion::{insertion_sort, INSERTION_THRESHOLD};
use crate::key::{key_bounds, RadixKey};
use crate::lockfree::{lock_free_counting_sort, lock_free_radix_sort};
use crate::merge::parallel_merge_sort;
use crate::parallel_radix::parallel_radix_sort;
use crate::radix::radix_sort;
use crate::simd::{simd_radix_sort, vector_path_available, SIMD_MIN_LEN};

/// Default input size from which a multi-threaded engine sorts in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 200_000;

/// A concrete sorting algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortAlgorithm {
    /// Insertion sort.
    Insertion,
    /// Serial LSD radix sort.
    Radix,
    /// Radix sort with vectorized max and histogram.
    SimdRadix,
    /// Chunk-parallel radix sort.
    ParallelRadix,
    /// Serial counting sort.
    Counting,
    /// Parallel counting sort with atomic cursors.
    ParallelCounting,
    /// Parallel merge sort.
    ParallelMerge,
    /// MSD bucket sort over lock-free queues.
    LockFreeRadix,
    /// Counting sort over lock-free queues.
    LockFreeCounting,
    /// Standard library unstable sort.
    Std,
}

impl SortAlgorithm {
    /// All algorithms in declaration order.
    pub fn all() -> &'static [SortAlgorithm] {
        &[
            SortAlgorithm::Insertion,
            SortAlgorithm::Radix,
            SortAlgorithm::SimdRadix,
            SortAlgorithm::ParallelRadix,
            SortAlgorithm::Counting,
            SortAlgorithm::ParallelCounting,
            SortAlgorithm::ParallelMerge,
            SortAlgorithm::LockFreeRadix,
            SortAlgorithm::LockFreeCounting,
            SortAlgorithm::Std,
        ]
    }

    /// Short name.
    pub fn name(&self) -> &'static str {
        match self {
            SortAlgorithm::Insertion => "insertion",
            SortAlgorithm::Radix => "radix",
            SortAlgorithm::SimdRadix => "simd-radix",
            SortAlgorithm::ParallelRadix => "parallel-radix",
            SortAlgorithm::Counting => "counting",
            SortAlgorithm::ParallelCounting => "parallel-counting",
            SortAlgorithm::ParallelMerge => "parallel-merge",
            SortAlgorithm::LockFreeRadix => "lock-free-radix",
            SortAlgorithm::LockFreeCounting => "lock-free-counting",
            SortAlgorithm::Std => "std",
        }
    }

    /// Returns true if the algorithm spawns workers.
    pub fn is_parallel(&self) -> bool {
        matches!(
            self,
            SortAlgorithm::ParallelRadix
                | SortAlgorithm::ParallelCounting
                | SortAlgorithm::ParallelMerge
                | SortAlgorithm::LockFreeRadix
                | SortAlgorithm::LockFreeCounting
        )
    }
}

impl fmt::Display for SortAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        SortAlgorithm::all()
            .iter()
            .copied()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| Error::Config(format!("unknown sort algorithm '{s}'")))
    }
}

/// Orders items by length, picking a sorter by input size, key spread,
/// worker count and hardware capability.
#[derive(Debug, Clone)]
pub struct SortEngine {
    threads: usize,
    parallel_threshold: usize,
}

impl Default for SortEngine {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SortEngine {
    /// Creates an engine that may use up to `threads` workers.
    pub fn new(threads: usize) -> Self {
        Self {
            threads: threads.clamp(1, MAX_THREADS),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Sets the input size from which parallel sorters are chosen.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Worker count.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Picks the sorter for `data`.
    ///
    /// Tiny inputs are insertion-sorted and small ones radix-sorted. Larger
    /// inputs go to a parallel radix sort when the engine has more than one
    /// worker and the input reaches the parallel threshold, to a counting
    /// sort when keys are dense, and to the vectorized radix sort otherwise.
    pub fn select<T: RadixKey>(&self, data: &[T]) -> SortAlgorithm {
        let len = data.len();
        if len < INSERTION_THRESHOLD {
            return SortAlgorithm::Insertion;
        }
        if len < SIMD_MIN_LEN {
            return SortAlgorithm::Radix;
        }
        if self.threads > 1 && len >= self.parallel_threshold {
            return SortAlgorithm::ParallelRadix;
        }

        let dense = key_bounds(data)
            .map(|(min, max)| {
                let span = max - min;
                span <= MAX_COUNTING_RANGE && (span as usize) < len
            })
            .unwrap_or(false);
        if dense {
            return SortAlgorithm::Counting;
        }

        if vector_path_available() {
            SortAlgorithm::SimdRadix
        } else {
            SortAlgorithm::Radix
        }
    }

    /// Applies `order` to `data`. Returns the sorter used, or `None` for
    /// natural order, which leaves `data` untouched.
    pub fn sort<T: RadixKey>(&self, data: &mut [T], order: SortOrder) -> Option<SortAlgorithm> {
        let ascending = order.direction()?;
        Some(self.sort_by_length(data, ascending))
    }

    /// Sorts by length in the given direction with the selected sorter.
    pub fn sort_by_length<T: RadixKey>(&self, data: &mut [T], ascending: bool) -> SortAlgorithm {
        let algorithm = self.select(data);
        log::debug!(
            "sorting {} items {} with {}",
            data.len(),
            if ascending { "ascending" } else { "descending" },
            algorithm
        );
        self.sort_with(algorithm, data, ascending)
    }

    /// Sorts with a specific algorithm. Returns the algorithm that actually
    /// ran, which differs from the request only when a counting sort refuses
    /// a key range that is too wide.
    pub fn sort_with<T: RadixKey>(
        &self,
        algorithm: SortAlgorithm,
        data: &mut [T],
        ascending: bool,
    ) -> SortAlgorithm {
        match algorithm {
            SortAlgorithm::Insertion => insertion_sort(data, ascending),
            SortAlgorithm::Radix => radix_sort(data, ascending),
            SortAlgorithm::SimdRadix => simd_radix_sort(data, ascending),
            SortAlgorithm::ParallelRadix => parallel_radix_sort(data, ascending, self.threads),
            SortAlgorithm::Counting => {
                if !counting_sort(data, ascending) {
                    log::debug!("counting sort: key range too wide, using std sort");
                    return self.sort_with(SortAlgorithm::Std, data, ascending);
                }
            }
            SortAlgorithm::ParallelCounting => {
                if !parallel_counting_sort(data, ascending, self.threads) {
                    log::debug!("parallel counting sort: key range too wide, using parallel radix");
                    return self.sort_with(SortAlgorithm::ParallelRadix, data, ascending);
                }
            }
            SortAlgorithm::ParallelMerge => parallel_merge_sort(data, ascending),
            SortAlgorithm::LockFreeRadix => lock_free_radix_sort(data, ascending, self.threads),
            SortAlgorithm::LockFreeCounting => {
                lock_free_counting_sort(data, ascending, self.threads)
            }
            SortAlgorithm::Std => {
                if ascending {
                    data.sort_unstable_by_key(|v| v.radix_key());
                } else {
                    data.sort_unstable_by_key(|v| std::cmp::Reverse(v.radix_key()));
                }
            }
        }
        algorithm
    }
}
