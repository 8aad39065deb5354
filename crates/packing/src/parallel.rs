//! Chunk-parallel first-fit packing.

use std::sync::atomic::AtomicU32;

use packplan_core::{chunk_ranges, scoped_map, Item, Pack, PackStrategy, SafetyLimits};

use crate::blocking::pack_first_fit;
use crate::packing_utils::{renumber_sequential, FirstFit, SharedNumbering};

/// Inputs shorter than this are packed on the calling thread.
pub const PARALLEL_MIN_ITEMS: usize = 5_000;

/// Returns true if a chunk-parallel strategy should fall back to the serial
/// path.
pub(crate) fn use_serial_path(len: usize, threads: usize) -> bool {
    threads <= 1 || len < PARALLEL_MIN_ITEMS
}

/// Splits the input into one contiguous chunk per worker and runs first-fit
/// on each chunk independently.
///
/// Packs never mix items from different chunks. Results are concatenated in
/// chunk order and renumbered `1..=n`.
#[derive(Debug, Clone)]
pub struct ParallelStrategy {
    threads: usize,
    limits: SafetyLimits,
}

impl ParallelStrategy {
    /// Creates a parallel strategy with `threads` workers.
    pub fn new(threads: usize, limits: SafetyLimits) -> Self {
        Self {
            threads: threads.max(1),
            limits,
        }
    }

    /// Worker count.
    pub fn threads(&self) -> usize {
        self.threads
    }
}

impl PackStrategy for ParallelStrategy {
    fn pack_items(&self, items: &[Item], max_items: u32, max_weight: f64) -> Vec<Pack> {
        if use_serial_path(items.len(), self.threads) {
            log::debug!(
                "parallel: {} items on {} threads, using blocking path",
                items.len(),
                self.threads
            );
            return pack_first_fit(items, max_items, max_weight, &self.limits, "parallel");
        }

        let chunks: Vec<&[Item]> = chunk_ranges(items.len(), self.threads)
            .into_iter()
            .map(|range| &items[range])
            .collect();
        log::debug!("parallel: {} items in {} chunks", items.len(), chunks.len());

        let issued = AtomicU32::new(0);
        let iterations = self.limits.per_worker_iterations(chunks.len());
        let max_packs = self.limits.max_packs;

        let per_chunk = scoped_map(&chunks, |_, chunk| {
            let mut packer = FirstFit::new(
                SharedNumbering::new(&issued, max_packs),
                iterations,
                max_items,
                max_weight,
            );
            packer.place_all(chunk.iter());
            if let Some(ceiling) = packer.ceiling() {
                ceiling.warn("parallel");
            }
            packer.finish()
        });

        let mut packs: Vec<Pack> = per_chunk.into_iter().flatten().collect();
        renumber_sequential(&mut packs);
        packs
    }

    fn name(&self) -> String {
        format!("Parallel ({} threads)", self.threads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlockingStrategy;

    fn items(count: i64) -> Vec<Item> {
        (0..count)
            .map(|i| Item::new(i, 100 + (i % 97) as u32, (i % 9 + 1) as i32, 0.5 + (i % 13) as f64))
            .collect()
    }

    #[test]
    fn test_small_input_matches_blocking() {
        let items = items(500);
        let parallel = ParallelStrategy::new(4, SafetyLimits::default()).pack_items(&items, 20, 80.0);
        let blocking = BlockingStrategy::default().pack_items(&items, 20, 80.0);
        assert_eq!(parallel, blocking);
    }

    #[test]
    fn test_chunked_conserves_and_renumbers() {
        let items = items(20_000);
        let packs = ParallelStrategy::new(4, SafetyLimits::default()).pack_items(&items, 20, 80.0);

        let expected: u64 = items.iter().map(|i| i.quantity() as u64).sum();
        let packed: u64 = packs.iter().map(|p| p.total_items() as u64).sum();
        assert_eq!(packed, expected);
        assert!(packs.iter().all(|p| p.within_limits(20, 80.0)));
        for (index, pack) in packs.iter().enumerate() {
            assert_eq!(pack.number(), index as u32 + 1);
        }
    }

    #[test]
    fn test_shared_pack_ceiling() {
        let items: Vec<Item> = (0..10_000).map(|i| Item::new(i, 10, 5, 1.0)).collect();
        let packs = ParallelStrategy::new(4, SafetyLimits::new(u64::MAX, 10)).pack_items(&items, 1, 10.0);
        assert_eq!(packs.len(), 10);
    }

    #[test]
    fn test_name() {
        assert_eq!(
            ParallelStrategy::new(8, SafetyLimits::default()).name(),
            "Parallel (8 threads)"
        );
    }
}
