//! Chunk-parallel first-fit with lock-free result hand-off.

use std::sync::atomic::AtomicU32;

use crossbeam::queue::SegQueue;
use packplan_core::{chunk_ranges, scoped_map, Item, Pack, PackStrategy, SafetyLimits};

use crate::blocking::pack_first_fit;
use crate::packing_utils::{FirstFit, Flow, SharedNumbering};
use crate::parallel::use_serial_path;

/// Chunked first-fit where workers push finished packs onto a shared
/// multi-producer queue as soon as they are sealed.
///
/// Pack numbers come from one shared counter and are unique, but the order
/// of the returned packs follows the order in which workers sealed them.
#[derive(Debug, Clone)]
pub struct LockFreeStrategy {
    threads: usize,
    limits: SafetyLimits,
}

impl LockFreeStrategy {
    /// Creates a lock-free strategy with `threads` workers.
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

impl PackStrategy for LockFreeStrategy {
    fn pack_items(&self, items: &[Item], max_items: u32, max_weight: f64) -> Vec<Pack> {
        if use_serial_path(items.len(), self.threads) {
            log::debug!(
                "lock-free: {} items on {} threads, using blocking path",
                items.len(),
                self.threads
            );
            return pack_first_fit(items, max_items, max_weight, &self.limits, "lock-free");
        }

        let chunks: Vec<&[Item]> = chunk_ranges(items.len(), self.threads)
            .into_iter()
            .map(|range| &items[range])
            .collect();
        log::debug!("lock-free: {} items in {} chunks", items.len(), chunks.len());

        let issued = AtomicU32::new(0);
        let finished: SegQueue<Pack> = SegQueue::new();
        let iterations = self.limits.per_worker_iterations(chunks.len());
        let max_packs = self.limits.max_packs;

        scoped_map(&chunks, |_, chunk| {
            let mut packer = FirstFit::new(
                SharedNumbering::new(&issued, max_packs),
                iterations,
                max_items,
                max_weight,
            );
            for item in chunk.iter() {
                let flow = packer.place(item);
                for pack in packer.drain_sealed() {
                    finished.push(pack);
                }
                if flow == Flow::Halt {
                    break;
                }
            }
            if let Some(ceiling) = packer.ceiling() {
                ceiling.warn("lock-free");
            }
            for pack in packer.finish() {
                finished.push(pack);
            }
        });

        let mut packs = Vec::with_capacity(finished.len());
        while let Some(pack) = finished.pop() {
            packs.push(pack);
        }
        packs
    }

    fn name(&self) -> String {
        format!("LockFree ({} threads)", self.threads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn test_reference_scenario_single_thread() {
        let items = [
            Item::new(1001, 6200, 30, 9.653),
            Item::new(2001, 7200, 50, 11.21),
        ];
        let packs = LockFreeStrategy::new(1, SafetyLimits::default()).pack_items(&items, 40, 500.0);
        assert_eq!(packs.len(), 2);
        assert!((packs[0].total_weight() - 401.69).abs() < 1e-6);
        assert!((packs[1].total_weight() - 448.4).abs() < 1e-6);
    }

    #[test]
    fn test_parallel_conservation_and_unique_numbers() {
        let items: Vec<Item> = (0..12_000i64)
            .map(|i| Item::new(i, 50 + (i % 31) as u32, (i % 6 + 1) as i32, 1.0 + (i % 4) as f64))
            .collect();
        let packs = LockFreeStrategy::new(6, SafetyLimits::default()).pack_items(&items, 15, 40.0);

        let mut packed: HashMap<i64, i64> = HashMap::new();
        for pack in &packs {
            assert!(!pack.is_empty());
            assert!(pack.within_limits(15, 40.0));
            for slice in pack.items() {
                *packed.entry(slice.id()).or_default() += slice.quantity() as i64;
            }
        }
        for item in &items {
            assert_eq!(packed.get(&item.id()), Some(&(item.quantity() as i64)));
        }

        let numbers: HashSet<u32> = packs.iter().map(|p| p.number()).collect();
        assert_eq!(numbers.len(), packs.len());
    }

    #[test]
    fn test_name() {
        assert_eq!(
            LockFreeStrategy::new(2, SafetyLimits::default()).name(),
            "LockFree (2 threads)"
        );
    }
}
