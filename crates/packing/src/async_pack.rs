//! Map/reduce packing.
//!
//! The map phase packs every item on its own in a rayon pool built for the
//! call. The reduce phase runs on the calling thread and replays the mapped
//! contents of each item, in input order, through one first-fit packer.

use packplan_core::{Item, Pack, PackStrategy, SafetyLimits};
use rayon::prelude::*;

use crate::packing_utils::{FirstFit, Flow, SequentialNumbering};

/// Map/reduce strategy with one deferred task per item.
#[derive(Debug, Clone)]
pub struct AsyncStrategy {
    threads: usize,
    limits: SafetyLimits,
}

impl AsyncStrategy {
    /// Creates an async strategy whose map phase runs on `threads` workers.
    pub fn new(threads: usize, limits: SafetyLimits) -> Self {
        Self {
            threads: threads.max(1),
            limits,
        }
    }

    /// Worker count of the map phase.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Packs each item into its own local pack sequence. Local packs are
    /// discarded by the reduce phase, so they do not count against the pack
    /// ceiling.
    fn map_phase(&self, items: &[Item], max_items: u32, max_weight: f64) -> Vec<Vec<Pack>> {
        let iterations = self.limits.max_iterations;

        let pack_one = |item: &Item| {
            let mut packer = FirstFit::new(
                SequentialNumbering::new(u32::MAX),
                iterations,
                max_items,
                max_weight,
            );
            packer.place(item);
            packer.finish()
        };

        rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("packplan-async-{i}"))
            .build_scoped(rayon::ThreadBuilder::run, |pool| {
                pool.install(|| items.par_iter().map(pack_one).collect::<Vec<_>>())
            })
            .unwrap_or_else(|err| {
                log::warn!("async: thread pool unavailable ({err}), mapping sequentially");
                items.iter().map(pack_one).collect()
            })
    }
}

impl PackStrategy for AsyncStrategy {
    fn pack_items(&self, items: &[Item], max_items: u32, max_weight: f64) -> Vec<Pack> {
        let mapped = self.map_phase(items, max_items, max_weight);
        log::debug!(
            "async: mapped {} items into {} local packs",
            items.len(),
            mapped.iter().map(Vec::len).sum::<usize>()
        );

        let mut reducer = FirstFit::new(
            SequentialNumbering::new(self.limits.max_packs),
            self.limits.max_iterations,
            max_items,
            max_weight,
        );
        for (item, local) in items.iter().zip(&mapped) {
            if local.is_empty() {
                continue;
            }
            let quantity: u64 = local.iter().map(|pack| u64::from(pack.total_items())).sum();
            let quantity = i32::try_from(quantity).unwrap_or(i32::MAX);
            if reducer.place(&item.with_quantity(quantity)) == Flow::Halt {
                break;
            }
        }

        if let Some(ceiling) = reducer.ceiling() {
            ceiling.warn("async");
        }
        reducer.finish()
    }

    fn name(&self) -> String {
        format!("Async ({} threads)", self.threads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlockingStrategy;

    #[test]
    fn test_matches_blocking_when_unbounded() {
        let items: Vec<Item> = (0..300i64)
            .map(|i| Item::new(i, 100 + (i % 11) as u32, (i % 23 + 1) as i32, 0.5 + (i % 7) as f64))
            .collect();
        let async_packs = AsyncStrategy::new(4, SafetyLimits::default()).pack_items(&items, 25, 120.0);
        let blocking = BlockingStrategy::default().pack_items(&items, 25, 120.0);
        assert_eq!(async_packs, blocking);
    }

    #[test]
    fn test_reference_scenario() {
        let items = [
            Item::new(1001, 6200, 30, 9.653),
            Item::new(2001, 7200, 50, 11.21),
        ];
        let packs = AsyncStrategy::new(2, SafetyLimits::default()).pack_items(&items, 40, 500.0);
        assert_eq!(packs.len(), 2);
        assert!((packs[0].total_weight() - 401.69).abs() < 1e-6);
        assert!((packs[1].total_weight() - 448.4).abs() < 1e-6);
    }

    #[test]
    fn test_skips_unpackable() {
        let items = [Item::new(1, 10, 5, 50.0), Item::new(2, 10, 0, 1.0), Item::new(3, 10, 4, 1.0)];
        let packs = AsyncStrategy::new(2, SafetyLimits::default()).pack_items(&items, 10, 10.0);
        assert_eq!(packs.len(), 1);
        assert_eq!(packs[0].items()[0].id(), 3);
    }

    #[test]
    fn test_pack_ceiling_applies_to_output_only() {
        let items: Vec<Item> = (0..20i64).map(|i| Item::new(i, 10, 1, 1.0)).collect();
        let limits = SafetyLimits::new(u64::MAX, 10);

        let blocking = BlockingStrategy::new(limits).pack_items(&items, 40, 500.0);
        let packs = AsyncStrategy::new(4, limits).pack_items(&items, 40, 500.0);

        assert_eq!(packs.len(), 1);
        assert_eq!(packs[0].total_items(), 20);
        assert_eq!(packs, blocking);
    }

    #[test]
    fn test_name() {
        assert_eq!(AsyncStrategy::new(4, SafetyLimits::default()).name(), "Async (4 threads)");
    }
}
