//! Work-stealing parallel best-fit packing.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use packplan_core::{scoped_map, Item, Pack, PackStrategy, SafetyLimits};
use parking_lot::Mutex;

use crate::best_fit::{pack_best_fit, BestFitPacker};
use crate::packing_utils::{renumber_sequential, Flow, SharedNumbering};
use crate::parallel::use_serial_path;

/// Items handed to a worker per cursor claim.
pub const BATCH_SIZE: usize = 100;

/// Best-fit where idle workers claim the next batch of items from a shared
/// cursor.
///
/// Each worker keeps its own open packs. Packs sealed as full are merged
/// into the shared list at batch boundaries; the rest are flushed when the
/// worker runs out of batches. The merged list is ordered by pack number and
/// renumbered `1..=n`.
#[derive(Debug, Clone)]
pub struct ParallelBestFitStrategy {
    threads: usize,
    limits: SafetyLimits,
}

impl ParallelBestFitStrategy {
    /// Creates a parallel best-fit strategy with `threads` workers.
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

impl PackStrategy for ParallelBestFitStrategy {
    fn pack_items(&self, items: &[Item], max_items: u32, max_weight: f64) -> Vec<Pack> {
        if use_serial_path(items.len(), self.threads) {
            log::debug!(
                "parallel best-fit: {} items on {} threads, using serial best-fit",
                items.len(),
                self.threads
            );
            return pack_best_fit(items, max_items, max_weight, &self.limits, "parallel best-fit");
        }

        let workers = self.threads.min(items.len().div_ceil(BATCH_SIZE));
        log::debug!(
            "parallel best-fit: {} items, {} workers, batches of {}",
            items.len(),
            workers,
            BATCH_SIZE
        );

        let cursor = AtomicUsize::new(0);
        let issued = AtomicU32::new(0);
        let merged: Mutex<Vec<Pack>> = Mutex::new(Vec::new());
        let iterations = self.limits.per_worker_iterations(workers);
        let max_packs = self.limits.max_packs;
        let worker_ids: Vec<usize> = (0..workers).collect();

        scoped_map(&worker_ids, |_, _| {
            let mut packer = BestFitPacker::new(
                SharedNumbering::new(&issued, max_packs),
                iterations,
                max_items,
                max_weight,
            );

            loop {
                let start = cursor.fetch_add(BATCH_SIZE, Ordering::Relaxed);
                if start >= items.len() {
                    break;
                }
                let end = (start + BATCH_SIZE).min(items.len());
                let flow = packer.place_all(&items[start..end]);

                let sealed = packer.drain_sealed();
                if !sealed.is_empty() {
                    merged.lock().extend(sealed);
                }
                if flow == Flow::Halt {
                    break;
                }
            }

            if let Some(ceiling) = packer.ceiling() {
                ceiling.warn("parallel best-fit");
            }
            let rest = packer.finish();
            merged.lock().extend(rest);
        });

        let mut packs = merged.into_inner();
        packs.sort_unstable_by_key(|pack| pack.number());
        renumber_sequential(&mut packs);
        packs
    }

    fn name(&self) -> String {
        format!("ParallelBestFit ({} threads)", self.threads)
    }
}
