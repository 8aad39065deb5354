//! Closed strategy selection.

use packplan_core::{Item, Pack, PackStrategy, PackingConfig, StrategyKind};

use crate::async_pack::AsyncStrategy;
use crate::best_fit::BestFitStrategy;
use crate::blocking::BlockingStrategy;
use crate::lockfree::LockFreeStrategy;
use crate::next_fit::NextFitStrategy;
use crate::parallel::ParallelStrategy;
use crate::parallel_best_fit::ParallelBestFitStrategy;

/// One variant per packing strategy.
#[derive(Debug, Clone)]
pub enum AnyStrategy {
    Blocking(BlockingStrategy),
    NextFit(NextFitStrategy),
    Parallel(ParallelStrategy),
    LockFree(LockFreeStrategy),
    BestFit(BestFitStrategy),
    ParallelBestFit(ParallelBestFitStrategy),
    Async(AsyncStrategy),
}

impl AnyStrategy {
    /// Builds the strategy `config` selects. The config should already be
    /// validated so that the thread count is resolved.
    pub fn from_config(config: &PackingConfig) -> Self {
        let threads = config.thread_count.max(1);
        let limits = config.limits;
        match config.strategy {
            StrategyKind::Blocking => AnyStrategy::Blocking(BlockingStrategy::new(limits)),
            StrategyKind::NextFit => {
                AnyStrategy::NextFit(NextFitStrategy::new(limits, config.next_fit_policy))
            }
            StrategyKind::Parallel => AnyStrategy::Parallel(ParallelStrategy::new(threads, limits)),
            StrategyKind::LockFree => AnyStrategy::LockFree(LockFreeStrategy::new(threads, limits)),
            StrategyKind::BestFit => AnyStrategy::BestFit(BestFitStrategy::new(limits)),
            StrategyKind::ParallelBestFit => {
                AnyStrategy::ParallelBestFit(ParallelBestFitStrategy::new(threads, limits))
            }
            StrategyKind::Async => AnyStrategy::Async(AsyncStrategy::new(threads, limits)),
        }
    }

    /// The selector this strategy was built from.
    pub fn kind(&self) -> StrategyKind {
        match self {
            AnyStrategy::Blocking(_) => StrategyKind::Blocking,
            AnyStrategy::NextFit(_) => StrategyKind::NextFit,
            AnyStrategy::Parallel(_) => StrategyKind::Parallel,
            AnyStrategy::LockFree(_) => StrategyKind::LockFree,
            AnyStrategy::BestFit(_) => StrategyKind::BestFit,
            AnyStrategy::ParallelBestFit(_) => StrategyKind::ParallelBestFit,
            AnyStrategy::Async(_) => StrategyKind::Async,
        }
    }

    fn as_dyn(&self) -> &dyn PackStrategy {
        match self {
            AnyStrategy::Blocking(s) => s,
            AnyStrategy::NextFit(s) => s,
            AnyStrategy::Parallel(s) => s,
            AnyStrategy::LockFree(s) => s,
            AnyStrategy::BestFit(s) => s,
            AnyStrategy::ParallelBestFit(s) => s,
            AnyStrategy::Async(s) => s,
        }
    }
}

impl PackStrategy for AnyStrategy {
    fn pack_items(&self, items: &[Item], max_items: u32, max_weight: f64) -> Vec<Pack> {
        self.as_dyn().pack_items(items, max_items, max_weight)
    }

    fn name(&self) -> String {
        self.as_dyn().name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_builds() {
        for &kind in StrategyKind::all() {
            let config = PackingConfig::new().with_strategy(kind).with_threads(3).validated();
            let strategy = AnyStrategy::from_config(&config);
            assert_eq!(strategy.kind(), kind);
            assert!(!strategy.name().is_empty());
        }
    }

    #[test]
    fn test_names_carry_thread_count() {
        let config = PackingConfig::new()
            .with_strategy(StrategyKind::Parallel)
            .with_threads(6)
            .validated();
        assert_eq!(AnyStrategy::from_config(&config).name(), "Parallel (6 threads)");

        let config = config.with_strategy(StrategyKind::Blocking);
        assert_eq!(AnyStrategy::from_config(&config).name(), "Blocking");
    }
}
