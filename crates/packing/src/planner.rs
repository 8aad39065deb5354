//! Planning orchestrator: validate, sort, pack, measure.

use std::sync::Arc;
use std::time::Instant;

use packplan_core::{
    utilization_percent, Item, NextFitPolicy, Pack, PackStrategy, PackingConfig, PlanningResult,
    SafetyLimits, StrategyKind,
};
use packplan_sort::SortEngine;
use parking_lot::Mutex;

use crate::factory::AnyStrategy;

/// Configuration fields a cached strategy depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StrategyKey {
    kind: StrategyKind,
    threads: usize,
    limits: SafetyLimits,
    policy: NextFitPolicy,
}

impl StrategyKey {
    fn of(config: &PackingConfig) -> Self {
        Self {
            kind: config.strategy,
            threads: config.thread_count,
            limits: config.limits,
            policy: config.next_fit_policy,
        }
    }
}

/// Runs planning calls and keeps the last strategy it built.
///
/// The cached strategy is reused while the strategy-relevant part of the
/// configuration stays the same, and rebuilt as soon as it changes.
#[derive(Debug, Default)]
pub struct Planner {
    cache: Mutex<Option<(StrategyKey, Arc<AnyStrategy>)>>,
}

impl Planner {
    /// Creates a planner with an empty strategy cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Plans `items` under `config`.
    ///
    /// The configuration is clamped first, so this never fails. Items are
    /// copied; the caller's slice is not reordered.
    pub fn plan(&self, config: &PackingConfig, items: &[Item]) -> PlanningResult {
        let start = Instant::now();
        let config = config.validated();
        let strategy = self.strategy_for(&config);

        let mut ordered = items.to_vec();
        let sort_start = Instant::now();
        let sorter = SortEngine::new(config.thread_count).sort(&mut ordered, config.sort_order);
        let sort_time = sort_start.elapsed();

        let pack_start = Instant::now();
        let packs = strategy.pack_items(
            &ordered,
            config.max_items_per_pack,
            config.max_weight_per_pack,
        );
        let pack_time = pack_start.elapsed();

        let utilization = Self::calculate_utilization(&packs, config.max_weight_per_pack);
        let total_items = total_quantity(items);

        log::debug!(
            "planned {} items into {} packs with {} ({:.1}% utilization)",
            total_items,
            packs.len(),
            strategy.name(),
            utilization
        );

        PlanningResult {
            packs,
            sort_time,
            pack_time,
            total_time: start.elapsed(),
            total_items,
            utilization_percent: utilization,
            strategy_name: strategy.name(),
            sort_algorithm: sorter.map(|algorithm| algorithm.name().to_string()),
        }
    }

    /// Name of the cached strategy, if any.
    pub fn cached_strategy_name(&self) -> Option<String> {
        self.cache.lock().as_ref().map(|(_, strategy)| strategy.name())
    }

    /// Average fill of non-empty packs as a percentage of `max_weight`.
    pub fn calculate_utilization(packs: &[Pack], max_weight: f64) -> f64 {
        utilization_percent(packs, max_weight)
    }

    fn strategy_for(&self, config: &PackingConfig) -> Arc<AnyStrategy> {
        let key = StrategyKey::of(config);
        let mut cache = self.cache.lock();
        match cache.as_ref() {
            Some((cached, strategy)) if *cached == key => Arc::clone(strategy),
            _ => {
                let strategy = Arc::new(AnyStrategy::from_config(config));
                log::debug!("planner: built strategy {}", strategy.name());
                *cache = Some((key, Arc::clone(&strategy)));
                strategy
            }
        }
    }
}

/// Sum of positive quantities. Saturates instead of wrapping.
fn total_quantity(items: &[Item]) -> u64 {
    let mut total: u64 = 0;
    for item in items {
        match total.checked_add(u64::from(item.units())) {
            Some(sum) => total = sum,
            None => {
                log::warn!("planner: item quantity total overflowed, saturating");
                return u64::MAX;
            }
        }
    }
    total
}
