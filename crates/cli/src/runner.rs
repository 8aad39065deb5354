//! Benchmark runner.

use packplan::{PackingConfig, Planner, SortOrder, StrategyKind};
use serde::{Deserialize, Serialize};

use crate::dataset::{self, DatasetKind};
use crate::result::{BenchmarkResult, RunResult};

/// Benchmark configuration.
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Input sizes to run.
    pub sizes: Vec<usize>,
    /// Strategies to compare.
    pub strategies: Vec<StrategyKind>,
    /// Sort orders to run each strategy under.
    pub sort_orders: Vec<SortOrder>,
    /// Worker count (0 = hardware concurrency).
    pub threads: usize,
    /// Item ceiling per pack.
    pub max_items: u32,
    /// Weight ceiling per pack.
    pub max_weight: f64,
    /// Generator for the input items.
    pub dataset: DatasetKind,
    /// Generator seed.
    pub seed: u64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            sizes: vec![100, 1_000, 5_000, 10_000, 15_000],
            strategies: StrategyKind::all().to_vec(),
            sort_orders: vec![SortOrder::Natural],
            threads: 0,
            max_items: 100,
            max_weight: 1000.0,
            dataset: DatasetKind::Uniform,
            seed: 42,
        }
    }
}

impl BenchmarkConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Small sizes, serial strategies only.
    pub fn quick() -> Self {
        Self::new()
            .with_sizes(vec![100, 1_000, 5_000])
            .with_strategies(vec![StrategyKind::Blocking, StrategyKind::BestFit])
    }

    /// Every strategy under every sort order.
    pub fn standard() -> Self {
        Self::new().with_sort_orders(vec![
            SortOrder::Natural,
            SortOrder::ShortToLong,
            SortOrder::LongToShort,
        ])
    }

    /// Sets the input sizes.
    pub fn with_sizes(mut self, sizes: Vec<usize>) -> Self {
        self.sizes = sizes;
        self
    }

    /// Sets the strategies.
    pub fn with_strategies(mut self, strategies: Vec<StrategyKind>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Sets the sort orders.
    pub fn with_sort_orders(mut self, orders: Vec<SortOrder>) -> Self {
        self.sort_orders = orders;
        self
    }

    /// Sets the worker count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Sets the pack ceilings.
    pub fn with_limits(mut self, max_items: u32, max_weight: f64) -> Self {
        self.max_items = max_items;
        self.max_weight = max_weight;
        self
    }

    /// Sets the item generator.
    pub fn with_dataset(mut self, dataset: DatasetKind, seed: u64) -> Self {
        self.dataset = dataset;
        self.seed = seed;
        self
    }
}

/// Outcome of one fixed edge-case configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardCheck {
    /// Case label.
    pub name: String,
    /// Strategy name as reported by the planner.
    pub strategy: String,
    /// Item ceiling of the case.
    pub max_items: u32,
    /// Weight ceiling of the case.
    pub max_weight: f64,
    /// Packs produced.
    pub packs: usize,
    /// Units that landed in a pack.
    pub packed_items: u64,
    /// Units in the input.
    pub total_items: u64,
    /// Whole call in milliseconds.
    pub total_ms: f64,
}

/// Runs the planner over generated inputs and records timings.
pub struct BenchmarkRunner {
    config: BenchmarkConfig,
    planner: Planner,
}

impl BenchmarkRunner {
    /// Creates a runner.
    pub fn new(config: BenchmarkConfig) -> Self {
        Self {
            config,
            planner: Planner::new(),
        }
    }

    /// Runs every (size, strategy, order) combination.
    pub fn run(&self) -> BenchmarkResult {
        let mut result = BenchmarkResult::new();
        for &size in &self.config.sizes {
            let items = self.config.dataset.generate(size, self.config.seed);
            for &strategy in &self.config.strategies {
                for &order in &self.config.sort_orders {
                    let config = PackingConfig::new()
                        .with_strategy(strategy)
                        .with_sort_order(order)
                        .with_threads(self.config.threads)
                        .with_max_items(self.config.max_items)
                        .with_max_weight(self.config.max_weight);
                    log::info!("benchmark: {} items, {}, {}", size, strategy, order.code());
                    result.add_run(self.run_single(size, &config, &items));
                }
            }
        }
        result
    }

    fn run_single(&self, size: usize, config: &PackingConfig, items: &[packplan::Item]) -> RunResult {
        let plan = self.planner.plan(config, items);
        let summary = plan.summary();
        RunResult {
            size,
            strategy: summary.strategy,
            sort_order: config.sort_order.code().to_string(),
            sort_algorithm: summary.sort_algorithm,
            threads: config.validated().thread_count,
            sort_ms: summary.sort_ms,
            pack_ms: summary.pack_ms,
            total_ms: summary.total_ms,
            items_per_second: summary.items_per_second,
            packs: summary.packs,
            utilization_percent: summary.utilization_percent,
        }
    }

    /// Runs the stress and problematic inputs under restrictive, moderate and
    /// generous ceilings for every configured strategy. Every check must
    /// return; the packs it produced are reported.
    pub fn run_guard_checks(&self) -> Vec<GuardCheck> {
        let stress = dataset::stress(1_000, self.config.seed);
        let problematic = dataset::problematic();
        let cases: [(&str, &[packplan::Item], u32, f64); 6] = [
            ("Restrictive", &stress, 5, 50.0),
            ("Moderate", &stress, 20, 200.0),
            ("Generous", &stress, 100, 1000.0),
            ("Heavy Items", &problematic, 20, 300.0),
            ("Tight Constraints", &problematic, 10, 150.0),
            ("Very Tight", &problematic, 5, 100.0),
        ];

        let mut checks = Vec::new();
        for &strategy in &self.config.strategies {
            for (name, items, max_items, max_weight) in cases {
                let config = PackingConfig::new()
                    .with_strategy(strategy)
                    .with_threads(self.config.threads)
                    .with_max_items(max_items)
                    .with_max_weight(max_weight);
                let plan = self.planner.plan(&config, items);
                checks.push(GuardCheck {
                    name: name.to_string(),
                    strategy: plan.strategy_name.clone(),
                    max_items,
                    max_weight,
                    packs: plan.pack_count(),
                    packed_items: plan.packed_quantity(),
                    total_items: plan.total_items,
                    total_ms: plan.summary().total_ms,
                });
            }
        }
        checks
    }
}
