//! Planning configuration.

use std::fmt;
use std::str::FromStr;

use crate::strategy::StrategyKind;
use crate::workers::resolve_thread_count;
use crate::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest weight ceiling a configuration may carry after clamping.
pub const MIN_MAX_WEIGHT: f64 = 0.1;

/// Upper bound on worker threads.
pub const MAX_THREADS: usize = 32;

/// Requested item ordering before packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SortOrder {
    /// Keep input order.
    #[default]
    Natural,
    /// Ascending by length.
    ShortToLong,
    /// Descending by length.
    LongToShort,
}

impl SortOrder {
    /// Wire name as used in input headers.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Natural => "NATURAL",
            SortOrder::ShortToLong => "SHORT_TO_LONG",
            SortOrder::LongToShort => "LONG_TO_SHORT",
        }
    }

    /// Three-letter code used in reports.
    pub fn code(&self) -> &'static str {
        match self {
            SortOrder::Natural => "NAT",
            SortOrder::ShortToLong => "STL",
            SortOrder::LongToShort => "LTS",
        }
    }

    /// `Some(true)` for ascending, `Some(false)` for descending, `None` for natural.
    pub fn direction(&self) -> Option<bool> {
        match self {
            SortOrder::Natural => None,
            SortOrder::ShortToLong => Some(true),
            SortOrder::LongToShort => Some(false),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NATURAL" | "NAT" => Ok(SortOrder::Natural),
            "SHORT_TO_LONG" | "STL" => Ok(SortOrder::ShortToLong),
            "LONG_TO_SHORT" | "LTS" => Ok(SortOrder::LongToShort),
            other => Err(Error::Config(format!("unknown sort order '{other}'"))),
        }
    }
}

/// Hard ceilings that bound the work of a single packing call.
///
/// When either ceiling is reached the strategy stops and returns the packs
/// produced so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SafetyLimits {
    /// Maximum number of greedy moves per call.
    pub max_iterations: u64,
    /// Maximum number of packs per call.
    pub max_packs: u32,
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            max_iterations: 50_000_000,
            max_packs: 5_000_000,
        }
    }
}

impl SafetyLimits {
    /// Creates limits with explicit values.
    pub fn new(max_iterations: u64, max_packs: u32) -> Self {
        Self {
            max_iterations,
            max_packs,
        }
    }

    /// Splits the iteration budget across `workers`, never below one.
    pub fn per_worker_iterations(&self, workers: usize) -> u64 {
        let workers = u64::try_from(workers.max(1)).unwrap_or(u64::MAX);
        (self.max_iterations / workers).max(1)
    }
}

/// What next-fit does when the current pack cannot take one more unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NextFitPolicy {
    /// Open a fresh pack and keep placing the same item. Conserves quantity.
    #[default]
    OpenNewPack,
    /// Drop the rest of the item; the next item starts a fresh pack.
    /// Does not conserve quantity.
    SkipOnFull,
}

/// Configuration for a planning call.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackingConfig {
    /// Item ordering applied before packing.
    pub sort_order: SortOrder,

    /// Maximum units per pack.
    pub max_items_per_pack: u32,

    /// Maximum weight per pack.
    pub max_weight_per_pack: f64,

    /// Packing strategy.
    pub strategy: StrategyKind,

    /// Number of worker threads (0 = hardware concurrency).
    pub thread_count: usize,

    /// Work ceilings.
    pub limits: SafetyLimits,

    /// Next-fit behavior on a full pack.
    pub next_fit_policy: NextFitPolicy,
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            sort_order: SortOrder::default(),
            max_items_per_pack: 100,
            max_weight_per_pack: 1000.0,
            strategy: StrategyKind::default(),
            thread_count: 0,
            limits: SafetyLimits::default(),
            next_fit_policy: NextFitPolicy::default(),
        }
    }
}

impl PackingConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sort order.
    pub fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    /// Sets the item ceiling.
    pub fn with_max_items(mut self, max_items: u32) -> Self {
        self.max_items_per_pack = max_items;
        self
    }

    /// Sets the weight ceiling.
    pub fn with_max_weight(mut self, max_weight: f64) -> Self {
        self.max_weight_per_pack = max_weight;
        self
    }

    /// Sets the strategy.
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the thread count (0 = auto).
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.thread_count = threads;
        self
    }

    /// Sets the work ceilings.
    pub fn with_limits(mut self, limits: SafetyLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Sets the next-fit policy.
    pub fn with_next_fit_policy(mut self, policy: NextFitPolicy) -> Self {
        self.next_fit_policy = policy;
        self
    }

    /// Returns a copy with every field clamped into its valid range.
    ///
    /// Never fails: a degenerate value is replaced by the nearest valid one.
    pub fn validated(&self) -> Self {
        let max_weight = if self.max_weight_per_pack.is_finite() {
            self.max_weight_per_pack.max(MIN_MAX_WEIGHT)
        } else if self.max_weight_per_pack == f64::INFINITY {
            f64::MAX
        } else {
            MIN_MAX_WEIGHT
        };

        Self {
            max_items_per_pack: self.max_items_per_pack.max(1),
            max_weight_per_pack: max_weight,
            thread_count: resolve_thread_count(self.thread_count),
            limits: SafetyLimits {
                max_iterations: self.limits.max_iterations.max(1),
                max_packs: self.limits.max_packs.max(1),
            },
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("NATURAL".parse::<SortOrder>().unwrap(), SortOrder::Natural);
        assert_eq!(
            " short_to_long ".parse::<SortOrder>().unwrap(),
            SortOrder::ShortToLong
        );
        assert_eq!("LTS".parse::<SortOrder>().unwrap(), SortOrder::LongToShort);
        assert!("SIDEWAYS".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_sort_order_codes() {
        assert_eq!(SortOrder::Natural.code(), "NAT");
        assert_eq!(SortOrder::ShortToLong.code(), "STL");
        assert_eq!(SortOrder::LongToShort.code(), "LTS");
        assert_eq!(SortOrder::LongToShort.to_string(), "LONG_TO_SHORT");
        assert_eq!(SortOrder::Natural.direction(), None);
        assert_eq!(SortOrder::ShortToLong.direction(), Some(true));
    }

    #[test]
    fn test_config_builder() {
        let config = PackingConfig::new()
            .with_sort_order(SortOrder::LongToShort)
            .with_max_items(40)
            .with_max_weight(500.0)
            .with_strategy(StrategyKind::BestFit)
            .with_threads(4)
            .with_next_fit_policy(NextFitPolicy::SkipOnFull);

        assert_eq!(config.sort_order, SortOrder::LongToShort);
        assert_eq!(config.max_items_per_pack, 40);
        assert_eq!(config.max_weight_per_pack, 500.0);
        assert_eq!(config.strategy, StrategyKind::BestFit);
        assert_eq!(config.thread_count, 4);
        assert_eq!(config.next_fit_policy, NextFitPolicy::SkipOnFull);
    }

    #[test]
    fn test_validated_clamps() {
        let config = PackingConfig::new()
            .with_max_items(0)
            .with_max_weight(-3.0)
            .with_threads(1000)
            .with_limits(SafetyLimits::new(0, 0))
            .validated();

        assert_eq!(config.max_items_per_pack, 1);
        assert_eq!(config.max_weight_per_pack, MIN_MAX_WEIGHT);
        assert_eq!(config.thread_count, MAX_THREADS);
        assert_eq!(config.limits, SafetyLimits::new(1, 1));
    }

    #[test]
    fn test_validated_non_finite_weight() {
        let nan = PackingConfig::new().with_max_weight(f64::NAN).validated();
        assert_eq!(nan.max_weight_per_pack, MIN_MAX_WEIGHT);

        let inf = PackingConfig::new()
            .with_max_weight(f64::INFINITY)
            .validated();
        assert!(inf.max_weight_per_pack.is_finite());
    }

    #[test]
    fn test_validated_auto_threads() {
        let config = PackingConfig::new().with_threads(0).validated();
        assert!(config.thread_count >= 1);
        assert!(config.thread_count <= MAX_THREADS);
    }

    #[test]
    fn test_per_worker_iterations() {
        let limits = SafetyLimits::new(100, 10);
        assert_eq!(limits.per_worker_iterations(4), 25);
        assert_eq!(limits.per_worker_iterations(0), 100);
        assert_eq!(SafetyLimits::new(1, 1).per_worker_iterations(8), 1);
    }
}
