//! # Packplan
//!
//! Assigns quantity-bearing, weight-bearing items to packs bounded by an
//! item-count ceiling and a weight ceiling.
//!
//! This crate provides:
//! - **Sort engine**: radix, counting, merge and lock-free sorters ordering
//!   items by length
//! - **Packing strategies**: blocking, next-fit, parallel, lock-free,
//!   best-fit, parallel best-fit and map/reduce
//! - **Planner**: validate, sort, pack and measure in one call
//!
//! ## Quick Start
//!
//! ```rust
//! use packplan::{plan, Item, PackingConfig, SortOrder, StrategyKind};
//!
//! let items = vec![
//!     Item::new(1001, 6200, 30, 9.653),
//!     Item::new(2001, 7200, 50, 11.21),
//! ];
//! let config = PackingConfig::new()
//!     .with_sort_order(SortOrder::Natural)
//!     .with_max_items(40)
//!     .with_max_weight(500.0)
//!     .with_strategy(StrategyKind::Blocking);
//!
//! let result = plan(&config, &items);
//! assert_eq!(result.pack_count(), 2);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Serialization support

/// Core types and the strategy contract.
pub use packplan_core as core;

/// Length-ordering sort engine.
pub use packplan_sort as sort;

/// Packing strategies and the planner.
pub use packplan_packing as packing;

// Re-export commonly used types at root level
pub use packplan_core::{
    Error, Item, NextFitPolicy, Pack, PackStrategy, PackingConfig, PlanSummary, PlanningResult,
    Result, SafetyLimits, SortOrder, StrategyKind,
};
pub use packplan_packing::{AnyStrategy, Planner};
pub use packplan_sort::{SortAlgorithm, SortEngine};

/// Plans `items` under `config` with a one-shot [`Planner`].
///
/// Use a long-lived [`Planner`] instead when planning repeatedly with the
/// same configuration, so the strategy is built once.
pub fn plan(config: &PackingConfig, items: &[Item]) -> PlanningResult {
    Planner::new().plan(config, items)
}
