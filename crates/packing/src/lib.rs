//! # Packplan Packing
//!
//! Packing strategies and the planning orchestrator.
//!
//! Every strategy implements [`PackStrategy`]: items go into packs bounded by
//! an item-count ceiling and a weight ceiling, splitting an item's quantity
//! across packs when needed.
//!
//! | Strategy | Candidate pack | Workers |
//! |---|---|---|
//! | [`BlockingStrategy`] | most recently opened | 1 |
//! | [`NextFitStrategy`] | most recently opened, optional skip on full | 1 |
//! | [`ParallelStrategy`] | most recently opened within a chunk | static chunks |
//! | [`LockFreeStrategy`] | most recently opened within a chunk | static chunks, lock-free hand-off |
//! | [`BestFitStrategy`] | tightest open pack | 1 |
//! | [`ParallelBestFitStrategy`] | tightest open pack of the worker | batches from a shared cursor |
//! | [`AsyncStrategy`] | per-item map, first-fit reduce | rayon pool |
//!
//! [`Planner`] ties the sort engine and a strategy together.

pub mod async_pack;
pub mod best_fit;
pub mod blocking;
pub mod factory;
pub mod lockfree;
pub mod next_fit;
pub mod packing_utils;
pub mod parallel;
pub mod parallel_best_fit;
pub mod planner;

// Re-exports
pub use async_pack::AsyncStrategy;
pub use best_fit::{BestFitPacker, BestFitStrategy};
pub use blocking::BlockingStrategy;
pub use factory::AnyStrategy;
pub use lockfree::LockFreeStrategy;
pub use next_fit::NextFitStrategy;
pub use parallel::{ParallelStrategy, PARALLEL_MIN_ITEMS};
pub use parallel_best_fit::{ParallelBestFitStrategy, BATCH_SIZE};
pub use planner::Planner;
pub use packplan_core::{Item, Pack, PackStrategy, PackingConfig, PlanningResult, StrategyKind};
