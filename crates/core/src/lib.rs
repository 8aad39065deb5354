//! # Packplan Core
//!
//! Core types shared by the packplan sort engine, packing strategies and planner.
//!
//! ## Core Components
//!
//! - **Data model**: [`Item`], [`Pack`]
//! - **Configuration**: [`PackingConfig`], [`SortOrder`], [`SafetyLimits`], [`NextFitPolicy`]
//! - **Strategy contract**: [`PackStrategy`], [`StrategyKind`]
//! - **Results**: [`PlanningResult`], [`PlanSummary`]
//! - **Workers**: scoped thread helpers with inline fallback
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod config;
pub mod error;
pub mod item;
pub mod pack;
pub mod result;
pub mod strategy;
pub mod workers;

// Re-exports
pub use config::{NextFitPolicy, PackingConfig, SafetyLimits, SortOrder, MAX_THREADS, MIN_MAX_WEIGHT};
pub use error::{Error, Result};
pub use item::{Item, ItemId};
pub use pack::{Pack, WEIGHT_EPSILON};
pub use result::{utilization_percent, PlanSummary, PlanningResult};
pub use strategy::{PackStrategy, StrategyKind};
pub use workers::{chunk_ranges, resolve_thread_count, scoped_map};
