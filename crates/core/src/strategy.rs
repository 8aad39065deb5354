//! Packing strategy contract.

use std::fmt;
use std::str::FromStr;

use crate::item::Item;
use crate::pack::Pack;
use crate::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Packing strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StrategyKind {
    /// Sequential first-fit into the most recently opened pack.
    #[default]
    Blocking,
    /// First-fit restricted to the current pack, with an explicit full-pack policy.
    NextFit,
    /// Chunk-parallel first-fit.
    Parallel,
    /// Chunk-parallel first-fit with a lock-free result queue.
    LockFree,
    /// Serial best-fit over a priority queue of open packs.
    BestFit,
    /// Work-stealing best-fit.
    ParallelBestFit,
    /// Per-item map phase followed by a sequential reduce.
    Async,
}

impl StrategyKind {
    /// All strategies in declaration order.
    pub fn all() -> &'static [StrategyKind] {
        &[
            StrategyKind::Blocking,
            StrategyKind::NextFit,
            StrategyKind::Parallel,
            StrategyKind::LockFree,
            StrategyKind::BestFit,
            StrategyKind::ParallelBestFit,
            StrategyKind::Async,
        ]
    }

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Blocking => "blocking",
            StrategyKind::NextFit => "next-fit",
            StrategyKind::Parallel => "parallel",
            StrategyKind::LockFree => "lock-free",
            StrategyKind::BestFit => "best-fit",
            StrategyKind::ParallelBestFit => "parallel-best-fit",
            StrategyKind::Async => "async",
        }
    }

    /// Returns true if the strategy spawns workers.
    pub fn is_parallel(&self) -> bool {
        matches!(
            self,
            StrategyKind::Parallel
                | StrategyKind::LockFree
                | StrategyKind::ParallelBestFit
                | StrategyKind::Async
        )
    }

    /// Returns true if output is identical across runs for identical input.
    pub fn is_deterministic(&self) -> bool {
        matches!(
            self,
            StrategyKind::Blocking | StrategyKind::NextFit | StrategyKind::BestFit
        )
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "blocking" | "first-fit" => Ok(StrategyKind::Blocking),
            "next-fit" | "nextfit" => Ok(StrategyKind::NextFit),
            "parallel" => Ok(StrategyKind::Parallel),
            "lock-free" | "lockfree" => Ok(StrategyKind::LockFree),
            "best-fit" | "bestfit" => Ok(StrategyKind::BestFit),
            "parallel-best-fit" | "parallelbestfit" => Ok(StrategyKind::ParallelBestFit),
            "async" => Ok(StrategyKind::Async),
            other => Err(Error::Config(format!("unknown strategy '{other}'"))),
        }
    }
}

/// Places items into packs under item-count and weight ceilings.
///
/// Implementations skip items with non-positive quantity and items whose unit
/// weight exceeds `max_weight`. They never return empty packs, and every
/// returned pack satisfies [`Pack::within_limits`]. Pack numbers are unique
/// within one call.
pub trait PackStrategy: Send + Sync {
    /// Packs `items` in the order given.
    fn pack_items(&self, items: &[Item], max_items: u32, max_weight: f64) -> Vec<Pack>;

    /// Human-readable name, including thread count where relevant.
    fn name(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_names_round_trip() {
        for kind in StrategyKind::all() {
            let parsed: StrategyKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, *kind);
        }
    }

    #[test]
    fn test_strategy_aliases() {
        assert_eq!(
            "LOCK_FREE".parse::<StrategyKind>().unwrap(),
            StrategyKind::LockFree
        );
        assert_eq!(
            "first-fit".parse::<StrategyKind>().unwrap(),
            StrategyKind::Blocking
        );
        assert!("worst-fit".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn test_strategy_classification() {
        assert!(!StrategyKind::Blocking.is_parallel());
        assert!(StrategyKind::Async.is_parallel());
        assert!(StrategyKind::BestFit.is_deterministic());
        assert!(!StrategyKind::LockFree.is_deterministic());
        assert_eq!(StrategyKind::all().len(), 7);
    }
}
