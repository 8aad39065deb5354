//! Planning result representation.

use std::time::Duration;

use crate::pack::Pack;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of a planning call.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanningResult {
    /// Packs in output order.
    pub packs: Vec<Pack>,

    /// Time spent ordering items.
    pub sort_time: Duration,

    /// Time spent packing.
    pub pack_time: Duration,

    /// Wall time of the whole call.
    pub total_time: Duration,

    /// Sum of positive input quantities.
    pub total_items: u64,

    /// Average fill of non-empty packs against the weight ceiling, in [0, 100].
    pub utilization_percent: f64,

    /// Name of the strategy that produced the packs.
    pub strategy_name: String,

    /// Sorter used, or `None` when the input order was kept.
    pub sort_algorithm: Option<String>,
}

impl PlanningResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of non-empty packs.
    pub fn pack_count(&self) -> usize {
        self.packs.iter().filter(|p| !p.is_empty()).count()
    }

    /// Units that actually ended up in a pack.
    pub fn packed_quantity(&self) -> u64 {
        self.packs.iter().map(|p| u64::from(p.total_items())).sum()
    }

    /// Returns true if every input unit was packed.
    pub fn all_packed(&self) -> bool {
        self.packed_quantity() == self.total_items
    }

    /// Input units processed per second of total time.
    pub fn items_per_second(&self) -> f64 {
        let secs = self.total_time.as_secs_f64();
        if secs > 0.0 {
            self.total_items as f64 / secs
        } else {
            0.0
        }
    }

    /// Condensed view for reports.
    pub fn summary(&self) -> PlanSummary {
        PlanSummary::from(self)
    }
}

/// Summary statistics for a planning result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanSummary {
    /// Strategy used.
    pub strategy: String,
    /// Sorter used, if any.
    pub sort_algorithm: Option<String>,
    /// Number of non-empty packs.
    pub packs: usize,
    /// Sum of input quantities.
    pub total_items: u64,
    /// Units placed into packs.
    pub packed_items: u64,
    /// Utilization percentage.
    pub utilization_percent: f64,
    /// Sort phase in milliseconds.
    pub sort_ms: f64,
    /// Pack phase in milliseconds.
    pub pack_ms: f64,
    /// Whole call in milliseconds.
    pub total_ms: f64,
    /// Throughput.
    pub items_per_second: f64,
}

impl From<&PlanningResult> for PlanSummary {
    fn from(result: &PlanningResult) -> Self {
        Self {
            strategy: result.strategy_name.clone(),
            sort_algorithm: result.sort_algorithm.clone(),
            packs: result.pack_count(),
            total_items: result.total_items,
            packed_items: result.packed_quantity(),
            utilization_percent: result.utilization_percent,
            sort_ms: millis(result.sort_time),
            pack_ms: millis(result.pack_time),
            total_ms: millis(result.total_time),
            items_per_second: result.items_per_second(),
        }
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Average weight fill of non-empty packs as a percentage of `max_weight`,
/// clamped to `[0, 100]`. Returns 0 when there is nothing to measure.
pub fn utilization_percent(packs: &[Pack], max_weight: f64) -> f64 {
    if max_weight.is_nan() || max_weight <= 0.0 {
        return 0.0;
    }

    let (count, weight) = packs
        .iter()
        .filter(|p| !p.is_empty())
        .fold((0usize, 0.0f64), |(n, w), p| (n + 1, w + p.total_weight()));

    if count == 0 {
        return 0.0;
    }

    let percent = weight / (count as f64 * max_weight) * 100.0;
    if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    }
}
