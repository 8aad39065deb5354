//! Single-threaded first-fit packing.

use packplan_core::{Item, Pack, PackStrategy, SafetyLimits};

use crate::packing_utils::{FirstFit, SequentialNumbering};

/// Places every item into the most recently opened pack, opening a new one
/// when the current pack cannot take another unit.
///
/// Output is deterministic for identical input.
#[derive(Debug, Clone, Default)]
pub struct BlockingStrategy {
    limits: SafetyLimits,
}

impl BlockingStrategy {
    /// Creates a blocking strategy bounded by `limits`.
    pub fn new(limits: SafetyLimits) -> Self {
        Self { limits }
    }
}

/// First-fit over `items` with sequential numbering. Shared by every
/// strategy that falls back to the serial path.
pub(crate) fn pack_first_fit(
    items: &[Item],
    max_items: u32,
    max_weight: f64,
    limits: &SafetyLimits,
    strategy: &str,
) -> Vec<Pack> {
    let mut packer = FirstFit::new(
        SequentialNumbering::new(limits.max_packs),
        limits.max_iterations,
        max_items,
        max_weight,
    );
    packer.place_all(items);
    if let Some(ceiling) = packer.ceiling() {
        ceiling.warn(strategy);
    }
    packer.finish()
}

impl PackStrategy for BlockingStrategy {
    fn pack_items(&self, items: &[Item], max_items: u32, max_weight: f64) -> Vec<Pack> {
        pack_first_fit(items, max_items, max_weight, &self.limits, "blocking")
    }

    fn name(&self) -> String {
        "Blocking".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_scenario() {
        let items = [
            Item::new(1001, 6200, 30, 9.653),
            Item::new(2001, 7200, 50, 11.21),
        ];
        let packs = BlockingStrategy::default().pack_items(&items, 40, 500.0);

        assert_eq!(packs.len(), 2);
        assert_eq!(packs[0].items().len(), 2);
        assert_eq!(packs[0].items()[0].quantity(), 30);
        assert_eq!(packs[0].items()[1].quantity(), 10);
        assert!((packs[0].total_weight() - 401.69).abs() < 1e-6);
        assert_eq!(packs[0].max_length(), 7200);
        assert_eq!(packs[1].items()[0].quantity(), 40);
        assert!((packs[1].total_weight() - 448.4).abs() < 1e-6);
    }

    #[test]
    fn test_weight_bound_split() {
        let items = [Item::new(1, 100, 10, 30.0)];
        let packs = BlockingStrategy::default().pack_items(&items, 100, 100.0);
        let quantities: Vec<u32> = packs.iter().map(|p| p.total_items()).collect();
        assert_eq!(quantities, vec![3, 3, 3, 1]);
    }

    #[test]
    fn test_pathological_weight_returns_nothing() {
        let items: Vec<Item> = (0..1_000).map(|i| Item::new(i, 10, 1_000, 5.0)).collect();
        let packs = BlockingStrategy::default().pack_items(&items, 10, 0.1);
        assert!(packs.is_empty());
    }

    #[test]
    fn test_pack_ceiling() {
        let items = [Item::new(1, 100, 1_000, 1.0)];
        let strategy = BlockingStrategy::new(SafetyLimits::new(u64::MAX, 4));
        let packs = strategy.pack_items(&items, 1, 10.0);
        assert_eq!(packs.len(), 4);
    }

    #[test]
    fn test_name() {
        assert_eq!(BlockingStrategy::default().name(), "Blocking");
    }
}
