//! Integration tests for packplan-core.

use packplan_core::{
    chunk_ranges, scoped_map, utilization_percent, Item, Pack, PackingConfig, PlanningResult,
    SortOrder, StrategyKind, WEIGHT_EPSILON,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fills packs the way a first-fit loop would, returning the packs.
fn fill(items: &[Item], max_items: u32, max_weight: f64) -> Vec<Pack> {
    let mut packs = vec![Pack::new(1)];
    for item in items {
        let mut remaining = item.units();
        while remaining > 0 {
            let current = packs.len() - 1;
            let added = packs[current].add_partial(item, remaining, max_items, max_weight);
            if added == 0 {
                let number = packs.len() as u32 + 1;
                packs.push(Pack::new(number));
            } else {
                remaining -= added;
            }
        }
    }
    packs
}

mod pack_tests {
    use super::*;

    #[test]
    fn test_reference_split() {
        let items = [
            Item::new(1001, 6200, 30, 9.653),
            Item::new(2001, 7200, 50, 11.21),
        ];
        let packs = fill(&items, 40, 500.0);

        assert_eq!(packs.len(), 2);
        assert_eq!(packs[0].items().len(), 2);
        assert_eq!(packs[0].items()[0].quantity(), 30);
        assert_eq!(packs[0].items()[1].quantity(), 10);
        assert!((packs[0].total_weight() - 401.69).abs() < 1e-6);
        assert_eq!(packs[0].max_length(), 7200);

        assert_eq!(packs[1].items().len(), 1);
        assert_eq!(packs[1].items()[0].id(), 2001);
        assert_eq!(packs[1].items()[0].quantity(), 40);
        assert!((packs[1].total_weight() - 448.40).abs() < 1e-6);
    }

    #[test]
    fn test_random_fill_respects_limits() {
        let mut rng = StdRng::seed_from_u64(7);
        let items: Vec<Item> = (0..200)
            .map(|i| {
                Item::new(
                    i,
                    rng.gen_range(1..10_000),
                    rng.gen_range(1..50),
                    rng.gen_range(0.01..5.0),
                )
            })
            .collect();

        let packs = fill(&items, 25, 40.0);
        for pack in &packs {
            assert!(pack.total_items() <= 25);
            assert!(pack.total_weight() <= 40.0 + WEIGHT_EPSILON);
        }

        let input: i64 = items.iter().map(|i| i64::from(i.quantity())).sum();
        let output: i64 = packs
            .iter()
            .flat_map(|p| p.items())
            .map(|i| i64::from(i.quantity()))
            .sum();
        assert_eq!(input, output);
    }

    #[test]
    fn test_original_quantity_untouched_by_split() {
        let item = Item::new(5, 100, 12, 1.0);
        let packs = fill(&[item], 5, 100.0);
        assert_eq!(packs.len(), 3);
        assert_eq!(item.quantity(), 12);
    }
}

mod config_tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PackingConfig::default();
        let validated = config.validated();
        assert_eq!(validated.max_items_per_pack, config.max_items_per_pack);
        assert_eq!(validated.max_weight_per_pack, config.max_weight_per_pack);
        assert_eq!(validated.sort_order, SortOrder::Natural);
        assert_eq!(validated.strategy, StrategyKind::Blocking);
    }

    #[test]
    fn test_header_values_parse() {
        let order: SortOrder = "LONG_TO_SHORT".parse().unwrap();
        let strategy: StrategyKind = "parallel-best-fit".parse().unwrap();
        assert_eq!(order.code(), "LTS");
        assert_eq!(strategy.to_string(), "parallel-best-fit");
    }
}

mod result_tests {
    use super::*;

    #[test]
    fn test_utilization_reference() {
        let items = [
            Item::new(1, 100, 5, 2.0),
            Item::new(2, 200, 3, 3.0),
            Item::new(3, 300, 2, 5.0),
            Item::new(4, 150, 4, 2.5),
        ];
        let packs = fill(&items, 10, 25.0);
        assert_eq!(packs.len(), 2);
        assert_eq!(packs[0].total_items(), 9);
        assert!((packs[0].total_weight() - 24.0).abs() < 1e-9);
        assert_eq!(packs[1].total_items(), 5);
        assert!((packs[1].total_weight() - 15.0).abs() < 1e-9);

        let util = utilization_percent(&packs, 25.0);
        assert!((util - 78.0).abs() < 1e-9);

        let result = PlanningResult {
            packs,
            total_items: 14,
            utilization_percent: util,
            ..PlanningResult::default()
        };
        assert_eq!(result.pack_count(), 2);
        assert_eq!(result.packed_quantity(), 14);
        assert!(result.all_packed());
    }
}

mod worker_tests {
    use super::*;

    #[test]
    fn test_chunked_sum_matches_serial() {
        let data: Vec<u64> = (1..=10_000).collect();
        let ranges = chunk_ranges(data.len(), 7);
        let partial = scoped_map(&ranges, |_, r| data[r.clone()].iter().sum::<u64>());
        assert_eq!(partial.len(), 7);
        assert_eq!(partial.iter().sum::<u64>(), 10_000 * 10_001 / 2);
    }
}
