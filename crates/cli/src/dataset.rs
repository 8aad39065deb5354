//! Synthetic item generators for benchmarks and sample inputs.

use packplan_core::Item;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Which generator to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    /// Independent uniform draws.
    Uniform,
    /// Repeating mix of heavy, light, medium and random items.
    Stress,
    /// The fixed edge-case items.
    Problematic,
}

impl DatasetKind {
    /// Generates `count` items with `seed`. `Problematic` ignores both.
    pub fn generate(&self, count: usize, seed: u64) -> Vec<Item> {
        match self {
            DatasetKind::Uniform => uniform(count, seed),
            DatasetKind::Stress => stress(count, seed),
            DatasetKind::Problematic => problematic(),
        }
    }
}

/// Uniform items: ids 1000..=9999, lengths 100..=10000, quantities 1..=100,
/// unit weights in [0.1, 50.0).
pub fn uniform(count: usize, seed: u64) -> Vec<Item> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Item::new(
                rng.gen_range(1000..=9999),
                rng.gen_range(100..=10_000),
                rng.gen_range(1..=100),
                rng.gen_range(0.1..50.0),
            )
        })
        .collect()
}

/// Cycles through four patterns: a single heavy unit, many light units, a
/// medium batch, and a random item.
pub fn stress(count: usize, seed: u64) -> Vec<Item> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let offset = i as i64;
            match i % 4 {
                0 => Item::new(1000 + offset, 5000, 1, 45.0),
                1 => Item::new(2000 + offset, 1000, 50, 1.0),
                2 => Item::new(3000 + offset, 3000, 10, 15.0),
                _ => Item::new(
                    4000 + offset,
                    rng.gen_range(100..=8000),
                    rng.gen_range(1..=30),
                    rng.gen_range(2.0..25.0),
                ),
            }
        })
        .collect()
}

/// Heavy and high-quantity items that stress splitting under tight ceilings.
pub fn problematic() -> Vec<Item> {
    vec![
        Item::new(1001, 6200, 50, 9.653),
        Item::new(2001, 7200, 90, 11.21),
        Item::new(3001, 8200, 30, 19.653),
        Item::new(4001, 5000, 100, 4.5),
        Item::new(5001, 10000, 1, 49.9),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_ranges_and_seed() {
        let items = uniform(2_000, 42);
        assert_eq!(items.len(), 2_000);
        for item in &items {
            assert!((1000..=9999).contains(&item.id()));
            assert!((100..=10_000).contains(&item.length()));
            assert!((1..=100).contains(&item.quantity()));
            assert!(item.weight() >= 0.1 && item.weight() < 50.0);
        }
        assert_eq!(items, uniform(2_000, 42));
        assert_ne!(items, uniform(2_000, 43));
    }

    #[test]
    fn test_stress_patterns() {
        let items = stress(8, 1);
        assert_eq!(items[0], Item::new(1000, 5000, 1, 45.0));
        assert_eq!(items[1], Item::new(2001, 1000, 50, 1.0));
        assert_eq!(items[2], Item::new(3002, 3000, 10, 15.0));
        assert_eq!(items[3].id(), 4003);
        assert!((1..=30).contains(&items[3].quantity()));
        assert_eq!(items[4].id(), 1004);
    }

    #[test]
    fn test_problematic_is_fixed() {
        let items = DatasetKind::Problematic.generate(100, 9);
        assert_eq!(items.len(), 5);
        assert_eq!(items[4].weight(), 49.9);
    }
}
