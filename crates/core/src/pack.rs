//! Pack representation with capacity-checked mutation.

use std::fmt;

use crate::item::Item;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tolerance for floating-point weight accumulation.
///
/// This is not a policy relaxation: a pack is allowed to exceed its weight
/// ceiling by at most this amount because of rounding in repeated additions.
pub const WEIGHT_EPSILON: f64 = 1e-9;

/// A capacity-bounded container of item slices.
///
/// A pack starts empty and only grows. Aggregates are maintained on every
/// successful append.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pack {
    number: u32,
    items: Vec<Item>,
    total_items: u32,
    total_weight: f64,
    max_length: u32,
}

impl Pack {
    /// Creates an empty pack with the given sequence number.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            items: Vec::with_capacity(8),
            total_items: 0,
            total_weight: 0.0,
            max_length: 0,
        }
    }

    /// Adds as many units of `item` as fit, up to `remaining`.
    ///
    /// The number of units is bounded by both the item-count ceiling and
    /// `floor((max_weight - total_weight) / unit_weight)`. Returns the number
    /// of units appended; zero means the pack cannot take even one unit.
    pub fn add_partial(
        &mut self,
        item: &Item,
        remaining: u32,
        max_items: u32,
        max_weight: f64,
    ) -> u32 {
        let can_add = self.capacity_for(item, max_items, max_weight).min(remaining);

        if can_add > 0 {
            let quantity = i32::try_from(can_add).unwrap_or(i32::MAX);
            self.items.push(item.with_quantity(quantity));
            self.total_items += can_add;
            self.total_weight += f64::from(can_add) * item.weight();
            self.max_length = self.max_length.max(item.length());
        }

        can_add
    }

    /// How many units of `item` this pack could still take.
    pub fn capacity_for(&self, item: &Item, max_items: u32, max_weight: f64) -> u32 {
        let by_items = max_items.saturating_sub(self.total_items);
        if by_items == 0 {
            return 0;
        }
        let by_weight = units_by_weight(max_weight - self.total_weight, item.weight());
        by_items.min(by_weight)
    }

    /// Returns the pack's sequence number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Assigns a new sequence number.
    pub fn renumber(&mut self, number: u32) {
        self.number = number;
    }

    /// Returns the item slices in insertion order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Returns the total number of units in the pack.
    pub fn total_items(&self) -> u32 {
        self.total_items
    }

    /// Returns the accumulated weight.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Returns the longest item length seen (the "pack length").
    pub fn max_length(&self) -> u32 {
        self.max_length
    }

    /// Returns true if nothing has been added.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Weight still available under `max_weight`.
    pub fn remaining_weight_capacity(&self, max_weight: f64) -> f64 {
        (max_weight - self.total_weight).max(0.0)
    }

    /// Unit slots still available under `max_items`.
    pub fn remaining_item_capacity(&self, max_items: u32) -> u32 {
        max_items.saturating_sub(self.total_items)
    }

    /// Returns true if either ceiling has been reached.
    pub fn is_full(&self, max_items: u32, max_weight: f64) -> bool {
        self.total_items >= max_items || self.total_weight >= max_weight - WEIGHT_EPSILON
    }

    /// Checks the pack invariant against the given ceilings.
    pub fn within_limits(&self, max_items: u32, max_weight: f64) -> bool {
        self.total_items <= max_items && self.total_weight <= max_weight + WEIGHT_EPSILON
    }
}

/// How many units of `unit_weight` fit into `remaining` weight.
fn units_by_weight(remaining: f64, unit_weight: f64) -> u32 {
    if unit_weight <= 0.0 {
        return u32::MAX;
    }
    if remaining <= 0.0 {
        return 0;
    }
    // Half the tolerance keeps the rounded sum inside `within_limits`.
    // Float-to-int casts saturate, and NaN maps to zero.
    ((remaining + WEIGHT_EPSILON / 2.0) / unit_weight).floor() as u32
}

impl fmt::Display for Pack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pack Number: {}", self.number)?;
        for item in &self.items {
            writeln!(f, "{item}")?;
        }
        write!(
            f,
            "Pack Length: {}, Pack Weight: {:.2}",
            self.max_length, self.total_weight
        )
    }
}
