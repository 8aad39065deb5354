//! Item representation.

use std::fmt;

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque item identifier.
pub type ItemId = i64;

/// A quantity-bearing, weight-bearing line item.
///
/// Items are immutable values. Splitting an item across packs produces a new
/// value through [`Item::with_quantity`]; the original is never touched.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Item {
    id: ItemId,
    length: u32,
    quantity: i32,
    weight: f64,
}

impl Item {
    /// Creates a new item. `weight` is the weight of a single unit.
    pub fn new(id: ItemId, length: u32, quantity: i32, weight: f64) -> Self {
        Self {
            id,
            length,
            quantity,
            weight,
        }
    }

    /// Returns the item identifier.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Returns the length, used for ordering and pack length.
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Returns the number of physical units this item represents.
    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    /// Returns the weight of one unit.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns `quantity * weight`.
    pub fn total_weight(&self) -> f64 {
        f64::from(self.quantity) * self.weight
    }

    /// Returns a copy of this item carrying `quantity` units.
    pub fn with_quantity(&self, quantity: i32) -> Self {
        Self { quantity, ..*self }
    }

    /// Quantity as an unsigned count; non-positive quantities count as zero.
    pub fn units(&self) -> u32 {
        u32::try_from(self.quantity).unwrap_or(0)
    }

    /// Returns true if at least one unit of this item fits an empty pack
    /// whose weight ceiling is `max_weight`.
    pub fn is_packable(&self, max_weight: f64) -> bool {
        self.quantity > 0 && self.weight.is_finite() && self.weight >= 0.0 && self.weight <= max_weight
    }

    /// Rejects values no caller should ever construct.
    pub fn validate(&self) -> Result<()> {
        if !self.weight.is_finite() {
            return Err(Error::InvalidItem(format!(
                "item {} has non-finite weight {}",
                self.id, self.weight
            )));
        }
        if self.weight < 0.0 {
            return Err(Error::InvalidItem(format!(
                "item {} has negative weight {}",
                self.id, self.weight
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{:.3}",
            self.id, self.length, self.quantity, self.weight
        )
    }
}
