//! Best-fit packing.

use std::collections::BTreeSet;

use packplan_core::{Item, Pack, PackStrategy, SafetyLimits, WEIGHT_EPSILON};

use crate::packing_utils::{accept, Ceiling, Flow, IterationBudget, PackNumbering, SequentialNumbering};

/// Remaining weight is keyed in thousandths.
const WEIGHT_SCALE: f64 = 1_000.0;

/// Ordering key of an open pack: remaining weight, remaining slots, slot index.
type OpenKey = (i64, u32, usize);

fn quantize(weight: f64) -> i64 {
    // `as` saturates on overflow and maps NaN to zero.
    (weight * WEIGHT_SCALE).floor() as i64
}

/// Best-fit packer over a min-ordered set of open packs.
///
/// Each placement goes to the open pack with the least remaining weight
/// capacity that can still take one unit, ties broken by fewest remaining
/// slots and then by age. A new pack is opened only when no open pack can
/// take a unit.
pub struct BestFitPacker<N: PackNumbering> {
    numbering: N,
    budget: IterationBudget,
    max_items: u32,
    max_weight: f64,
    slots: Vec<Option<Pack>>,
    open: BTreeSet<OpenKey>,
    sealed: Vec<usize>,
    halted: Option<Ceiling>,
}

impl<N: PackNumbering> BestFitPacker<N> {
    /// Creates a packer for the given ceilings.
    pub fn new(numbering: N, iterations: u64, max_items: u32, max_weight: f64) -> Self {
        Self {
            numbering,
            budget: IterationBudget::new(iterations),
            max_items,
            max_weight,
            slots: Vec::new(),
            open: BTreeSet::new(),
            sealed: Vec::new(),
            halted: None,
        }
    }

    fn key(&self, index: usize, pack: &Pack) -> OpenKey {
        (
            quantize(pack.remaining_weight_capacity(self.max_weight)),
            pack.remaining_item_capacity(self.max_items),
            index,
        )
    }

    /// Open pack that best fits one unit of `item`.
    fn best_candidate(&self, item: &Item) -> Option<OpenKey> {
        let floor = quantize(item.weight() - WEIGHT_EPSILON);
        self.open
            .range((floor, 0, 0)..)
            .find(|&&(_, _, index)| {
                self.slots[index]
                    .as_ref()
                    .map(|pack| pack.capacity_for(item, self.max_items, self.max_weight) > 0)
                    .unwrap_or(false)
            })
            .copied()
    }

    fn open_pack(&mut self) -> Option<OpenKey> {
        let number = self.numbering.next_number()?;
        let index = self.slots.len();
        let pack = Pack::new(number);
        let key = self.key(index, &pack);
        self.slots.push(Some(pack));
        self.open.insert(key);
        Some(key)
    }

    /// Places every unit of `item` it can.
    pub fn place(&mut self, item: &Item) -> Flow {
        if self.halted.is_some() {
            return Flow::Halt;
        }
        if !accept(item, self.max_weight) {
            return Flow::Continue;
        }

        let mut remaining = item.units();
        while remaining > 0 {
            if !self.budget.spend() {
                self.halted = Some(Ceiling::Iterations);
                return Flow::Halt;
            }

            let key = match self.best_candidate(item) {
                Some(key) => key,
                None => match self.open_pack() {
                    Some(key) => key,
                    None => {
                        self.halted = Some(Ceiling::Packs);
                        return Flow::Halt;
                    }
                },
            };

            self.open.remove(&key);
            let index = key.2;
            // Keys in `open` always name live slots: a slot is only taken
            // after its pack was sealed, and sealing removes its key.
            let Some(pack) = self.slots[index].as_mut() else {
                debug_assert!(false, "open key {key:?} names a drained slot");
                break;
            };
            let added = pack.add_partial(item, remaining, self.max_items, self.max_weight);
            remaining -= added;

            if pack.is_full(self.max_items, self.max_weight) {
                self.sealed.push(index);
            } else {
                let rekey = (
                    quantize(pack.remaining_weight_capacity(self.max_weight)),
                    pack.remaining_item_capacity(self.max_items),
                    index,
                );
                self.open.insert(rekey);
            }
        }

        Flow::Continue
    }

    /// Places items in order until done or a ceiling is reached.
    pub fn place_all<'i>(&mut self, items: impl IntoIterator<Item = &'i Item>) -> Flow {
        for item in items {
            if self.place(item) == Flow::Halt {
                return Flow::Halt;
            }
        }
        Flow::Continue
    }

    /// Takes the packs sealed as full so far. Open packs stay put.
    pub fn drain_sealed(&mut self) -> Vec<Pack> {
        let mut sealed = std::mem::take(&mut self.sealed);
        sealed.sort_unstable();
        sealed
            .into_iter()
            .filter_map(|index| self.slots[index].take())
            .collect()
    }

    /// Number of packs currently open.
    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    /// Returns true if a ceiling stopped this packer.
    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    pub(crate) fn ceiling(&self) -> Option<Ceiling> {
        self.halted
    }

    /// Returns every pack not yet drained, in creation order, without empties.
    pub fn finish(self) -> Vec<Pack> {
        self.slots
            .into_iter()
            .flatten()
            .filter(|pack| !pack.is_empty())
            .collect()
    }
}

/// Serial best-fit strategy. Output is deterministic for identical input.
#[derive(Debug, Clone, Default)]
pub struct BestFitStrategy {
    limits: SafetyLimits,
}

impl BestFitStrategy {
    /// Creates a best-fit strategy bounded by `limits`.
    pub fn new(limits: SafetyLimits) -> Self {
        Self { limits }
    }
}

/// Serial best-fit with sequential numbering.
pub(crate) fn pack_best_fit(
    items: &[Item],
    max_items: u32,
    max_weight: f64,
    limits: &SafetyLimits,
    strategy: &str,
) -> Vec<Pack> {
    let mut packer = BestFitPacker::new(
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

impl PackStrategy for BestFitStrategy {
    fn pack_items(&self, items: &[Item], max_items: u32, max_weight: f64) -> Vec<Pack> {
        pack_best_fit(items, max_items, max_weight, &self.limits, "best-fit")
    }

    fn name(&self) -> String {
        "BestFit".to_string()
    }
}
