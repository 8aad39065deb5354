//! Shared utilities for the packing strategies.
//!
//! # Extracted Components
//!
//! - [`PackNumbering`]: where pack numbers come from, and the pack ceiling
//! - [`IterationBudget`]: the greedy-move ceiling
//! - [`FirstFit`]: the first-fit greedy loop shared by blocking, next-fit,
//!   both chunk-parallel strategies and the async reduce phase
//! - [`renumber_sequential`]: post-pass numbering for merged pack lists

use std::sync::atomic::{AtomicU32, Ordering};

use packplan_core::{Item, NextFitPolicy, Pack};

/// Source of unique pack numbers.
///
/// Returning `None` means the pack ceiling was reached and the caller must
/// stop opening packs.
pub trait PackNumbering {
    /// Next pack number, or `None` past the ceiling.
    fn next_number(&mut self) -> Option<u32>;
}

/// Numbers `1..=cap` handed out in order by a single owner.
#[derive(Debug, Clone)]
pub struct SequentialNumbering {
    issued: u32,
    cap: u32,
}

impl SequentialNumbering {
    /// Creates a counter that stops after `cap` numbers.
    pub fn new(cap: u32) -> Self {
        Self { issued: 0, cap }
    }
}

impl PackNumbering for SequentialNumbering {
    fn next_number(&mut self) -> Option<u32> {
        if self.issued >= self.cap {
            return None;
        }
        self.issued += 1;
        Some(self.issued)
    }
}

/// Numbers drawn from an atomic counter shared by several workers.
///
/// The counter holds the count of numbers issued; the ceiling applies to the
/// total across all workers.
#[derive(Debug, Clone, Copy)]
pub struct SharedNumbering<'a> {
    counter: &'a AtomicU32,
    cap: u32,
}

impl<'a> SharedNumbering<'a> {
    /// Wraps `counter`; numbers above `cap` are refused.
    pub fn new(counter: &'a AtomicU32, cap: u32) -> Self {
        Self { counter, cap }
    }
}

impl PackNumbering for SharedNumbering<'_> {
    fn next_number(&mut self) -> Option<u32> {
        let issued = self
            .counter
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                (n < self.cap).then_some(n + 1)
            })
            .ok()?;
        Some(issued + 1)
    }
}

/// Countdown of greedy moves a packer may still make.
#[derive(Debug, Clone, Copy)]
pub struct IterationBudget {
    remaining: u64,
}

impl IterationBudget {
    /// Creates a budget of `iterations` moves.
    pub fn new(iterations: u64) -> Self {
        Self {
            remaining: iterations,
        }
    }

    /// Consumes one move. Returns `false` once the budget is exhausted.
    #[inline]
    pub fn spend(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    /// Moves left.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

/// Whether a packer can keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep feeding items.
    Continue,
    /// A ceiling was reached; further items are ignored.
    Halt,
}

/// Why a packer halted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Ceiling {
    Iterations,
    Packs,
}

impl Ceiling {
    pub(crate) fn warn(self, strategy: &str) {
        match self {
            Ceiling::Iterations => {
                log::warn!("{strategy}: iteration ceiling reached, returning partial packing")
            }
            Ceiling::Packs => {
                log::warn!("{strategy}: pack ceiling reached, returning partial packing")
            }
        }
    }
}

/// Returns true if `item` can ever be placed under `max_weight`.
///
/// Unpackable items (non-positive quantity, or unit weight above the
/// ceiling) are skipped and never retried.
#[inline]
pub(crate) fn accept(item: &Item, max_weight: f64) -> bool {
    if item.is_packable(max_weight) {
        true
    } else {
        log::trace!(
            "skipping item {} (quantity {}, unit weight {})",
            item.id(),
            item.quantity(),
            item.weight()
        );
        false
    }
}

/// First-fit greedy packer that only ever targets the most recently opened
/// pack.
///
/// Packs are opened lazily, so an empty pack is never emitted. When the
/// current pack cannot take one more unit it is sealed and, depending on the
/// [`NextFitPolicy`], either a fresh pack is opened for the rest of the item
/// or the rest of the item is dropped.
pub struct FirstFit<N: PackNumbering> {
    numbering: N,
    budget: IterationBudget,
    policy: NextFitPolicy,
    max_items: u32,
    max_weight: f64,
    current: Option<Pack>,
    sealed: Vec<Pack>,
    halted: Option<Ceiling>,
}

impl<N: PackNumbering> FirstFit<N> {
    /// Creates a packer for the given ceilings.
    pub fn new(numbering: N, iterations: u64, max_items: u32, max_weight: f64) -> Self {
        Self {
            numbering,
            budget: IterationBudget::new(iterations),
            policy: NextFitPolicy::OpenNewPack,
            max_items,
            max_weight,
            current: None,
            sealed: Vec::new(),
            halted: None,
        }
    }

    /// Sets the full-pack policy.
    pub fn with_policy(mut self, policy: NextFitPolicy) -> Self {
        self.policy = policy;
        self
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

            let added = match self.current.as_mut() {
                Some(pack) => pack.add_partial(item, remaining, self.max_items, self.max_weight),
                None => 0,
            };
            if added > 0 {
                remaining -= added;
                continue;
            }

            let had_pack = self.seal_current();
            if had_pack && self.policy == NextFitPolicy::SkipOnFull {
                log::trace!("next-fit: dropping {} units of item {}", remaining, item.id());
                return Flow::Continue;
            }

            match self.numbering.next_number() {
                Some(number) => self.current = Some(Pack::new(number)),
                None => {
                    self.halted = Some(Ceiling::Packs);
                    return Flow::Halt;
                }
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

    /// Moves the current pack, if non-empty, to the sealed list.
    fn seal_current(&mut self) -> bool {
        match self.current.take() {
            Some(pack) if !pack.is_empty() => {
                self.sealed.push(pack);
                true
            }
            _ => false,
        }
    }

    /// Takes the packs sealed so far, leaving the current pack open.
    pub fn drain_sealed(&mut self) -> std::vec::Drain<'_, Pack> {
        self.sealed.drain(..)
    }

    /// Returns true if a ceiling stopped this packer.
    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    pub(crate) fn ceiling(&self) -> Option<Ceiling> {
        self.halted
    }

    /// Seals the current pack and returns every pack not yet drained.
    pub fn finish(mut self) -> Vec<Pack> {
        self.seal_current();
        self.sealed
    }
}

/// Renumbers packs `1..=n` in their current order.
pub fn renumber_sequential(packs: &mut [Pack]) {
    for (index, pack) in packs.iter_mut().enumerate() {
        pack.renumber(index as u32 + 1);
    }
}
