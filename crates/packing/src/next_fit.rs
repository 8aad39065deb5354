//! Next-fit packing with an explicit full-pack policy.

use packplan_core::{Item, NextFitPolicy, Pack, PackStrategy, SafetyLimits};

use crate::packing_utils::{FirstFit, SequentialNumbering};

/// Considers only the most recently opened pack.
///
/// With [`NextFitPolicy::OpenNewPack`] placement is identical to
/// [`BlockingStrategy`](crate::BlockingStrategy). With
/// [`NextFitPolicy::SkipOnFull`] the remainder of an item that meets a full
/// pack is dropped, so quantity is not conserved.
#[derive(Debug, Clone, Default)]
pub struct NextFitStrategy {
    limits: SafetyLimits,
    policy: NextFitPolicy,
}

impl NextFitStrategy {
    /// Creates a next-fit strategy.
    pub fn new(limits: SafetyLimits, policy: NextFitPolicy) -> Self {
        Self { limits, policy }
    }

    /// Full-pack policy in effect.
    pub fn policy(&self) -> NextFitPolicy {
        self.policy
    }
}

impl PackStrategy for NextFitStrategy {
    fn pack_items(&self, items: &[Item], max_items: u32, max_weight: f64) -> Vec<Pack> {
        let mut packer = FirstFit::new(
            SequentialNumbering::new(self.limits.max_packs),
            self.limits.max_iterations,
            max_items,
            max_weight,
        )
        .with_policy(self.policy);
        packer.place_all(items);
        if let Some(ceiling) = packer.ceiling() {
            ceiling.warn("next-fit");
        }
        packer.finish()
    }

    fn name(&self) -> String {
        match self.policy {
            NextFitPolicy::OpenNewPack => "NextFit".to_string(),
            NextFitPolicy::SkipOnFull => "NextFit (skip on full)".to_string(),
        }
    }
}
