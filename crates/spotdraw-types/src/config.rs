//! Draw configuration.

use serde::{Deserialize, Serialize};

use crate::{PriorityTier, constants};

/// Options controlling a single draw.
///
/// The engine is a pure function of participants, spots, and these options;
/// there is no ambient state. Fixing `seed` makes the run reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawOptions {
    /// Explicit shuffle seed. `None` draws a seed from ambient entropy and
    /// records it on the session so the ceremony can still be replayed.
    pub seed: Option<u64>,
    /// Whether priority tiers are ordered ahead of the general pool.
    /// Disabled, everyone lands in a single shuffled tier.
    pub priority_enabled: bool,
    /// Tier draw ordering, first tier drawn first. Tiers not listed fall
    /// back behind the listed ones in declaration order.
    pub tier_order: Vec<PriorityTier>,
    /// Prefer covered spots when several candidates fit equally well.
    pub prefer_covered: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            seed: None,
            priority_enabled: true,
            tier_order: constants::DEFAULT_TIER_ORDER.to_vec(),
            prefer_covered: true,
        }
    }
}

impl DrawOptions {
    /// Reproducible options with a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Options with priority tiers disabled (single uniform draw).
    #[must_use]
    pub fn without_priority(mut self) -> Self {
        self.priority_enabled = false;
        self
    }
}
