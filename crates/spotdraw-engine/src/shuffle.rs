//! Seeded shuffle and tiered draw ordering.
//!
//! The shuffle is an explicit swap-based Fisher–Yates over a seedable RNG,
//! so a ceremony replayed with the same seed reproduces the exact draw
//! order. Priority tiers are shuffled independently and concatenated; the
//! only tie-break within a tier is the permutation itself.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spotdraw_types::{DrawOptions, Participant, PriorityTier};

/// Build the RNG for a draw from an explicit seed.
#[must_use]
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// In-place swap-based Fisher–Yates shuffle.
pub fn fisher_yates<T>(items: &mut [T], rng: &mut impl Rng) {
    if items.len() < 2 {
        return;
    }
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Produce the draw order: partition participants into priority tiers,
/// shuffle each tier, concatenate in tier order.
///
/// With `priority_enabled` off, everyone lands in one uniformly shuffled
/// tier. Tiers missing from `tier_order` fall behind the listed ones in
/// declaration order (PCD, Elderly, General); a tier listed more than once
/// counts only at its first position, so every participant appears exactly
/// once.
#[must_use]
pub fn draw_order<'a, I>(
    participants: I,
    options: &DrawOptions,
    rng: &mut impl Rng,
) -> Vec<&'a Participant>
where
    I: IntoIterator<Item = &'a Participant>,
{
    let all: Vec<&Participant> = participants.into_iter().collect();

    if !options.priority_enabled {
        let mut single = all;
        fisher_yates(&mut single, rng);
        return single;
    }

    let mut effective_order: Vec<PriorityTier> = Vec::with_capacity(3);
    for tier in options.tier_order.iter().copied().chain([
        PriorityTier::Pcd,
        PriorityTier::Elderly,
        PriorityTier::General,
    ]) {
        if !effective_order.contains(&tier) {
            effective_order.push(tier);
        }
    }

    let mut ordered = Vec::with_capacity(all.len());
    for tier in effective_order {
        let mut members: Vec<&Participant> = all
            .iter()
            .copied()
            .filter(|p| p.priority == tier)
            .collect();
        fisher_yates(&mut members, rng);
        ordered.extend(members);
    }
    ordered
}
