//! System-wide constants for the SpotDraw lottery engine.

use crate::PriorityTier;

/// Default tier draw ordering: PCD first, then elderly, then everyone else.
pub const DEFAULT_TIER_ORDER: [PriorityTier; 3] = [
    PriorityTier::Pcd,
    PriorityTier::Elderly,
    PriorityTier::General,
];

/// Maximum participants accepted in a single draw.
pub const MAX_PARTICIPANTS_PER_DRAW: usize = 10_000;

/// Maximum spots accepted in a single draw.
pub const MAX_SPOTS_PER_DRAW: usize = 10_000;

/// Default per-unit entitlement when none is registered.
pub const DEFAULT_ENTITLEMENT: u8 = 1;

/// Maximum per-unit entitlement (sanity bound on administrative input).
pub const MAX_ENTITLEMENT: u8 = 8;

/// Domain-separation prefix for the result-root hash.
pub const RESULT_ROOT_PREFIX: &[u8] = b"spotdraw:result_root:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "SpotDraw";
