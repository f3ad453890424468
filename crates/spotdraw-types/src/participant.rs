//! Participant model for lottery draws.
//!
//! A [`Participant`] is an immutable input to a lottery run: one unit of the
//! building, with the priority flags and vehicle profile that drive draw
//! order and spot matching.

use serde::{Deserialize, Serialize};

use crate::{ParticipantId, Sector};

/// Priority tier of a participant within the draw order.
///
/// Priority tiers are drawn ahead of the general pool. The default ordering
/// is PCD > Elderly > General; see [`crate::DrawOptions::tier_order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum PriorityTier {
    /// Person with disability (reserved-spot legislation).
    Pcd,
    /// Elderly resident.
    Elderly,
    /// No priority flag.
    General,
}

impl std::fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pcd => write!(f, "PCD"),
            Self::Elderly => write!(f, "ELDERLY"),
            Self::General => write!(f, "GENERAL"),
        }
    }
}

impl PriorityTier {
    /// Whether this tier is drawn ahead of the general pool.
    #[must_use]
    pub fn is_priority(self) -> bool {
        self != Self::General
    }
}

/// The kind of vehicle a participant registers, which constrains the spots
/// they can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum VehicleKind {
    /// Regular car: fits standard or large spots.
    Standard,
    /// Oversized vehicle (SUV/pickup): fits large spots only.
    Large,
    /// Motorcycle: prefers motorcycle spots, fits any.
    Motorcycle,
}

impl std::fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "STANDARD"),
            Self::Large => write!(f, "LARGE"),
            Self::Motorcycle => write!(f, "MOTORCYCLE"),
        }
    }
}

/// A lottery participant: one unit of the building entered in the draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    /// Unit identifier (e.g., "Apt 302").
    pub unit: String,
    /// Resident name shown on published results.
    pub name: String,
    /// Priority tier for draw ordering.
    pub priority: PriorityTier,
    /// Vehicle kind, constrains spot matching.
    pub vehicle: VehicleKind,
    /// Number of spots this unit is entitled to receive (>= 1).
    pub entitlement: u8,
    /// Sector affiliation; required for sector-mode draws.
    pub sector: Option<Sector>,
}

impl Participant {
    /// Whether this participant carries a priority flag.
    #[must_use]
    pub fn is_priority(&self) -> bool {
        self.priority.is_priority()
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Participant {
    #[must_use]
    pub fn dummy(unit: &str) -> Self {
        Self {
            id: ParticipantId::new(),
            unit: unit.to_string(),
            name: format!("Resident {unit}"),
            priority: PriorityTier::General,
            vehicle: VehicleKind::Standard,
            entitlement: crate::constants::DEFAULT_ENTITLEMENT,
            sector: None,
        }
    }

    #[must_use]
    pub fn dummy_with_priority(unit: &str, priority: PriorityTier) -> Self {
        Self {
            priority,
            ..Self::dummy(unit)
        }
    }

    #[must_use]
    pub fn dummy_with_vehicle(unit: &str, vehicle: VehicleKind) -> Self {
        Self {
            vehicle,
            ..Self::dummy(unit)
        }
    }

    #[must_use]
    pub fn dummy_in_sector(unit: &str, sector: &str) -> Self {
        Self {
            sector: Some(Sector::new(sector)),
            ..Self::dummy(unit)
        }
    }
}
