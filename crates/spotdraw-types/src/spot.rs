//! Parking spot model.
//!
//! Spots are administrative input created before a draw. A spot may belong
//! to a pre-declared linked group (e.g., a paired double spot) which is only
//! ever assigned as a whole.

use serde::{Deserialize, Serialize};

use crate::{GroupId, Sector, SpotId, VehicleKind};

/// Whether the spot is under roof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum SpotCover {
    Covered,
    Uncovered,
}

impl std::fmt::Display for SpotCover {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Covered => write!(f, "COVERED"),
            Self::Uncovered => write!(f, "UNCOVERED"),
        }
    }
}

/// Physical size class of a spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum SpotSize {
    Standard,
    Large,
    Motorcycle,
}

impl std::fmt::Display for SpotSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "STANDARD"),
            Self::Large => write!(f, "LARGE"),
            Self::Motorcycle => write!(f, "MOTORCYCLE"),
        }
    }
}

/// A parking spot available for assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingSpot {
    pub id: SpotId,
    /// Painted code on the floor (e.g., "G1-07").
    pub code: String,
    /// Sector this spot belongs to; required for sector-mode draws.
    pub sector: Option<Sector>,
    pub cover: SpotCover,
    pub size: SpotSize,
    /// Linked-group membership. Spots sharing a group are assigned together
    /// or not at all.
    pub linked_group: Option<GroupId>,
}

impl ParkingSpot {
    /// Whether a vehicle of the given kind physically fits this spot.
    ///
    /// Large vehicles require large spots. Standard cars take standard or
    /// large spots, never motorcycle slots. Motorcycles fit anywhere.
    #[must_use]
    pub fn fits(&self, vehicle: VehicleKind) -> bool {
        match vehicle {
            VehicleKind::Large => self.size == SpotSize::Large,
            VehicleKind::Standard => self.size != SpotSize::Motorcycle,
            VehicleKind::Motorcycle => true,
        }
    }

    /// Whether this spot is the preferred size for the vehicle (used to rank
    /// candidates before falling back to merely-fitting spots).
    #[must_use]
    pub fn is_preferred_for(&self, vehicle: VehicleKind) -> bool {
        match vehicle {
            VehicleKind::Large => self.size == SpotSize::Large,
            VehicleKind::Standard => self.size == SpotSize::Standard,
            VehicleKind::Motorcycle => self.size == SpotSize::Motorcycle,
        }
    }

    #[must_use]
    pub fn is_linked(&self) -> bool {
        self.linked_group.is_some()
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl ParkingSpot {
    #[must_use]
    pub fn dummy(code: &str) -> Self {
        Self {
            id: SpotId::new(),
            code: code.to_string(),
            sector: None,
            cover: SpotCover::Uncovered,
            size: SpotSize::Standard,
            linked_group: None,
        }
    }

    #[must_use]
    pub fn dummy_sized(code: &str, size: SpotSize) -> Self {
        Self {
            size,
            ..Self::dummy(code)
        }
    }

    #[must_use]
    pub fn dummy_in_sector(code: &str, sector: &str) -> Self {
        Self {
            sector: Some(Sector::new(sector)),
            ..Self::dummy(code)
        }
    }

    #[must_use]
    pub fn dummy_linked(code: &str, group: GroupId) -> Self {
        Self {
            linked_group: Some(group),
            ..Self::dummy(code)
        }
    }
}
