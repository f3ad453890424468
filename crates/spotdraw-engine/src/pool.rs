//! The spot pool: free/assigned tracking for one draw.
//!
//! Uses `BTreeMap` keyed by [`SpotId`] so candidate iteration is
//! deterministic for a given input set. Linked groups are tracked
//! separately and only ever taken whole.

use std::collections::{BTreeMap, HashMap};

use spotdraw_types::{
    GroupId, ParkingSpot, ParticipantId, Result, Sector, SpotCover, SpotId, SpotdrawError,
    VehicleKind, constants,
};

/// Free/assigned tracker for the spots of a single draw.
#[derive(Debug, Clone)]
pub struct SpotPool {
    /// All spots in the pool, keyed for deterministic iteration.
    spots: BTreeMap<SpotId, ParkingSpot>,
    /// Current assignments: `SpotId -> participant holding it`.
    assigned: HashMap<SpotId, ParticipantId>,
    /// Linked-group membership, members sorted by ID.
    groups: BTreeMap<GroupId, Vec<SpotId>>,
}

impl SpotPool {
    /// Build a pool from administrative spot input.
    ///
    /// # Errors
    /// Returns [`SpotdrawError::DuplicateSpot`] if the same spot ID appears
    /// twice, or [`SpotdrawError::InvalidConfiguration`] when the input
    /// exceeds [`constants::MAX_SPOTS_PER_DRAW`].
    pub fn new(spots: Vec<ParkingSpot>) -> Result<Self> {
        if spots.len() > constants::MAX_SPOTS_PER_DRAW {
            return Err(SpotdrawError::InvalidConfiguration {
                reason: format!(
                    "{} spots exceeds limit of {}",
                    spots.len(),
                    constants::MAX_SPOTS_PER_DRAW
                ),
            });
        }
        let mut map = BTreeMap::new();
        let mut groups: BTreeMap<GroupId, Vec<SpotId>> = BTreeMap::new();

        for spot in spots {
            if map.contains_key(&spot.id) {
                return Err(SpotdrawError::DuplicateSpot(spot.id));
            }
            if let Some(group) = spot.linked_group {
                groups.entry(group).or_default().push(spot.id);
            }
            map.insert(spot.id, spot);
        }
        for members in groups.values_mut() {
            members.sort_unstable();
        }

        Ok(Self {
            spots: map,
            assigned: HashMap::new(),
            groups,
        })
    }

    // =================================================================
    // Queries
    // =================================================================

    /// Total number of spots in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    /// Number of spots not yet assigned.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.spots.len() - self.assigned.len()
    }

    #[must_use]
    pub fn is_free(&self, spot_id: &SpotId) -> bool {
        self.spots.contains_key(spot_id) && !self.assigned.contains_key(spot_id)
    }

    #[must_use]
    pub fn contains(&self, spot_id: &SpotId) -> bool {
        self.spots.contains_key(spot_id)
    }

    #[must_use]
    pub fn spot(&self, spot_id: &SpotId) -> Option<&ParkingSpot> {
        self.spots.get(spot_id)
    }

    /// The participant currently holding a spot, if any.
    #[must_use]
    pub fn holder(&self, spot_id: &SpotId) -> Option<&ParticipantId> {
        self.assigned.get(spot_id)
    }

    /// Members of a linked group, sorted by spot ID.
    #[must_use]
    pub fn group_members(&self, group: &GroupId) -> Option<&[SpotId]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    /// Number of free spots carrying the given sector.
    #[must_use]
    pub fn free_in_sector(&self, sector: &Sector) -> usize {
        self.spots
            .values()
            .filter(|s| {
                !self.assigned.contains_key(&s.id) && s.sector.as_ref() == Some(sector)
            })
            .count()
    }

    // =================================================================
    // Greedy selection (for engine-run draws)
    // =================================================================

    /// Take the best free unlinked spot for a vehicle, if any.
    ///
    /// Candidate ranking is deterministic: spots of the vehicle's preferred
    /// size first, covered spots ahead of uncovered when `prefer_covered`,
    /// ties broken by spot ID. Linked spots are never taken singly.
    pub fn take_best(
        &mut self,
        participant: ParticipantId,
        vehicle: VehicleKind,
        sector: Option<&Sector>,
        prefer_covered: bool,
    ) -> Option<ParkingSpot> {
        let best = self.best_single(vehicle, sector, prefer_covered)?;
        self.assigned.insert(best, participant);
        self.spots.get(&best).cloned()
    }

    /// Best free unlinked fitting spot without taking it.
    fn best_single(
        &self,
        vehicle: VehicleKind,
        sector: Option<&Sector>,
        prefer_covered: bool,
    ) -> Option<SpotId> {
        self.spots
            .values()
            .filter(|s| {
                !self.assigned.contains_key(&s.id)
                    && s.linked_group.is_none()
                    && s.fits(vehicle)
                    && sector.is_none_or(|sec| s.sector.as_ref() == Some(sec))
            })
            .min_by_key(|s| Self::rank_key(s, vehicle, prefer_covered))
            .map(|s| s.id)
    }

    /// Take the best free assignable unit — a whole linked group or a
    /// singleton unlinked spot — whose size does not exceed `max_size`.
    ///
    /// Larger units are preferred so a multi-entitlement unit receives its
    /// bundle when one exists.
    pub fn take_best_unit(
        &mut self,
        participant: ParticipantId,
        vehicle: VehicleKind,
        max_size: usize,
        sector: Option<&Sector>,
        prefer_covered: bool,
    ) -> Option<Vec<ParkingSpot>> {
        // Candidate groups: fully free, every member fits, within max_size.
        let group_pick = self
            .groups
            .iter()
            .filter(|(_, members)| {
                members.len() <= max_size
                    && members.iter().all(|id| {
                        let spot = &self.spots[id];
                        !self.assigned.contains_key(id)
                            && spot.fits(vehicle)
                            && sector.is_none_or(|sec| spot.sector.as_ref() == Some(sec))
                    })
            })
            .min_by_key(|(group, members)| {
                let lead = &self.spots[&members[0]];
                (
                    usize::MAX - members.len(),
                    Self::rank_key(lead, vehicle, prefer_covered),
                    **group,
                )
            })
            .map(|(group, _)| *group);

        if let Some(group) = group_pick {
            let members = self.groups[&group].clone();
            // A multi-spot group uses the extra entitlement and wins
            // outright; a single-member group competes with the best
            // unlinked spot on the same fit/cover key.
            let group_wins = members.len() > 1
                || self
                    .best_single(vehicle, sector, prefer_covered)
                    .is_none_or(|single| {
                        Self::rank_key(&self.spots[&members[0]], vehicle, prefer_covered)
                            <= Self::rank_key(&self.spots[&single], vehicle, prefer_covered)
                    });
            if group_wins {
                for id in &members {
                    self.assigned.insert(*id, participant);
                }
                return Some(members.iter().map(|id| self.spots[id].clone()).collect());
            }
        }

        self.take_best(participant, vehicle, sector, prefer_covered)
            .map(|spot| vec![spot])
    }

    fn rank_key(spot: &ParkingSpot, vehicle: VehicleKind, prefer_covered: bool) -> (u8, u8, SpotId) {
        let size_rank = u8::from(!spot.is_preferred_for(vehicle));
        let cover_rank = if prefer_covered {
            u8::from(spot.cover != SpotCover::Covered)
        } else {
            0
        };
        (size_rank, cover_rank, spot.id)
    }

    // =================================================================
    // Explicit take / release (for choice-mode picks and undo)
    // =================================================================

    /// Assign a specific spot to a participant.
    ///
    /// # Errors
    /// - [`SpotdrawError::SpotNotFound`] if the spot is not in the pool.
    /// - [`SpotdrawError::SpotUnavailable`] if it is already assigned.
    pub fn take(&mut self, spot_id: &SpotId, participant: ParticipantId) -> Result<()> {
        if !self.spots.contains_key(spot_id) {
            return Err(SpotdrawError::SpotNotFound(*spot_id));
        }
        if self.assigned.contains_key(spot_id) {
            return Err(SpotdrawError::SpotUnavailable(*spot_id));
        }
        self.assigned.insert(*spot_id, participant);
        Ok(())
    }

    /// Assign a whole linked group, all-or-nothing.
    ///
    /// # Errors
    /// - [`SpotdrawError::IncompleteGroup`] if any member is occupied;
    ///   no member is assigned in that case.
    pub fn take_group(&mut self, group: &GroupId, participant: ParticipantId) -> Result<Vec<SpotId>> {
        let members = self
            .groups
            .get(group)
            .ok_or_else(|| SpotdrawError::InvalidConfiguration {
                reason: format!("unknown linked group {group}"),
            })?
            .clone();

        if members.iter().any(|id| self.assigned.contains_key(id)) {
            return Err(SpotdrawError::IncompleteGroup { group: *group });
        }

        for id in &members {
            self.assigned.insert(*id, participant);
        }
        Ok(members)
    }

    /// Return an assigned spot to the free pool (undo).
    ///
    /// # Errors
    /// Returns [`SpotdrawError::SpotNotFound`] for unknown spots; releasing
    /// an already-free spot is a no-op.
    pub fn release(&mut self, spot_id: &SpotId) -> Result<()> {
        if !self.spots.contains_key(spot_id) {
            return Err(SpotdrawError::SpotNotFound(*spot_id));
        }
        self.assigned.remove(spot_id);
        Ok(())
    }

    /// Release every assignment (session reset).
    pub fn release_all(&mut self) {
        self.assigned.clear();
    }
}

#[cfg(test)]
mod tests {
    use spotdraw_types::{ParticipantId, SpotSize};

    use super::*;

    #[test]
    fn duplicate_spot_rejected() {
        let spot = ParkingSpot::dummy("A1");
        let dup = spot.clone();
        let result = SpotPool::new(vec![spot, dup]);
        assert!(matches!(result, Err(SpotdrawError::DuplicateSpot(_))));
    }

    #[test]
    fn take_best_prefers_exact_size() {
        let large = ParkingSpot::dummy_sized("L1", SpotSize::Large);
        let standard = ParkingSpot::dummy("S1");
        let standard_id = standard.id;
        let mut pool = SpotPool::new(vec![large, standard]).unwrap();

        let picked = pool
            .take_best(ParticipantId::new(), VehicleKind::Standard, None, true)
            .unwrap();
        assert_eq!(picked.id, standard_id);
    }

    #[test]
    fn take_best_falls_back_when_preferred_gone() {
        let large = ParkingSpot::dummy_sized("L1", SpotSize::Large);
        let large_id = large.id;
        let mut pool = SpotPool::new(vec![large]).unwrap();

        // Standard car falls back to the large spot.
        let picked = pool
            .take_best(ParticipantId::new(), VehicleKind::Standard, None, true)
            .unwrap();
        assert_eq!(picked.id, large_id);
        assert_eq!(pool.free_count(), 0);
    }

    #[test]
    fn take_best_respects_sector_filter() {
        let a = ParkingSpot::dummy_in_sector("A1", "A");
        let b = ParkingSpot::dummy_in_sector("B1", "B");
        let b_id = b.id;
        let mut pool = SpotPool::new(vec![a, b]).unwrap();

        let sector_b = Sector::new("B");
        let picked = pool
            .take_best(
                ParticipantId::new(),
                VehicleKind::Standard,
                Some(&sector_b),
                true,
            )
            .unwrap();
        assert_eq!(picked.id, b_id);
    }

    #[test]
    fn take_best_never_takes_linked_spot() {
        let group = GroupId::new();
        let linked = ParkingSpot::dummy_linked("D1", group);
        let mut pool = SpotPool::new(vec![linked]).unwrap();

        let picked = pool.take_best(ParticipantId::new(), VehicleKind::Standard, None, true);
        assert!(picked.is_none());
    }

    #[test]
    fn take_occupied_spot_rejected() {
        let spot = ParkingSpot::dummy("A1");
        let id = spot.id;
        let mut pool = SpotPool::new(vec![spot]).unwrap();

        pool.take(&id, ParticipantId::new()).unwrap();
        let err = pool.take(&id, ParticipantId::new()).unwrap_err();
        assert!(matches!(err, SpotdrawError::SpotUnavailable(s) if s == id));
    }

    #[test]
    fn take_unknown_spot_rejected() {
        let mut pool = SpotPool::new(vec![ParkingSpot::dummy("A1")]).unwrap();
        let err = pool.take(&SpotId::new(), ParticipantId::new()).unwrap_err();
        assert!(matches!(err, SpotdrawError::SpotNotFound(_)));
    }

    #[test]
    fn group_take_is_all_or_nothing() {
        let group = GroupId::new();
        let d1 = ParkingSpot::dummy_linked("D1", group);
        let d2 = ParkingSpot::dummy_linked("D2", group);
        let d1_id = d1.id;
        let d2_id = d2.id;
        let mut pool = SpotPool::new(vec![d1, d2]).unwrap();

        // Pre-occupy one member; the whole group must be refused.
        pool.take(&d1_id, ParticipantId::new()).unwrap();
        let err = pool.take_group(&group, ParticipantId::new()).unwrap_err();
        assert!(matches!(err, SpotdrawError::IncompleteGroup { group: g } if g == group));
        assert!(pool.is_free(&d2_id), "untouched member must stay free");
    }

    #[test]
    fn group_take_assigns_every_member() {
        let group = GroupId::new();
        let d1 = ParkingSpot::dummy_linked("D1", group);
        let d2 = ParkingSpot::dummy_linked("D2", group);
        let mut pool = SpotPool::new(vec![d1, d2]).unwrap();

        let holder = ParticipantId::new();
        let members = pool.take_group(&group, holder).unwrap();
        assert_eq!(members.len(), 2);
        for id in &members {
            assert_eq!(pool.holder(id), Some(&holder));
        }
    }

    #[test]
    fn take_best_unit_prefers_group_for_multi_entitlement() {
        let group = GroupId::new();
        let d1 = ParkingSpot::dummy_linked("D1", group);
        let d2 = ParkingSpot::dummy_linked("D2", group);
        let single = ParkingSpot::dummy("S1");
        let mut pool = SpotPool::new(vec![d1, d2, single]).unwrap();

        let unit = pool
            .take_best_unit(ParticipantId::new(), VehicleKind::Standard, 2, None, true)
            .unwrap();
        assert_eq!(unit.len(), 2, "pair should win for entitlement 2");
    }

    #[test]
    fn take_best_unit_singleton_for_single_entitlement() {
        let group = GroupId::new();
        let d1 = ParkingSpot::dummy_linked("D1", group);
        let d2 = ParkingSpot::dummy_linked("D2", group);
        let single = ParkingSpot::dummy("S1");
        let single_id = single.id;
        let mut pool = SpotPool::new(vec![d1, d2, single]).unwrap();

        let unit = pool
            .take_best_unit(ParticipantId::new(), VehicleKind::Standard, 1, None, true)
            .unwrap();
        assert_eq!(unit.len(), 1);
        assert_eq!(unit[0].id, single_id);
    }

    #[test]
    fn lone_group_loses_to_better_fitting_single() {
        let group = GroupId::new();
        let linked = ParkingSpot::dummy_linked("D1", group);
        let moto = ParkingSpot::dummy_sized("M1", SpotSize::Motorcycle);
        let moto_id = moto.id;
        let mut pool = SpotPool::new(vec![linked, moto]).unwrap();

        // The motorcycle slot is the preferred size; the standard-size
        // single-member group must not outrank it.
        let unit = pool
            .take_best_unit(ParticipantId::new(), VehicleKind::Motorcycle, 1, None, true)
            .unwrap();
        assert_eq!(unit.len(), 1);
        assert_eq!(unit[0].id, moto_id);
    }

    #[test]
    fn lone_group_wins_when_it_ranks_better() {
        let group = GroupId::new();
        let linked = ParkingSpot {
            size: SpotSize::Motorcycle,
            ..ParkingSpot::dummy_linked("D1", group)
        };
        let linked_id = linked.id;
        let standard = ParkingSpot::dummy("S1");
        let mut pool = SpotPool::new(vec![linked, standard]).unwrap();

        let unit = pool
            .take_best_unit(ParticipantId::new(), VehicleKind::Motorcycle, 1, None, true)
            .unwrap();
        assert_eq!(unit.len(), 1);
        assert_eq!(unit[0].id, linked_id);
    }

    #[test]
    fn lone_group_taken_when_no_single_remains() {
        let group = GroupId::new();
        let linked = ParkingSpot::dummy_linked("D1", group);
        let linked_id = linked.id;
        let mut pool = SpotPool::new(vec![linked]).unwrap();

        let unit = pool
            .take_best_unit(ParticipantId::new(), VehicleKind::Standard, 2, None, true)
            .unwrap();
        assert_eq!(unit.len(), 1);
        assert_eq!(unit[0].id, linked_id);
    }

    #[test]
    fn release_returns_spot_to_pool() {
        let spot = ParkingSpot::dummy("A1");
        let id = spot.id;
        let mut pool = SpotPool::new(vec![spot]).unwrap();

        pool.take(&id, ParticipantId::new()).unwrap();
        assert!(!pool.is_free(&id));
        pool.release(&id).unwrap();
        assert!(pool.is_free(&id));
        assert_eq!(pool.free_count(), 1);
    }

    #[test]
    fn release_all_resets_assignments() {
        let a = ParkingSpot::dummy("A1");
        let b = ParkingSpot::dummy("A2");
        let a_id = a.id;
        let b_id = b.id;
        let mut pool = SpotPool::new(vec![a, b]).unwrap();

        pool.take(&a_id, ParticipantId::new()).unwrap();
        pool.take(&b_id, ParticipantId::new()).unwrap();
        pool.release_all();
        assert_eq!(pool.free_count(), 2);
    }
}
