//! The lottery runs: pure deterministic assignment.
//!
//! Each `run_*` function takes participants, spots, and options and returns
//! a finished [`LotterySession`] (or, for choice mode, a not-yet-started
//! one). No side effects: callers persist, publish, and export the result.
//!
//! ```text
//! run_general_lottery(building, participants, spots, options) -> LotterySession
//! ```
//!
//! ## Determinism Guarantee
//!
//! Given the same participants, spots, and seed, every run produces the
//! exact same result list and `result_root`. An unseeded run draws a seed
//! from ambient entropy and records it on the session, so any ceremony can
//! be replayed after the fact.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use rand::rngs::StdRng;
use spotdraw_types::{
    BuildingId, DrawOptions, LotteryMode, LotteryResult, LotterySession, ParkingSpot, Participant,
    ParticipantId, Result, Sector, SessionId, SessionState, SpotdrawError, constants,
};
use tracing::{debug, info, warn};

use crate::pool::SpotPool;
use crate::shuffle::{draw_order, seeded_rng};

/// Run a general lottery: tiered shuffle, then greedy assignment in draw
/// order.
///
/// Spots belonging to linked groups are not assignable in this mode (see
/// [`run_linked_lottery`]). An exhausted pool is not an error: remaining
/// participants are recorded unassigned.
///
/// # Errors
/// [`SpotdrawError::InvalidConfiguration`] / [`SpotdrawError::DuplicateParticipant`] /
/// [`SpotdrawError::DuplicateSpot`] on bad input; nothing is assigned in
/// that case.
pub fn run_general_lottery(
    building: &BuildingId,
    participants: &[Participant],
    spots: Vec<ParkingSpot>,
    options: &DrawOptions,
) -> Result<LotterySession> {
    validate_options(options)?;
    validate_participants(participants)?;
    let mut pool = SpotPool::new(spots)?;
    let (seed, mut rng) = resolve_seed(options);

    report_shortfall(participants, &pool);

    let order = draw_order(participants, options, &mut rng);
    let mut results = Vec::with_capacity(order.len());
    for (rank, participant) in order.iter().enumerate() {
        let rank = rank_u32(rank);
        results.push(assign_greedy(participant, rank, &mut pool, None, options));
    }

    let session = finish_session(building, LotteryMode::General, seed, results);
    info!(
        session = %session.id,
        mode = %session.mode,
        assigned = session.assigned_count(),
        unassigned = session.unassigned_count(),
        "lottery complete"
    );
    Ok(session)
}

/// Run a sector lottery: the general algorithm, independently per sector.
///
/// Every participant must carry a sector (directly or via `sector_map`) and
/// every spot must carry one; otherwise the run fails before any
/// assignment. A sector with participants but no spots yields unassigned
/// entries for that sector only; other sectors proceed unaffected.
///
/// # Errors
/// [`SpotdrawError::MissingSector`] when a participant or spot has no
/// sector; input-validation errors as in [`run_general_lottery`].
pub fn run_sector_lottery(
    building: &BuildingId,
    participants: &[Participant],
    spots: Vec<ParkingSpot>,
    sector_map: &HashMap<ParticipantId, Sector>,
    options: &DrawOptions,
) -> Result<LotterySession> {
    validate_options(options)?;
    validate_participants(participants)?;

    // Resolve and check sectors up front so nothing is partially applied.
    let mut by_sector: BTreeMap<Sector, Vec<&Participant>> = BTreeMap::new();
    for participant in participants {
        let sector = participant
            .sector
            .clone()
            .or_else(|| sector_map.get(&participant.id).cloned())
            .ok_or_else(|| SpotdrawError::MissingSector {
                what: format!("participant {} ({})", participant.id, participant.unit),
            })?;
        by_sector.entry(sector).or_default().push(participant);
    }
    for spot in &spots {
        if spot.sector.is_none() {
            return Err(SpotdrawError::MissingSector {
                what: format!("spot {} ({})", spot.id, spot.code),
            });
        }
    }

    let mut pool = SpotPool::new(spots)?;
    let (seed, mut rng) = resolve_seed(options);

    let mut results = Vec::with_capacity(participants.len());
    let mut rank = 0u32;
    for (sector, members) in &by_sector {
        if pool.free_in_sector(sector) == 0 {
            // Informational: the sector's participants go unassigned.
            warn!(
                participants = members.len(),
                "{}",
                SpotdrawError::EmptySector(sector.clone())
            );
        }

        let order = draw_order(members.iter().copied(), options, &mut rng);
        for participant in order {
            results.push(assign_greedy(
                participant,
                rank,
                &mut pool,
                Some(sector),
                options,
            ));
            rank += 1;
        }
    }

    let session = finish_session(building, LotteryMode::Sector, seed, results);
    info!(
        session = %session.id,
        mode = %session.mode,
        sectors = by_sector.len(),
        assigned = session.assigned_count(),
        "sector lottery complete"
    );
    Ok(session)
}

/// Run a linked lottery: linked groups (and unlinked singles) assigned as
/// whole units.
///
/// A group is only assigned when every member is free and fits the
/// participant's vehicle; partial assignment of a group never happens.
///
/// # Errors
/// Input-validation errors as in [`run_general_lottery`].
pub fn run_linked_lottery(
    building: &BuildingId,
    participants: &[Participant],
    spots: Vec<ParkingSpot>,
    options: &DrawOptions,
) -> Result<LotterySession> {
    validate_options(options)?;
    validate_participants(participants)?;
    let mut pool = SpotPool::new(spots)?;
    let (seed, mut rng) = resolve_seed(options);

    let order = draw_order(participants, options, &mut rng);
    let mut results = Vec::with_capacity(order.len());
    for (rank, participant) in order.iter().enumerate() {
        let rank = rank_u32(rank);
        let unit = pool.take_best_unit(
            participant.id,
            participant.vehicle,
            usize::from(participant.entitlement),
            None,
            options.prefer_covered,
        );
        let result = match unit {
            Some(unit) => {
                debug!(participant = %participant.id, rank, spots = unit.len(), "unit assigned");
                LotteryResult {
                    participant: participant.id,
                    spots: unit.into_iter().map(|s| s.id).collect(),
                    rank,
                }
            }
            None => {
                debug!(participant = %participant.id, rank, "no assignable unit remains");
                LotteryResult::unassigned(participant.id, rank)
            }
        };
        results.push(result);
    }

    let session = finish_session(building, LotteryMode::Linked, seed, results);
    info!(
        session = %session.id,
        mode = %session.mode,
        assigned = session.assigned_count(),
        "linked lottery complete"
    );
    Ok(session)
}

/// Run a choice lottery: produce the pick order only.
///
/// The returned session is `NotStarted` with every participant unassigned
/// at their drawn rank; the session plane applies the actual picks one at
/// a time.
///
/// # Errors
/// Input-validation errors as in [`run_general_lottery`].
pub fn run_choice_lottery(
    building: &BuildingId,
    participants: &[Participant],
    options: &DrawOptions,
) -> Result<LotterySession> {
    validate_options(options)?;
    validate_participants(participants)?;
    let (seed, mut rng) = resolve_seed(options);

    let order = draw_order(participants, options, &mut rng);
    let results = order
        .iter()
        .enumerate()
        .map(|(rank, p)| LotteryResult::unassigned(p.id, rank_u32(rank)))
        .collect();

    let session = LotterySession {
        id: SessionId::new(),
        building: building.clone(),
        mode: LotteryMode::Choice,
        seed: Some(seed),
        state: SessionState::NotStarted,
        results,
        result_root: [0u8; 32],
        started_at: Utc::now(),
        finalized_at: None,
    };
    info!(
        session = %session.id,
        mode = %session.mode,
        participants = session.results.len(),
        "choice order drawn"
    );
    Ok(session)
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn validate_options(options: &DrawOptions) -> Result<()> {
    for (i, tier) in options.tier_order.iter().enumerate() {
        if options.tier_order[..i].contains(tier) {
            return Err(SpotdrawError::InvalidConfiguration {
                reason: format!("tier {tier} listed twice in tier order"),
            });
        }
    }
    Ok(())
}

fn validate_participants(participants: &[Participant]) -> Result<()> {
    if participants.is_empty() {
        return Err(SpotdrawError::InvalidConfiguration {
            reason: "no participants".into(),
        });
    }
    if participants.len() > constants::MAX_PARTICIPANTS_PER_DRAW {
        return Err(SpotdrawError::InvalidConfiguration {
            reason: format!(
                "{} participants exceeds limit of {}",
                participants.len(),
                constants::MAX_PARTICIPANTS_PER_DRAW
            ),
        });
    }
    let mut seen = std::collections::HashSet::with_capacity(participants.len());
    for participant in participants {
        if !seen.insert(participant.id) {
            return Err(SpotdrawError::DuplicateParticipant(participant.id));
        }
        if participant.entitlement == 0 || participant.entitlement > constants::MAX_ENTITLEMENT {
            return Err(SpotdrawError::InvalidConfiguration {
                reason: format!(
                    "participant {} has entitlement {}, expected 1..={}",
                    participant.unit,
                    participant.entitlement,
                    constants::MAX_ENTITLEMENT
                ),
            });
        }
    }
    Ok(())
}

fn resolve_seed(options: &DrawOptions) -> (u64, StdRng) {
    let seed = options.seed.unwrap_or_else(rand::random);
    (seed, seeded_rng(seed))
}

/// Greedy per-participant assignment: up to `entitlement` spots, best
/// remaining match first. Partial entitlement coverage is kept.
fn assign_greedy(
    participant: &Participant,
    rank: u32,
    pool: &mut SpotPool,
    sector: Option<&Sector>,
    options: &DrawOptions,
) -> LotteryResult {
    let mut spots = Vec::new();
    for _ in 0..participant.entitlement {
        match pool.take_best(
            participant.id,
            participant.vehicle,
            sector,
            options.prefer_covered,
        ) {
            Some(spot) => spots.push(spot.id),
            None => break,
        }
    }

    if spots.is_empty() {
        debug!(participant = %participant.id, rank, "unassigned");
    } else {
        debug!(participant = %participant.id, rank, spots = spots.len(), "assigned");
    }
    LotteryResult {
        participant: participant.id,
        spots,
        rank,
    }
}

fn finish_session(
    building: &BuildingId,
    mode: LotteryMode,
    seed: u64,
    results: Vec<LotteryResult>,
) -> LotterySession {
    let result_root = crate::digest::compute_result_root(&results);
    LotterySession {
        id: SessionId::new(),
        building: building.clone(),
        mode,
        seed: Some(seed),
        state: SessionState::Completed,
        results,
        result_root,
        started_at: Utc::now(),
        finalized_at: Some(Utc::now()),
    }
}

fn report_shortfall(participants: &[Participant], pool: &SpotPool) {
    let needed: usize = participants
        .iter()
        .map(|p| usize::from(p.entitlement))
        .sum();
    let available = pool.free_count();
    if available < needed {
        // Informational: the draw still completes with unassigned entries.
        warn!(
            "{}",
            SpotdrawError::InsufficientSpots { needed, available }
        );
    }
}

#[allow(clippy::cast_possible_truncation)]
fn rank_u32(rank: usize) -> u32 {
    rank as u32
}
