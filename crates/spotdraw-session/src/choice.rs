//! The choice-mode session: participants pick their own spots in drawn
//! order.
//!
//! Picks are applied one at a time by the operator. Every operation
//! validates fully before mutating anything, so a rejected pick leaves the
//! session unchanged — callers can rely on snapshot equality after any
//! error.

use chrono::Utc;
use std::collections::HashMap;

use spotdraw_engine::{SpotPool, compute_result_root};
use spotdraw_types::{
    LotteryMode, LotterySession, ParkingSpot, Participant, ParticipantId, Result, SessionState,
    SpotId, SpotdrawError,
};
use tracing::{debug, info};

use crate::journal::{PickEntry, PickJournal};

/// A running choice-mode ceremony: the drawn order plus the live spot pool
/// and the turn pointer.
#[derive(Debug)]
pub struct ChoiceSession {
    session: LotterySession,
    pool: SpotPool,
    participants: HashMap<ParticipantId, Participant>,
    /// Index into `session.results`; the participant at this index holds
    /// the turn.
    turn: usize,
    journal: PickJournal,
}

impl ChoiceSession {
    /// Wrap a freshly drawn choice session with its participants and pool.
    ///
    /// # Errors
    /// - [`SpotdrawError::InvalidConfiguration`] if the session is not
    ///   choice-mode or references a participant not supplied.
    /// - [`SpotdrawError::WrongSessionState`] unless the session is
    ///   `NotStarted`.
    /// - [`SpotdrawError::DuplicateSpot`] from pool construction.
    pub fn new(
        session: LotterySession,
        participants: Vec<Participant>,
        spots: Vec<ParkingSpot>,
    ) -> Result<Self> {
        if session.mode != LotteryMode::Choice {
            return Err(SpotdrawError::InvalidConfiguration {
                reason: format!("expected CHOICE session, got {}", session.mode),
            });
        }
        if session.state != SessionState::NotStarted {
            return Err(SpotdrawError::WrongSessionState {
                expected: SessionState::NotStarted,
                actual: session.state,
            });
        }

        let participants: HashMap<ParticipantId, Participant> =
            participants.into_iter().map(|p| (p.id, p)).collect();
        for result in &session.results {
            if !participants.contains_key(&result.participant) {
                return Err(SpotdrawError::ParticipantNotFound(result.participant));
            }
        }

        let pool = SpotPool::new(spots)?;
        Ok(Self {
            session,
            pool,
            participants,
            turn: 0,
            journal: PickJournal::new(),
        })
    }

    // =================================================================
    // Queries
    // =================================================================

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session.state
    }

    /// The participant currently holding the turn, if the session is live.
    #[must_use]
    pub fn current_turn(&self) -> Option<ParticipantId> {
        if self.session.state != SessionState::InProgress {
            return None;
        }
        self.session.results.get(self.turn).map(|r| r.participant)
    }

    /// Number of spots still free in the pool.
    #[must_use]
    pub fn free_spots(&self) -> usize {
        self.pool.free_count()
    }

    /// Read access to the underlying session (for snapshots and display).
    #[must_use]
    pub fn session(&self) -> &LotterySession {
        &self.session
    }

    /// Consume the wrapper, returning the session for persistence.
    #[must_use]
    pub fn into_session(self) -> LotterySession {
        self.session
    }

    // =================================================================
    // Transitions
    // =================================================================

    /// Begin the ceremony: `NotStarted → InProgress` at the first turn.
    ///
    /// # Errors
    /// [`SpotdrawError::WrongSessionState`] unless `NotStarted`.
    pub fn start(&mut self) -> Result<()> {
        self.expect_state(SessionState::NotStarted)?;
        self.session.state = SessionState::InProgress;
        self.turn = 0;
        info!(session = %self.session.id, turns = self.session.results.len(), "choice session started");
        Ok(())
    }

    /// Apply one pick for the current turn.
    ///
    /// Picking any member of a linked group takes the whole group. The turn
    /// advances once the participant's entitlement is filled; the session
    /// auto-completes after the last turn.
    ///
    /// # Errors
    /// - [`SpotdrawError::OutOfTurn`] when `participant` does not hold the
    ///   turn.
    /// - [`SpotdrawError::SpotUnavailable`] / [`SpotdrawError::SpotNotFound`]
    ///   for occupied or unknown spots.
    /// - [`SpotdrawError::IncompleteGroup`] when the spot's linked group is
    ///   partially occupied.
    /// - [`SpotdrawError::EntitlementExhausted`] when the pick would exceed
    ///   the participant's entitlement.
    ///
    /// The session is unchanged on every error.
    pub fn pick_spot(&mut self, participant: ParticipantId, spot_id: SpotId) -> Result<()> {
        self.expect_in_progress()?;
        let expected = self.session.results[self.turn].participant;
        if participant != expected {
            return Err(SpotdrawError::OutOfTurn {
                expected,
                got: participant,
            });
        }

        let spot = self
            .pool
            .spot(&spot_id)
            .ok_or(SpotdrawError::SpotNotFound(spot_id))?;
        if !self.pool.is_free(&spot_id) {
            return Err(SpotdrawError::SpotUnavailable(spot_id));
        }

        // Resolve the full set of spots this pick takes before mutating.
        let group = spot.linked_group;
        let pick_size = match group {
            Some(g) => self
                .pool
                .group_members(&g)
                .map_or(1, <[SpotId]>::len),
            None => 1,
        };

        let entitlement = self.entitlement_of(participant)?;
        let held = self.session.results[self.turn].spots.len();
        if held + pick_size > usize::from(entitlement) {
            return Err(SpotdrawError::EntitlementExhausted {
                participant,
                limit: entitlement,
            });
        }

        // All checks passed; apply. Group take validates residual occupancy
        // atomically itself.
        let taken: Vec<SpotId> = match group {
            Some(g) => self.pool.take_group(&g, participant)?,
            None => {
                self.pool.take(&spot_id, participant)?;
                vec![spot_id]
            }
        };

        let result = &mut self.session.results[self.turn];
        result.spots.extend(taken.iter().copied());
        self.journal.push(PickEntry {
            participant,
            spots: taken.clone(),
            turn: self.turn,
        });
        debug!(
            session = %self.session.id,
            %participant,
            spots = taken.len(),
            turn = self.turn,
            "pick applied"
        );

        if self.session.results[self.turn].spots.len() >= usize::from(entitlement) {
            self.advance_turn();
        }
        Ok(())
    }

    /// Skip the current turn (operator-recorded no-show or timeout).
    ///
    /// # Errors
    /// [`SpotdrawError::WrongSessionState`] unless `InProgress`.
    pub fn skip_turn(&mut self) -> Result<ParticipantId> {
        self.expect_in_progress()?;
        let skipped = self.session.results[self.turn].participant;
        debug!(session = %self.session.id, participant = %skipped, turn = self.turn, "turn skipped");
        self.advance_turn();
        Ok(skipped)
    }

    /// Undo the newest pick: spots return to the pool and the turn pointer
    /// rewinds to the undone pick's turn.
    ///
    /// # Errors
    /// - [`SpotdrawError::NothingToUndo`] with an empty journal.
    /// - [`SpotdrawError::WrongSessionState`] unless `InProgress`.
    pub fn undo_last_pick(&mut self) -> Result<()> {
        self.expect_in_progress()?;
        let entry = self.journal.pop().ok_or(SpotdrawError::NothingToUndo)?;

        for spot_id in &entry.spots {
            self.pool.release(spot_id)?;
        }
        let result = &mut self.session.results[entry.turn];
        result.spots.truncate(result.spots.len() - entry.spots.len());
        self.turn = entry.turn;
        debug!(
            session = %self.session.id,
            participant = %entry.participant,
            turn = entry.turn,
            "pick undone"
        );
        Ok(())
    }

    /// End the ceremony early (or confirm its natural end): seals the
    /// result root and finalizes.
    ///
    /// # Errors
    /// [`SpotdrawError::WrongSessionState`] unless `InProgress`.
    pub fn finish(&mut self) -> Result<()> {
        self.expect_in_progress()?;
        self.finalize();
        Ok(())
    }

    /// Operator abort: every pick undone, pool restored, back to
    /// `NotStarted`.
    ///
    /// # Errors
    /// [`SpotdrawError::SessionFinalized`] once the session completed.
    pub fn reset(&mut self) -> Result<()> {
        if self.session.state == SessionState::Completed {
            return Err(SpotdrawError::SessionFinalized(self.session.id));
        }
        self.pool.release_all();
        for result in &mut self.session.results {
            result.spots.clear();
        }
        self.journal.clear();
        self.turn = 0;
        self.session.state = SessionState::NotStarted;
        info!(session = %self.session.id, "choice session reset");
        Ok(())
    }

    // =================================================================
    // Internals
    // =================================================================

    fn advance_turn(&mut self) {
        self.turn += 1;
        if self.turn >= self.session.results.len() {
            self.finalize();
        }
    }

    fn finalize(&mut self) {
        self.session.state = SessionState::Completed;
        self.session.finalized_at = Some(Utc::now());
        self.session.result_root = compute_result_root(&self.session.results);
        info!(
            session = %self.session.id,
            assigned = self.session.assigned_count(),
            unassigned = self.session.unassigned_count(),
            "choice session completed"
        );
    }

    fn entitlement_of(&self, participant: ParticipantId) -> Result<u8> {
        self.participants
            .get(&participant)
            .map(|p| p.entitlement)
            .ok_or(SpotdrawError::ParticipantNotFound(participant))
    }

    fn expect_state(&self, expected: SessionState) -> Result<()> {
        if self.session.state == expected {
            Ok(())
        } else {
            Err(SpotdrawError::WrongSessionState {
                expected,
                actual: self.session.state,
            })
        }
    }

    fn expect_in_progress(&self) -> Result<()> {
        match self.session.state {
            SessionState::InProgress => Ok(()),
            SessionState::Completed => Err(SpotdrawError::SessionFinalized(self.session.id)),
            SessionState::NotStarted => Err(SpotdrawError::WrongSessionState {
                expected: SessionState::InProgress,
                actual: SessionState::NotStarted,
            }),
        }
    }
}
