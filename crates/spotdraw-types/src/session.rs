//! Session lifecycle types for lottery ceremonies.
//!
//! One [`LotterySession`] per ceremony run. A session is created when a draw
//! starts, mutated only during the run (choice mode applies picks one at a
//! time), and becomes immutable once completed. Corrections require a new
//! session — finalized result lists are never edited in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BuildingId, ParticipantId, SessionId, SpotId};

/// The assignment mode of a ceremony.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LotteryMode {
    /// Engine assigns spots greedily in draw order.
    General,
    /// General draw run independently per sector.
    Sector,
    /// Engine draws order only; participants pick spots themselves.
    Choice,
    /// Linked groups assigned as whole units.
    Linked,
}

impl std::fmt::Display for LotteryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::General => write!(f, "GENERAL"),
            Self::Sector => write!(f, "SECTOR"),
            Self::Choice => write!(f, "CHOICE"),
            Self::Linked => write!(f, "LINKED"),
        }
    }
}

/// Lifecycle state of a session.
///
/// `NotStarted → InProgress → Completed`; a completed session is immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Completed,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotStarted => write!(f, "NOT_STARTED"),
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Completed => write!(f, "COMPLETED"),
        }
    }
}

/// One entry of the ordered result list.
///
/// `rank` is the 0-based draw position; it determines assignment order and,
/// in choice mode, pick priority. An empty `spots` list means the
/// participant went unassigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotteryResult {
    pub participant: ParticipantId,
    pub spots: Vec<SpotId>,
    pub rank: u32,
}

impl LotteryResult {
    /// A placeholder entry for a participant that has not (yet) received
    /// any spot.
    #[must_use]
    pub fn unassigned(participant: ParticipantId, rank: u32) -> Self {
        Self {
            participant,
            spots: Vec::new(),
            rank,
        }
    }

    #[must_use]
    pub fn is_assigned(&self) -> bool {
        !self.spots.is_empty()
    }
}

/// One ceremony run: the ordered result list plus run metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotterySession {
    pub id: SessionId,
    pub building: BuildingId,
    pub mode: LotteryMode,
    /// The seed the shuffle ran with, recorded for reproducibility. The
    /// engine always fills this in, even when the caller left the seed to
    /// ambient entropy.
    pub seed: Option<u64>,
    pub state: SessionState,
    /// Ordered by rank.
    pub results: Vec<LotteryResult>,
    /// SHA-256 commitment over the result list; zero until completed.
    pub result_root: [u8; 32],
    pub started_at: DateTime<Utc>,
    pub finalized_at: Option<DateTime<Utc>>,
}

impl LotterySession {
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.state == SessionState::Completed
    }

    /// Number of participants that received at least one spot.
    #[must_use]
    pub fn assigned_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_assigned()).count()
    }

    /// Number of participants that received nothing.
    #[must_use]
    pub fn unassigned_count(&self) -> usize {
        self.results.len() - self.assigned_count()
    }

    /// The result entry for a given participant, if present.
    #[must_use]
    pub fn result_for(&self, participant: &ParticipantId) -> Option<&LotteryResult> {
        self.results.iter().find(|r| r.participant == *participant)
    }
}

// ---------------------------------------------------------------------------
// DrawDigest — lightweight attestation of a completed session
// ---------------------------------------------------------------------------

/// Lightweight attestation of a completed session.
///
/// Contains only metadata and the result root, not the full result list.
/// Public viewers can verify a fetched result list against the digest
/// without trusting the publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawDigest {
    pub session_id: SessionId,
    pub building: BuildingId,
    /// Must match `LotterySession::result_root`.
    pub result_root: [u8; 32],
    pub result_count: usize,
    pub finalized_at: DateTime<Utc>,
}

impl DrawDigest {
    /// Hex rendering of the result root for display on public pages.
    #[must_use]
    pub fn root_hex(&self) -> String {
        hex::encode(self.result_root)
    }
}
