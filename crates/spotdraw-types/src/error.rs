//! Error types for the SpotDraw lottery engine.
//!
//! All errors use the `SD_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Input / configuration errors
//! - 2xx: Draw errors
//! - 3xx: Choice-session pick errors
//! - 4xx: Session lifecycle errors
//! - 5xx: Store / publish errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{BuildingId, GroupId, ParticipantId, Sector, SessionId, SessionState, SpotId};

/// Central error enum for all SpotDraw operations.
///
/// Engine operations never partially mutate a session on failure: every
/// error here means the operation was fully rejected.
#[derive(Debug, Error)]
pub enum SpotdrawError {
    // =================================================================
    // Input / Configuration Errors (1xx)
    // =================================================================
    /// The draw inputs failed validation (empty participants, zero
    /// entitlement, etc.). Nothing was assigned.
    #[error("SD_ERR_100: Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// The same participant appears twice in the draw input.
    #[error("SD_ERR_101: Duplicate participant: {0}")]
    DuplicateParticipant(ParticipantId),

    /// The same spot appears twice in the pool input.
    #[error("SD_ERR_102: Duplicate spot: {0}")]
    DuplicateSpot(SpotId),

    /// A sector-mode draw found a participant or spot without a sector.
    #[error("SD_ERR_103: Missing sector on {what}")]
    MissingSector { what: String },

    // =================================================================
    // Draw Errors (2xx)
    // =================================================================
    /// The pool is smaller than the total entitlements. Informational —
    /// draws complete and record the shortfall as unassigned entries.
    #[error("SD_ERR_200: Insufficient spots: need {needed}, have {available}")]
    InsufficientSpots { needed: usize, available: usize },

    /// A sector has participants but no spots at all.
    #[error("SD_ERR_201: Empty sector: {0}")]
    EmptySector(Sector),

    // =================================================================
    // Choice-Session Pick Errors (3xx)
    // =================================================================
    /// A pick was attempted by a participant who does not hold the turn.
    #[error("SD_ERR_300: Out of turn: expected {expected}, got {got}")]
    OutOfTurn {
        expected: ParticipantId,
        got: ParticipantId,
    },

    /// The picked spot is already assigned.
    #[error("SD_ERR_301: Spot unavailable: {0}")]
    SpotUnavailable(SpotId),

    /// A linked-group assignment was attempted while not all members are
    /// free. Nothing was assigned.
    #[error("SD_ERR_302: Incomplete group: {group} has occupied members")]
    IncompleteGroup { group: GroupId },

    /// The participant already holds their full entitlement.
    #[error("SD_ERR_303: Entitlement exhausted for {participant}: limit {limit}")]
    EntitlementExhausted {
        participant: ParticipantId,
        limit: u8,
    },

    /// Undo was requested but no pick has been applied.
    #[error("SD_ERR_304: Nothing to undo")]
    NothingToUndo,

    /// A pick referenced a participant not in this session.
    #[error("SD_ERR_305: Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),

    /// A pick referenced a spot not in this session's pool.
    #[error("SD_ERR_306: Spot not found: {0}")]
    SpotNotFound(SpotId),

    // =================================================================
    // Session Lifecycle Errors (4xx)
    // =================================================================
    /// An operation was attempted in the wrong session state.
    #[error("SD_ERR_400: Wrong session state: expected {expected}, got {actual}")]
    WrongSessionState {
        expected: SessionState,
        actual: SessionState,
    },

    /// A mutation was attempted on a finalized (completed) session.
    #[error("SD_ERR_401: Session finalized: {0}")]
    SessionFinalized(SessionId),

    // =================================================================
    // Store / Publish Errors (5xx)
    // =================================================================
    /// The requested session was not found in the store.
    #[error("SD_ERR_500: Session not found: {0}")]
    SessionNotFound(SessionId),

    /// No results are published for this building.
    #[error("SD_ERR_501: Nothing published for {0}")]
    NotPublished(BuildingId),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("SD_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("SD_ERR_901: Serialization error: {0}")]
    Serialization(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SpotdrawError>;

impl From<serde_json::Error> for SpotdrawError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = SpotdrawError::SpotUnavailable(SpotId::new());
        let msg = format!("{err}");
        assert!(msg.starts_with("SD_ERR_301"), "Got: {msg}");
    }

    #[test]
    fn out_of_turn_display() {
        let expected = ParticipantId::new();
        let got = ParticipantId::new();
        let err = SpotdrawError::OutOfTurn { expected, got };
        let msg = format!("{err}");
        assert!(msg.contains("SD_ERR_300"));
        assert!(msg.contains(&expected.to_string()));
        assert!(msg.contains(&got.to_string()));
    }

    #[test]
    fn wrong_session_state_display() {
        let err = SpotdrawError::WrongSessionState {
            expected: SessionState::InProgress,
            actual: SessionState::Completed,
        };
        let msg = format!("{err}");
        assert!(msg.contains("SD_ERR_400"));
        assert!(msg.contains("IN_PROGRESS"));
        assert!(msg.contains("COMPLETED"));
    }

    #[test]
    fn all_errors_have_sd_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(SpotdrawError::InvalidConfiguration {
                reason: "test".into(),
            }),
            Box::new(SpotdrawError::NothingToUndo),
            Box::new(SpotdrawError::IncompleteGroup {
                group: GroupId::new(),
            }),
            Box::new(SpotdrawError::InsufficientSpots {
                needed: 5,
                available: 3,
            }),
            Box::new(SpotdrawError::Internal("test".into())),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("SD_ERR_"),
                "Error missing SD_ERR_ prefix: {msg}"
            );
        }
    }
}
