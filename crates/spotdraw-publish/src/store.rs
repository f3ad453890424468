//! Session persistence boundary.
//!
//! The engine itself never touches storage; callers hand finished sessions
//! to a [`SessionStore`]. The store keeps per-building history append-only:
//! a finalized session is never overwritten, corrections arrive as new
//! sessions.

use std::collections::HashMap;

use spotdraw_types::{BuildingId, LotterySession, Result, SessionId, SpotdrawError};
use tracing::debug;

/// Persistence collaborator for lottery sessions.
pub trait SessionStore {
    /// Persist a session. Saving a session whose ID is already stored in a
    /// finalized state is rejected — history is append-only.
    fn save_session(&mut self, session: &LotterySession) -> Result<()>;

    /// All sessions stored for a building, oldest first.
    fn load_sessions(&self, building: &BuildingId) -> Result<Vec<LotterySession>>;

    /// A single session by ID.
    fn load_session(&self, session_id: &SessionId) -> Result<LotterySession>;
}

/// In-memory reference store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    by_building: HashMap<BuildingId, Vec<LotterySession>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions stored across all buildings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_building.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemoryStore {
    fn save_session(&mut self, session: &LotterySession) -> Result<()> {
        let sessions = self.by_building.entry(session.building.clone()).or_default();

        if let Some(existing) = sessions.iter_mut().find(|s| s.id == session.id) {
            if existing.is_finalized() {
                return Err(SpotdrawError::SessionFinalized(session.id));
            }
            // In-progress snapshot update (choice mode persists as it goes).
            *existing = session.clone();
        } else {
            sessions.push(session.clone());
        }
        debug!(session = %session.id, building = %session.building, "session saved");
        Ok(())
    }

    fn load_sessions(&self, building: &BuildingId) -> Result<Vec<LotterySession>> {
        Ok(self.by_building.get(building).cloned().unwrap_or_default())
    }

    fn load_session(&self, session_id: &SessionId) -> Result<LotterySession> {
        self.by_building
            .values()
            .flatten()
            .find(|s| s.id == *session_id)
            .cloned()
            .ok_or(SpotdrawError::SessionNotFound(*session_id))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use spotdraw_types::{LotteryMode, LotteryResult, ParticipantId, SessionState};

    use super::*;

    fn make_session(building: &str, state: SessionState) -> LotterySession {
        LotterySession {
            id: SessionId::new(),
            building: BuildingId::new(building),
            mode: LotteryMode::General,
            seed: Some(1),
            state,
            results: vec![LotteryResult::unassigned(ParticipantId::new(), 0)],
            result_root: [0u8; 32],
            started_at: Utc::now(),
            finalized_at: None,
        }
    }

    #[test]
    fn save_and_load_roundtrip() {
        let mut store = MemoryStore::new();
        let session = make_session("b1", SessionState::Completed);
        store.save_session(&session).unwrap();

        let loaded = store.load_sessions(&BuildingId::new("b1")).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0], session);
        assert_eq!(store.load_session(&session.id).unwrap(), session);
    }

    #[test]
    fn buildings_are_isolated() {
        let mut store = MemoryStore::new();
        store
            .save_session(&make_session("b1", SessionState::Completed))
            .unwrap();
        store
            .save_session(&make_session("b2", SessionState::Completed))
            .unwrap();

        assert_eq!(store.load_sessions(&BuildingId::new("b1")).unwrap().len(), 1);
        assert_eq!(store.load_sessions(&BuildingId::new("b2")).unwrap().len(), 1);
        assert!(store.load_sessions(&BuildingId::new("b3")).unwrap().is_empty());
    }

    #[test]
    fn finalized_session_cannot_be_overwritten() {
        let mut store = MemoryStore::new();
        let session = make_session("b1", SessionState::Completed);
        store.save_session(&session).unwrap();

        let mut tampered = session.clone();
        tampered.results.clear();
        let err = store.save_session(&tampered).unwrap_err();
        assert!(matches!(err, SpotdrawError::SessionFinalized(id) if id == session.id));

        // Stored copy untouched.
        assert_eq!(store.load_session(&session.id).unwrap(), session);
    }

    #[test]
    fn in_progress_session_can_be_resaved() {
        let mut store = MemoryStore::new();
        let mut session = make_session("b1", SessionState::InProgress);
        store.save_session(&session).unwrap();

        session.results[0].spots.push(spotdraw_types::SpotId::new());
        store.save_session(&session).unwrap();

        let loaded = store.load_session(&session.id).unwrap();
        assert_eq!(loaded.results[0].spots.len(), 1);
        assert_eq!(store.len(), 1, "resave must not duplicate");
    }

    #[test]
    fn missing_session_reported() {
        let store = MemoryStore::new();
        let err = store.load_session(&SessionId::new()).unwrap_err();
        assert!(matches!(err, SpotdrawError::SessionNotFound(_)));
    }
}
