//! Result-root digests for reproducibility verification.
//!
//! A replayed ceremony (same participants, spots, and seed) must produce
//! the exact same result list. The `result_root` is an order-sensitive
//! SHA-256 commitment over the results that enables quick verification
//! without comparing full payloads — it is also what published results are
//! checked against by public viewers.

use sha2::{Digest, Sha256};
use spotdraw_types::{
    DrawDigest, LotteryResult, LotterySession, Result, SpotdrawError, constants,
};

/// Compute the result root over an ordered result list.
///
/// The hash depends on ranks, participant IDs, and assigned spot IDs, in
/// order. The same results in the same order always produce the same root.
#[must_use]
pub fn compute_result_root(results: &[LotteryResult]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(constants::RESULT_ROOT_PREFIX);
    hasher.update((results.len() as u64).to_le_bytes());

    for result in results {
        hasher.update(u64::from(result.rank).to_le_bytes());
        hasher.update(result.participant.0.as_bytes());
        hasher.update((result.spots.len() as u64).to_le_bytes());
        for spot in &result.spots {
            hasher.update(spot.0.as_bytes());
        }
    }

    let digest = hasher.finalize();
    let mut root = [0u8; 32];
    root.copy_from_slice(&digest);
    root
}

/// Verify that a result list matches an expected root.
#[must_use]
pub fn verify_result_root(results: &[LotteryResult], expected_root: &[u8; 32]) -> bool {
    compute_result_root(results) == *expected_root
}

/// Build the lightweight [`DrawDigest`] attestation for a completed session.
///
/// # Errors
/// Returns [`SpotdrawError::WrongSessionState`] if the session is not
/// completed yet.
pub fn make_digest(session: &LotterySession) -> Result<DrawDigest> {
    let Some(finalized_at) = session.finalized_at else {
        return Err(SpotdrawError::WrongSessionState {
            expected: spotdraw_types::SessionState::Completed,
            actual: session.state,
        });
    };
    Ok(DrawDigest {
        session_id: session.id,
        building: session.building.clone(),
        result_root: session.result_root,
        result_count: session.results.len(),
        finalized_at,
    })
}
