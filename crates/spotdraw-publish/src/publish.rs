//! Public result publishing.
//!
//! A completed session can be published under its building ID so
//! unauthenticated viewers (the shared result page) can fetch it. The
//! published payload carries the [`DrawDigest`] so viewers can verify the
//! result list against the result root without trusting the channel.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use spotdraw_engine::{make_digest, verify_result_root};
use spotdraw_types::{
    BuildingId, DrawDigest, LotteryResult, LotterySession, Result, SessionState, SpotdrawError,
};
use tracing::info;

/// The publicly fetchable shape: result list plus its attestation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedResults {
    pub digest: DrawDigest,
    pub results: Vec<LotteryResult>,
}

impl PublishedResults {
    /// Whether the result list matches the digest's root.
    #[must_use]
    pub fn verify(&self) -> bool {
        verify_result_root(&self.results, &self.digest.result_root)
    }
}

/// Publishing collaborator: makes a session's results readable by
/// unauthenticated viewers, keyed by building.
pub trait ResultPublisher {
    /// Publish a completed session for its building, replacing any prior
    /// publication for that building.
    fn publish_results(&mut self, building: &BuildingId, session: &LotterySession) -> Result<()>;

    /// Remove the publication for a building.
    fn clear_published_results(&mut self, building: &BuildingId) -> Result<()>;

    /// Fetch what a public viewer would see.
    fn fetch_published(&self, building: &BuildingId) -> Result<PublishedResults>;
}

/// In-memory reference publisher.
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    published: HashMap<BuildingId, PublishedResults>,
}

impl MemoryPublisher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_published(&self, building: &BuildingId) -> bool {
        self.published.contains_key(building)
    }
}

impl ResultPublisher for MemoryPublisher {
    fn publish_results(&mut self, building: &BuildingId, session: &LotterySession) -> Result<()> {
        if session.state != SessionState::Completed {
            return Err(SpotdrawError::WrongSessionState {
                expected: SessionState::Completed,
                actual: session.state,
            });
        }
        let digest = make_digest(session)?;
        info!(
            %building,
            session = %session.id,
            root = %digest.root_hex(),
            "results published"
        );
        self.published.insert(
            building.clone(),
            PublishedResults {
                digest,
                results: session.results.clone(),
            },
        );
        Ok(())
    }

    fn clear_published_results(&mut self, building: &BuildingId) -> Result<()> {
        if self.published.remove(building).is_none() {
            return Err(SpotdrawError::NotPublished(building.clone()));
        }
        info!(%building, "published results cleared");
        Ok(())
    }

    fn fetch_published(&self, building: &BuildingId) -> Result<PublishedResults> {
        self.published
            .get(building)
            .cloned()
            .ok_or_else(|| SpotdrawError::NotPublished(building.clone()))
    }
}
