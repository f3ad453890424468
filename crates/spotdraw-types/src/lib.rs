//! # spotdraw-types
//!
//! Shared types, errors, and configuration for the **SpotDraw** lottery engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`ParticipantId`], [`SpotId`], [`SessionId`], [`GroupId`], [`BuildingId`], [`Sector`]
//! - **Participant model**: [`Participant`], [`PriorityTier`], [`VehicleKind`]
//! - **Spot model**: [`ParkingSpot`], [`SpotCover`], [`SpotSize`]
//! - **Session model**: [`LotterySession`], [`LotteryMode`], [`SessionState`], [`LotteryResult`], [`DrawDigest`]
//! - **Configuration**: [`DrawOptions`]
//! - **Errors**: [`SpotdrawError`] with `SD_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod participant;
pub mod session;
pub mod spot;

// Re-export all primary types at crate root for ergonomic imports:
//   use spotdraw_types::{Participant, ParkingSpot, LotterySession, ...};

pub use config::*;
pub use error::*;
pub use ids::*;
pub use participant::*;
pub use session::*;
pub use spot::*;

// Constants are accessed via `spotdraw_types::constants::FOO`
// (not re-exported to avoid name collisions).
