//! # spotdraw-session
//!
//! **Choice-mode session state machine for SpotDraw.**
//!
//! The engine draws the pick order; this crate applies the actual picks,
//! one at a time, as the operator walks the ceremony:
//!
//! - **Serialized operations**: one pick/skip/undo at a time, no two
//!   processed concurrently within a session
//! - **Atomic**: every operation is fully applied or fully rejected —
//!   a rejected operation leaves the session bit-for-bit unchanged
//! - **Undoable**: the pick journal supports operator undo and full reset
//!
//! Lifecycle: `NotStarted → InProgress → Completed`; a completed session
//! is immutable.

pub mod choice;
pub mod journal;

pub use choice::ChoiceSession;
pub use journal::{PickEntry, PickJournal};
