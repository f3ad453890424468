//! # spotdraw-engine
//!
//! **Pure deterministic draw engine for SpotDraw.**
//!
//! The engine is the compute plane — it takes participants, spots, and
//! options and produces an ordered, reproducible assignment. It has:
//!
//! - **Zero side effects**: no persistence, no publishing, no I/O
//! - **Deterministic output**: same inputs + same seed -> same session
//! - **Tiered ordering**: priority participants drawn ahead of the pool
//! - **All-or-nothing groups**: linked spots assigned whole or not at all

pub mod digest;
pub mod draw;
pub mod pool;
pub mod shuffle;

pub use digest::{compute_result_root, make_digest, verify_result_root};
pub use draw::{
    run_choice_lottery, run_general_lottery, run_linked_lottery, run_sector_lottery,
};
pub use pool::SpotPool;
pub use shuffle::{draw_order, fisher_yates, seeded_rng};
