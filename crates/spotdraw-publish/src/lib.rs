//! # spotdraw-publish
//!
//! **Collaborator boundary for SpotDraw.**
//!
//! The engine and session planes produce finished [`LotterySession`]s;
//! everything beyond is a collaborator reachable through the traits here:
//!
//! - [`SessionStore`]: append-only session history per building
//! - [`ResultPublisher`]: public, digest-verifiable result lists keyed by
//!   building
//! - [`export_document`]: pure derivation of downloadable artifacts
//!
//! In-memory implementations ([`MemoryStore`], [`MemoryPublisher`]) back
//! the test suites and serve as reference semantics for real adapters.
//!
//! [`LotterySession`]: spotdraw_types::LotterySession

pub mod export;
pub mod publish;
pub mod store;

pub use export::{ExportFormat, ExportedDocument, export_document};
pub use publish::{MemoryPublisher, PublishedResults, ResultPublisher};
pub use store::{MemoryStore, SessionStore};
