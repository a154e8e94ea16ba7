//! Vidmirror Services Library
//!
//! The workflow layer: the [`MirrorOrchestrator`] drives one id through the
//! exactly-once mirror state machine, and the [`BatchDriver`] runs many ids
//! sequentially with per-item failure capture.

pub mod batch;
pub mod error;
pub mod orchestrator;

pub use batch::{BatchDriver, BatchSummary, ItemResult, ItemStatus};
pub use error::MirrorError;
pub use orchestrator::{MirrorOptions, MirrorOrchestrator, MirrorOutcome, MirroredPair};
