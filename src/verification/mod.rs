//! Verification orchestration
//!
//! The top-level coordinator: per fact it gathers sources, detects
//! disagreements between them, resolves those disagreements with an ordered
//! list of strategies and assembles a confidence-scored
//! [`VerificationResult`]; per request it manages a concurrent
//! [`VerificationSession`].

mod conflicts;
mod engine;
mod models;
mod resolution;
mod sessions;

pub use engine::VerificationEngine;
pub use models::{
    ConflictResolution, ConflictSeverity, ConflictType, FactConflict, ResolutionMethod,
    SessionStatus, VerificationMethod, VerificationResult, VerificationSession,
};
pub use sessions::SessionStore;
