//! # precedent-core
//!
//! Foundation crate for the Precedent legal-citation engine.
//! Defines the versioned entity model, citation treatments, status log,
//! errors, configuration, constants, and the traits external services
//! (embedding, pairwise scoring, learned classifiers) are consumed through.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod intent;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::PrecedentConfig;
pub use errors::{PrecedentError, PrecedentResult};
pub use intent::Intent;
pub use models::{
    Chunk, ChunkType, CitationEdge, CitationType, EdgeState, EntityKind, LegalEntity,
    PrecedentStatus, Provenance, SourceTier, StatusChange, Treatment, TrustBlock,
    VerificationStatus,
};
