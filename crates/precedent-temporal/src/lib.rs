//! # precedent-temporal
//!
//! Time-aware reasoning over versioned authorities:
//! - [`resolver`] answers "which version was in force on date D"
//! - [`coverage`] audits a version chain for gaps and overlaps
//! - [`versioning`] registers new versions and closes the previous one
//! - [`status`] owns the precedent status state machine and its append-only log

pub mod coverage;
pub mod resolver;
pub mod status;
pub mod versioning;

pub use coverage::CoverageIssue;
pub use resolver::resolve_version;
pub use status::StatusPropagationManager;
pub use versioning::VersionManager;
