//! # precedent-trust
//!
//! Trust is a maintained field. The formula lives in [`formula`]; the
//! [`maintenance`] pass recomputes it for dirty entities over a snapshot
//! and writes the results back in one batch. [`views`] holds the
//! materialized "top-cited" aggregate.

pub mod dirty;
pub mod factors;
pub mod formula;
pub mod maintenance;
pub mod views;

pub use dirty::DirtySet;
pub use formula::{TrustBreakdown, TrustInputs};
pub use maintenance::{TrustMaintenance, TrustPassReport};
pub use views::{CitedEntry, TopCitedView};
