//! Normalized trust terms, each in [0, 1].

pub mod citation;
pub mod recency;
