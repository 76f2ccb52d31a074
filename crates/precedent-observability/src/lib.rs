//! # precedent-observability
//!
//! Tracing subscriber setup, one helper per notable engine event, span
//! macros for the main operations, and a degradation tracker that
//! remembers every fallback the engine took.

pub mod degradation;
pub mod tracing_setup;

pub use degradation::{DegradationTracker, RecoveryStatus, TrackedDegradation};
pub use tracing_setup::{events, init_tracing, init_tracing_with_filter};
