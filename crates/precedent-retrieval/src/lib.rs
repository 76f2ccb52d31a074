//! # precedent-retrieval
//!
//! The query path:
//! - [`intent`]: strategy chain (reference patterns, leading words, learned
//!   model) and the per-intent stage weight table
//! - [`search`]: BM25 keyword search, cosine vector search, weighted fusion
//! - [`expansion`]: bounded multi-hop expansion over citation edges
//! - [`ranking`]: pairwise rerank with timeout and fallback
//! - [`filters`]: jurisdiction, kind, trust, point-in-time and status filters

pub mod engine;
pub mod expansion;
pub mod filters;
pub mod intent;
pub mod ranking;
pub mod search;

pub use engine::RetrievalEngine;
pub use intent::{IntentDecision, IntentEngine};
pub use ranking::{RerankOutcome, Reranker};
pub use search::Candidate;
