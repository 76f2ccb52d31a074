//! # precedent-embeddings
//!
//! Turns chunk and query text into vectors through an external provider
//! when one is configured, otherwise through a deterministic hashed TF-IDF
//! provider. Every vector is tagged with the provider that produced it so
//! search never compares vectors from different spaces.

pub mod cache;
pub mod engine;
pub mod providers;
pub mod similarity;

pub use engine::{EmbeddingEngine, Embedded};
pub use providers::HashedTfIdf;
pub use similarity::cosine;
