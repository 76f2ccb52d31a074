//! # precedent-ingest
//!
//! Everything between plain extracted text and the graph:
//! - [`chunker`]: paragraph-aligned, typed, token-budgeted chunks
//! - [`citations`]: statutory and authority reference extraction and resolution
//! - [`classifier`]: treatment classification chain and acceptance policy
//! - [`pipeline`]: the per-entity ingestion pipeline

pub mod chunker;
pub mod citations;
pub mod classifier;
pub mod locks;
pub mod patterns;
pub mod pipeline;
pub mod tokens;

pub use chunker::Chunker;
pub use citations::{CitationExtractor, ExtractedReference};
pub use classifier::{Acceptance, TreatmentClassifier};
pub use pipeline::{IngestRequest, IngestionPipeline, PipelineDeps};
pub use tokens::TokenCounter;
