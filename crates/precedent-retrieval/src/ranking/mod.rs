pub mod reranker;

pub use reranker::{RerankOutcome, Reranker};
