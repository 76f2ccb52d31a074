use serde::{Deserialize, Serialize};

use super::defaults;

/// Retrieval subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Results returned when the caller passes no explicit limit.
    pub default_max_results: usize,
    /// Candidates gathered by each of the vector and keyword searches.
    pub candidate_pool: usize,
    /// Number of fused candidates passed to the reranker.
    pub rerank_top_k: usize,
    /// Weight of the pairwise scorer in the reranked score (rest is the fused score).
    pub rerank_blend: f64,
    /// Direct hits used as expansion seeds.
    pub expansion_seed_k: usize,
    /// Hard cap on entities added by expansion.
    pub expansion_budget: usize,
    /// Maximum hop count for graph expansion.
    pub max_hops: usize,
    /// Score multiplier applied per hop.
    pub hop_decay: f64,
    pub embed_timeout_ms: u64,
    pub scorer_timeout_ms: u64,
    /// Overall deadline for a query.
    pub query_timeout_ms: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_max_results: defaults::DEFAULT_MAX_RESULTS,
            candidate_pool: defaults::DEFAULT_CANDIDATE_POOL,
            rerank_top_k: defaults::DEFAULT_RERANK_TOP_K,
            rerank_blend: defaults::DEFAULT_RERANK_BLEND,
            expansion_seed_k: defaults::DEFAULT_EXPANSION_SEED_K,
            expansion_budget: defaults::DEFAULT_EXPANSION_BUDGET,
            max_hops: defaults::DEFAULT_MAX_HOPS,
            hop_decay: defaults::DEFAULT_HOP_DECAY,
            embed_timeout_ms: defaults::DEFAULT_EMBED_TIMEOUT_MS,
            scorer_timeout_ms: defaults::DEFAULT_SCORER_TIMEOUT_MS,
            query_timeout_ms: defaults::DEFAULT_QUERY_TIMEOUT_MS,
        }
    }
}
