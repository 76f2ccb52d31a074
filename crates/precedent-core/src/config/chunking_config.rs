use serde::{Deserialize, Serialize};

use super::defaults;

/// Chunker token budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Paragraphs above this are re-split at sentence boundaries.
    pub max_tokens: usize,
    /// Size sub-chunks aim for when a paragraph is re-split.
    pub target_tokens: usize,
    /// Sub-chunks never fall below this, except for the final remainder.
    pub min_tokens: usize,
    /// Token-count cache capacity (entries).
    pub token_cache_capacity: u64,
    /// Chunk-type assignments below this confidence are flagged for review.
    pub type_review_threshold: f64,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_tokens: defaults::DEFAULT_MAX_CHUNK_TOKENS,
            target_tokens: defaults::DEFAULT_TARGET_CHUNK_TOKENS,
            min_tokens: defaults::DEFAULT_MIN_CHUNK_TOKENS,
            token_cache_capacity: defaults::DEFAULT_TOKEN_CACHE_CAPACITY,
            type_review_threshold: defaults::DEFAULT_CHUNK_TYPE_REVIEW_THRESHOLD,
        }
    }
}
