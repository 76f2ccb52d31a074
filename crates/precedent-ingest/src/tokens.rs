use std::sync::Arc;

use moka::sync::Cache;
use tiktoken_rs::CoreBPE;

use precedent_core::errors::{IngestError, PrecedentResult};

/// Token counter wrapping tiktoken's `cl100k_base` tokenizer.
/// Results are cached per blake3 content hash.
pub struct TokenCounter {
    bpe: Arc<CoreBPE>,
    cache: Cache<String, usize>,
}

impl TokenCounter {
    pub fn new(cache_capacity: u64) -> PrecedentResult<Self> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| IngestError::TokenizerUnavailable {
            reason: e.to_string(),
        })?;
        Ok(Self {
            bpe: Arc::new(bpe),
            cache: Cache::new(cache_capacity),
        })
    }

    /// Count tokens (uncached).
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    pub fn count_cached(&self, text: &str) -> usize {
        let hash = blake3::hash(text.as_bytes()).to_hex().to_string();
        self.cache.get_with(hash, || self.count(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_matches_uncached() {
        let counter = TokenCounter::new(16).unwrap();
        let text = "Documents of which registration is compulsory.";
        assert!(counter.count(text) > 0);
        assert_eq!(counter.count(text), counter.count_cached(text));
        assert_eq!(counter.count(""), 0);
    }
}
