//! EmbeddingEngine: one provider plus cache.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use precedent_core::config::EmbeddingConfig;
use precedent_core::errors::{EmbeddingError, PrecedentError, PrecedentResult};
use precedent_core::models::Chunk;
use precedent_core::traits::IEmbeddingProvider;

use crate::cache::EmbeddingCache;
use crate::providers::HashedTfIdf;

/// A vector and the provider that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedded {
    pub vector: Vec<f32>,
    pub provider: String,
}

/// Entry point for chunk and query embeddings.
///
/// Chunks and queries are embedded by the same provider, so query vectors
/// always live in the same space as the corpus. A failing provider is not
/// masked by another one: callers degrade (unembedded chunks, keyword-only
/// search) and record it with the degradation tracker.
pub struct EmbeddingEngine {
    provider: Arc<dyn IEmbeddingProvider>,
    cache: EmbeddingCache,
    config: EmbeddingConfig,
}

impl EmbeddingEngine {
    /// Engine backed by the hashed TF-IDF provider.
    pub fn new(config: EmbeddingConfig) -> Self {
        let provider = Arc::new(HashedTfIdf::new(config.dimensions));
        Self::with_provider(config, provider)
    }

    /// Engine backed by an external provider.
    pub fn with_provider(config: EmbeddingConfig, provider: Arc<dyn IEmbeddingProvider>) -> Self {
        info!(
            provider = provider.name(),
            dims = provider.dimensions(),
            "embedding engine initialized"
        );
        Self {
            cache: EmbeddingCache::new(config.cache_size),
            provider,
            config,
        }
    }

    /// Name of the provider whose vectors the corpus is indexed with.
    pub fn primary_model(&self) -> &str {
        self.provider.name()
    }

    pub fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    /// Embed through the cache.
    pub fn embed_text(&self, text: &str) -> PrecedentResult<Embedded> {
        let key = EmbeddingCache::key(text);
        if let Some(hit) = self.cache.get(&key) {
            debug!(hash = %key, "embedding cache hit");
            return Ok(hit);
        }
        let embedded = self.embed_uncached(text)?;
        self.cache.insert(key, embedded.clone());
        Ok(embedded)
    }

    /// Embed every chunk; stops at the first failure.
    pub fn embed_chunks(&self, chunks: &[Chunk]) -> PrecedentResult<Vec<(String, Embedded)>> {
        chunks
            .iter()
            .map(|c| Ok((c.id.clone(), self.embed_text(&c.text)?)))
            .collect()
    }

    fn embed_uncached(&self, text: &str) -> PrecedentResult<Embedded> {
        let provider = self.provider.as_ref();
        if !provider.is_available() {
            return Err(EmbeddingError::ProviderUnavailable {
                provider: provider.name().to_string(),
            }
            .into());
        }
        let vector = provider.embed(text)?;
        if vector.len() != provider.dimensions() {
            return Err(EmbeddingError::DimensionMismatch {
                expected: provider.dimensions(),
                actual: vector.len(),
            }
            .into());
        }
        Ok(Embedded {
            vector,
            provider: provider.name().to_string(),
        })
    }
}

impl IEmbeddingProvider for EmbeddingEngine {
    fn embed(&self, text: &str) -> PrecedentResult<Vec<f32>> {
        Ok(self.embed_text(text)?.vector)
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn name(&self) -> &str {
        "precedent-embedding-engine"
    }

    fn is_available(&self) -> bool {
        self.provider.is_available()
    }
}

/// Run `embed_text` on the blocking pool, bounded by `timeout`.
pub async fn embed_with_timeout(
    engine: Arc<EmbeddingEngine>,
    text: String,
    timeout: Duration,
) -> PrecedentResult<Embedded> {
    let task = tokio::task::spawn_blocking(move || engine.embed_text(&text));
    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join)) => Err(PrecedentError::ConcurrencyError(join.to_string())),
        Err(_) => Err(PrecedentError::Timeout {
            component: "embeddings".to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}

/// Embed a batch of chunks on the blocking pool, bounded by `timeout`.
pub async fn embed_chunks_with_timeout(
    engine: Arc<EmbeddingEngine>,
    chunks: Vec<Chunk>,
    timeout: Duration,
) -> PrecedentResult<Vec<(String, Embedded)>> {
    let task = tokio::task::spawn_blocking(move || engine.embed_chunks(&chunks));
    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join)) => Err(PrecedentError::ConcurrencyError(join.to_string())),
        Err(_) => Err(PrecedentError::Timeout {
            component: "embeddings".to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_engine_uses_tfidf() {
        let engine = EmbeddingEngine::new(EmbeddingConfig {
            dimensions: 64,
            ..Default::default()
        });
        assert_eq!(engine.primary_model(), "hashed-tfidf");
        let e = engine.embed_text("registration act").unwrap();
        assert_eq!(e.vector.len(), 64);
        assert_eq!(engine.embed_text("registration act").unwrap(), e);
    }

    struct WrongDims;

    impl IEmbeddingProvider for WrongDims {
        fn embed(&self, _text: &str) -> PrecedentResult<Vec<f32>> {
            Ok(vec![0.0; 3])
        }
        fn dimensions(&self) -> usize {
            8
        }
        fn name(&self) -> &str {
            "wrong"
        }
        fn is_available(&self) -> bool {
            true
        }
    }

    #[test]
    fn dimension_mismatch_is_a_failure() {
        let engine = EmbeddingEngine::with_provider(EmbeddingConfig::default(), Arc::new(WrongDims));
        let err = engine.embed_text("x").unwrap_err();
        assert!(matches!(
            err,
            PrecedentError::EmbeddingError(EmbeddingError::DimensionMismatch { expected: 8, actual: 3 })
        ));
    }
}
