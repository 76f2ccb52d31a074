use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use precedent_core::config::EmbeddingConfig;
use precedent_core::errors::{EmbeddingError, PrecedentError, PrecedentResult};
use precedent_core::models::ChunkType;
use precedent_core::traits::IEmbeddingProvider;
use precedent_embeddings::engine::{embed_chunks_with_timeout, embed_with_timeout};
use precedent_embeddings::EmbeddingEngine;
use test_fixtures::chunk;

struct Flaky {
    up: AtomicBool,
}

impl IEmbeddingProvider for Flaky {
    fn embed(&self, text: &str) -> PrecedentResult<Vec<f32>> {
        if self.up.load(Ordering::SeqCst) {
            Ok(vec![text.len() as f32, 1.0, 0.0, 0.0])
        } else {
            Err(EmbeddingError::ProviderUnavailable {
                provider: "remote".into(),
            }
            .into())
        }
    }
    fn dimensions(&self) -> usize {
        4
    }
    fn name(&self) -> &str {
        "remote"
    }
    fn is_available(&self) -> bool {
        true
    }
}

struct Slow;

impl IEmbeddingProvider for Slow {
    fn embed(&self, _text: &str) -> PrecedentResult<Vec<f32>> {
        std::thread::sleep(Duration::from_millis(300));
        Ok(vec![1.0; 4])
    }
    fn dimensions(&self) -> usize {
        4
    }
    fn name(&self) -> &str {
        "slow"
    }
    fn is_available(&self) -> bool {
        true
    }
}

fn config() -> EmbeddingConfig {
    EmbeddingConfig {
        dimensions: 32,
        ..Default::default()
    }
}

#[test]
fn provider_outage_is_not_masked_for_corpus_vectors() {
    let flaky = Arc::new(Flaky {
        up: AtomicBool::new(false),
    });
    let engine = EmbeddingEngine::with_provider(config(), flaky.clone());
    assert_eq!(engine.primary_model(), "remote");
    assert!(engine.embed_text("section 17").is_err());

    flaky.up.store(true, Ordering::SeqCst);
    let ok = engine.embed_text("section 17").unwrap();
    assert_eq!(ok.provider, "remote");
    assert_eq!(ok.vector.len(), 4);
}

#[test]
fn chunks_are_embedded_by_id() {
    let engine = EmbeddingEngine::new(config());
    let chunks = vec![
        chunk("s17", 0, ChunkType::StatuteText, "Documents of which registration is compulsory."),
        chunk("s17", 1, ChunkType::StatuteText, "Instruments of gift of immovable property."),
    ];
    let embedded = engine.embed_chunks(&chunks).unwrap();
    assert_eq!(embedded.len(), 2);
    assert_eq!(embedded[0].0, "s17:0");
    assert_eq!(embedded[1].1.vector.len(), 32);
}

#[tokio::test]
async fn slow_provider_times_out() {
    let engine = Arc::new(EmbeddingEngine::with_provider(config(), Arc::new(Slow)));
    let err = embed_with_timeout(engine.clone(), "q".into(), Duration::from_millis(20))
        .await
        .unwrap_err();
    assert!(matches!(err, PrecedentError::Timeout { .. }));

    let chunks = vec![chunk("a", 0, ChunkType::Facts, "facts")];
    let err = embed_chunks_with_timeout(engine, chunks, Duration::from_millis(20))
        .await
        .unwrap_err();
    assert!(matches!(err, PrecedentError::Timeout { .. }));
}

#[tokio::test]
async fn fast_provider_within_timeout() {
    let engine = Arc::new(EmbeddingEngine::new(config()));
    let e = embed_with_timeout(engine, "registration".into(), Duration::from_secs(2))
        .await
        .unwrap();
    assert_eq!(e.provider, "hashed-tfidf");
}
