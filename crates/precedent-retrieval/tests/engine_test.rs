use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use precedent_core::config::PrecedentConfig;
use precedent_core::errors::{EmbeddingError, PrecedentError, PrecedentResult, RetrievalError};
use precedent_core::models::{ChunkType, EntityKind, RetrievalFilters, Treatment};
use precedent_core::traits::{IEmbeddingProvider, IPairwiseScorer};
use precedent_core::Intent;
use precedent_embeddings::EmbeddingEngine;
use precedent_graph::{IGraphStore, InMemoryGraphStore};
use precedent_ingest::{IngestionPipeline, PipelineDeps};
use precedent_observability::DegradationTracker;
use precedent_retrieval::RetrievalEngine;
use precedent_trust::DirtySet;
use test_fixtures::{chunk, citation, entity, legal_corpus};

fn config() -> PrecedentConfig {
    PrecedentConfig::default()
}

fn engine_over(
    store: Arc<dyn IGraphStore>,
    embeddings: EmbeddingEngine,
) -> (RetrievalEngine, Arc<Mutex<DegradationTracker>>) {
    let degradations = Arc::new(Mutex::new(DegradationTracker::new()));
    let engine = RetrievalEngine::new(
        store,
        Arc::new(embeddings),
        Arc::clone(&degradations),
        &config(),
    );
    (engine, degradations)
}

fn default_embeddings() -> EmbeddingEngine {
    EmbeddingEngine::new(config().embedding)
}

async fn corpus_store() -> Arc<dyn IGraphStore> {
    let store: Arc<dyn IGraphStore> = Arc::new(InMemoryGraphStore::new());
    let pipeline = IngestionPipeline::new(
        PipelineDeps {
            store: Arc::clone(&store),
            dirty: Arc::new(DirtySet::new()),
            embeddings: Arc::new(default_embeddings()),
            degradations: Arc::new(Mutex::new(DegradationTracker::new())),
        },
        &config(),
    )
    .unwrap();
    for doc in legal_corpus() {
        let report = pipeline
            .ingest(&doc.id, doc.kind, &doc.text, doc.meta.clone())
            .await
            .unwrap();
        assert!(report.is_ok(), "{}: {:?}", doc.id, report.errors);
    }
    store
}

/// case-a follows case-b, which applies stat-c. Only case-a shares
/// vocabulary with the adverse-possession queries.
fn chain_store() -> Arc<dyn IGraphStore> {
    let store: Arc<dyn IGraphStore> = Arc::new(InMemoryGraphStore::new());
    let docs = [
        ("case-a", EntityKind::Case, "adverse possession of agricultural land requires hostile animus"),
        ("case-b", EntityKind::Case, "limitation periods for recovery suits"),
        ("stat-c", EntityKind::Section, "twelve years from dispossession"),
    ];
    for (id, kind, text) in docs {
        store.insert_version(entity(id, kind, id)).unwrap();
        store
            .replace_chunks(id, vec![chunk(id, 0, ChunkType::Holding, text)])
            .unwrap();
    }
    store
        .add_citation(citation("case-a", "case-b", Treatment::Follows, 0.9))
        .unwrap();
    store
        .add_citation(citation("case-b", "stat-c", Treatment::Applies, 0.9))
        .unwrap();
    store
}

fn entity_ids(outcome: &precedent_core::models::QueryOutcome) -> Vec<&str> {
    outcome.results.iter().map(|r| r.entity_id.as_str()).collect()
}

#[tokio::test]
async fn section_lookup_ranks_exact_section_first() {
    let (engine, _) = engine_over(corpus_store().await, default_embeddings());
    let outcome = engine
        .query("Section 17 registration", &RetrievalFilters::default(), Some(5))
        .await
        .unwrap();

    assert_eq!(outcome.intent, Intent::StatuteLookup);
    assert!(outcome.degraded.is_empty());
    let ids = entity_ids(&outcome);
    let s17 = ids.iter().position(|id| *id == "ra-1908-s17");
    assert!(s17.is_some(), "{ids:?}");
    if let Some(s170) = ids.iter().position(|id| *id == "ita-1961-s170") {
        assert!(s17 < Some(s170), "{ids:?}");
    }
    assert!(outcome.results.iter().all(|r| r.hop_distance == 0));
}

#[tokio::test]
async fn inactive_authorities_can_be_excluded() {
    let (engine, _) = engine_over(corpus_store().await, default_embeddings());
    let query = "unregistered agreement inadmissible in evidence";

    let all = engine
        .query(query, &RetrievalFilters::default(), Some(50))
        .await
        .unwrap();
    assert!(entity_ids(&all).contains(&"case-alpha-1990"));

    let filters = RetrievalFilters {
        exclude_inactive: true,
        ..Default::default()
    };
    let active = engine.query(query, &filters, Some(50)).await.unwrap();
    assert!(!active.results.is_empty());
    assert!(!entity_ids(&active).contains(&"case-alpha-1990"));
}

#[tokio::test]
async fn kind_filter_keeps_only_sections() {
    let (engine, _) = engine_over(corpus_store().await, default_embeddings());
    let filters = RetrievalFilters {
        kinds: vec![EntityKind::Section],
        ..Default::default()
    };
    let outcome = engine
        .query("registration of immovable property", &filters, Some(20))
        .await
        .unwrap();
    assert!(!outcome.results.is_empty());
    assert!(outcome
        .results
        .iter()
        .all(|r| !r.entity_id.starts_with("case-")));
}

#[tokio::test]
async fn complex_intent_expands_along_citations() {
    let (engine, _) = engine_over(chain_store(), default_embeddings());
    let outcome = engine
        .query(
            "whether adverse possession requires hostile animus",
            &RetrievalFilters::default(),
            None,
        )
        .await
        .unwrap();

    assert_eq!(outcome.intent, Intent::Factual);
    assert_eq!(entity_ids(&outcome), vec!["case-a", "case-b", "stat-c"]);
    let hops: Vec<u32> = outcome.results.iter().map(|r| r.hop_distance).collect();
    assert_eq!(hops, vec![0, 1, 2]);

    let via_a = outcome.results[1].treatment_context.as_ref().unwrap();
    assert_eq!(via_a.via_entity_id, "case-a");
    assert_eq!(via_a.treatment, Treatment::Follows);
    let via_b = outcome.results[2].treatment_context.as_ref().unwrap();
    assert_eq!(via_b.via_entity_id, "case-b");
    assert_eq!(via_b.treatment, Treatment::Applies);

    assert!(outcome.results[0].score > outcome.results[1].score);
    assert!(outcome.results[1].score > outcome.results[2].score);
}

#[tokio::test]
async fn general_intent_does_not_expand() {
    let (engine, _) = engine_over(chain_store(), default_embeddings());
    let outcome = engine
        .query("adverse possession hostile animus", &RetrievalFilters::default(), None)
        .await
        .unwrap();
    assert_eq!(outcome.intent, Intent::General);
    assert_eq!(entity_ids(&outcome), vec!["case-a"]);
}

#[tokio::test]
async fn empty_query_is_rejected() {
    let (engine, _) = engine_over(chain_store(), default_embeddings());
    let err = engine
        .query("   ", &RetrievalFilters::default(), None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PrecedentError::RetrievalError(RetrievalError::EmptyQuery)
    ));
}

struct DownProvider;

impl IEmbeddingProvider for DownProvider {
    fn embed(&self, _text: &str) -> PrecedentResult<Vec<f32>> {
        Err(EmbeddingError::InferenceFailed {
            reason: "model offline".into(),
        }
        .into())
    }

    fn dimensions(&self) -> usize {
        config().embedding.dimensions
    }

    fn name(&self) -> &str {
        "down"
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[tokio::test]
async fn embedding_outage_falls_back_to_keywords() {
    let embeddings = EmbeddingEngine::with_provider(config().embedding, Arc::new(DownProvider));
    let (engine, degradations) = engine_over(chain_store(), embeddings);
    let outcome = engine
        .query("adverse possession hostile animus", &RetrievalFilters::default(), None)
        .await
        .unwrap();

    assert_eq!(outcome.degraded, vec!["embeddings".to_string()]);
    assert_eq!(entity_ids(&outcome), vec!["case-a"]);
    assert!(degradations.lock().unwrap().is_degraded("embeddings"));
}

/// Fails while `down` is set.
struct Switchable {
    down: AtomicBool,
}

impl IEmbeddingProvider for Switchable {
    fn embed(&self, text: &str) -> PrecedentResult<Vec<f32>> {
        if self.down.load(Ordering::SeqCst) {
            return DownProvider.embed(text);
        }
        let mut v = vec![0.0; self.dimensions()];
        v[0] = 1.0;
        Ok(v)
    }

    fn dimensions(&self) -> usize {
        config().embedding.dimensions
    }

    fn name(&self) -> &str {
        "switchable"
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[tokio::test]
async fn embeddings_recover_after_an_outage() {
    let provider = Arc::new(Switchable {
        down: AtomicBool::new(true),
    });
    let embeddings = EmbeddingEngine::with_provider(config().embedding, provider.clone());
    let (engine, degradations) = engine_over(chain_store(), embeddings);

    for query in ["adverse possession", "hostile animus"] {
        let outcome = engine
            .query(query, &RetrievalFilters::default(), None)
            .await
            .unwrap();
        assert_eq!(outcome.degraded, vec!["embeddings".to_string()]);
    }
    {
        let tracker = degradations.lock().unwrap();
        assert_eq!(tracker.active_degradations().len(), 1);
        assert_eq!(tracker.active_degradations()[0].occurrences, 2);
    }

    provider.down.store(false, Ordering::SeqCst);
    let outcome = engine
        .query("agricultural land", &RetrievalFilters::default(), None)
        .await
        .unwrap();
    assert!(outcome.degraded.is_empty());
    assert!(!degradations.lock().unwrap().is_degraded("embeddings"));
}

struct Prefers(&'static str);

impl IPairwiseScorer for Prefers {
    fn score(&self, _query: &str, text: &str) -> PrecedentResult<f64> {
        Ok(if text.contains(self.0) { 1.0 } else { 0.0 })
    }

    fn name(&self) -> &str {
        "prefers"
    }
}

struct Failing;

impl IPairwiseScorer for Failing {
    fn score(&self, _query: &str, _text: &str) -> PrecedentResult<f64> {
        Err(RetrievalError::RerankFailed {
            reason: "scorer offline".into(),
        }
        .into())
    }

    fn name(&self) -> &str {
        "failing"
    }
}

const MIXED_QUERY: &str = "adverse possession twelve years dispossession limitation";

#[tokio::test]
async fn scorer_decides_the_final_order() {
    let (engine, _) = engine_over(chain_store(), default_embeddings());
    let engine = engine.with_scorer(Arc::new(Prefers("limitation")));
    let outcome = engine
        .query(MIXED_QUERY, &RetrievalFilters::default(), None)
        .await
        .unwrap();
    assert!(outcome.reranked);
    assert_eq!(outcome.results[0].entity_id, "case-b");
}

#[tokio::test]
async fn failed_rerank_keeps_first_pass_order() {
    let store = chain_store();
    let (plain, _) = engine_over(Arc::clone(&store), default_embeddings());
    let expected = plain
        .query(MIXED_QUERY, &RetrievalFilters::default(), None)
        .await
        .unwrap();

    let (engine, degradations) = engine_over(store, default_embeddings());
    let engine = engine.with_scorer(Arc::new(Failing));
    let outcome = engine
        .query(MIXED_QUERY, &RetrievalFilters::default(), None)
        .await
        .unwrap();

    assert!(!outcome.reranked);
    assert_eq!(outcome.degraded, vec!["reranker".to_string()]);
    assert_eq!(outcome.results, expected.results);
    assert!(degradations.lock().unwrap().is_degraded("reranker"));
}

#[tokio::test]
async fn max_results_truncates() {
    let (engine, _) = engine_over(chain_store(), default_embeddings());
    let outcome = engine
        .query(MIXED_QUERY, &RetrievalFilters::default(), Some(1))
        .await
        .unwrap();
    assert_eq!(outcome.results.len(), 1);
}

/// Fails while `down` is set, then prefers `limitation`.
struct Recovering {
    down: AtomicBool,
}

impl IPairwiseScorer for Recovering {
    fn score(&self, query: &str, text: &str) -> PrecedentResult<f64> {
        if self.down.load(Ordering::SeqCst) {
            return Failing.score(query, text);
        }
        Prefers("limitation").score(query, text)
    }

    fn name(&self) -> &str {
        "recovering"
    }
}

#[tokio::test]
async fn reranker_recovers_after_a_failure() {
    let scorer = Arc::new(Recovering {
        down: AtomicBool::new(true),
    });
    let (engine, degradations) = engine_over(chain_store(), default_embeddings());
    let engine = engine.with_scorer(scorer.clone());

    let outcome = engine
        .query(MIXED_QUERY, &RetrievalFilters::default(), None)
        .await
        .unwrap();
    assert!(!outcome.reranked);
    assert!(degradations.lock().unwrap().is_degraded("reranker"));

    scorer.down.store(false, Ordering::SeqCst);
    let outcome = engine
        .query(MIXED_QUERY, &RetrievalFilters::default(), None)
        .await
        .unwrap();
    assert!(outcome.reranked);
    assert!(degradations.lock().unwrap().active_degradations().is_empty());
}
