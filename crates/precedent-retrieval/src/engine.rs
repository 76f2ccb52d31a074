//! RetrievalEngine: the read path from query text to ranked chunks.
//!
//! Intent → concurrent keyword and vector search → fusion → filters →
//! graph expansion (complex intents) → rerank. Embedding and scorer
//! failures degrade the query; they never fail it.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, Instrument};

use precedent_core::config::{PrecedentConfig, RetrievalConfig, TrustConfig};
use precedent_core::errors::{PrecedentError, PrecedentResult, RetrievalError};
use precedent_core::models::{DegradationEvent, QueryOutcome, RetrievalFilters};
use precedent_core::traits::{IIntentModel, IPairwiseScorer};
use precedent_embeddings::engine::embed_with_timeout;
use precedent_embeddings::EmbeddingEngine;
use precedent_graph::{GraphState, IGraphStore};
use precedent_observability::{events, retrieval_span, DegradationTracker};

use crate::expansion::expand_candidates;
use crate::filters;
use crate::intent::IntentEngine;
use crate::ranking::{RerankOutcome, Reranker};
use crate::search::{fuse, sort_candidates, vector_search, Candidate, KeywordSearcher, VectorHit};

pub struct RetrievalEngine {
    store: Arc<dyn IGraphStore>,
    embeddings: Arc<EmbeddingEngine>,
    degradations: Arc<Mutex<DegradationTracker>>,
    intent: IntentEngine,
    keyword: Arc<KeywordSearcher>,
    reranker: Reranker,
    config: RetrievalConfig,
    trust: TrustConfig,
}

impl RetrievalEngine {
    pub fn new(
        store: Arc<dyn IGraphStore>,
        embeddings: Arc<EmbeddingEngine>,
        degradations: Arc<Mutex<DegradationTracker>>,
        config: &PrecedentConfig,
    ) -> Self {
        let retrieval = config.retrieval.clone();
        let reranker = Reranker::new(
            retrieval.rerank_top_k,
            retrieval.rerank_blend,
            Duration::from_millis(retrieval.scorer_timeout_ms),
        );
        Self {
            store,
            embeddings,
            degradations,
            intent: IntentEngine::new(),
            keyword: Arc::new(KeywordSearcher::new()),
            reranker,
            config: retrieval,
            trust: config.trust.clone(),
        }
    }

    pub fn with_scorer(mut self, scorer: Arc<dyn IPairwiseScorer>) -> Self {
        self.reranker = self.reranker.with_scorer(scorer);
        self
    }

    pub fn with_intent_model(mut self, model: Arc<dyn IIntentModel>) -> Self {
        self.intent = std::mem::take(&mut self.intent).with_model(model);
        self
    }

    pub fn intent_engine(&self) -> &IntentEngine {
        &self.intent
    }

    /// Ranked chunks for `text`. `max_results` defaults to the configured
    /// result count.
    pub async fn query(
        &self,
        text: &str,
        filters: &RetrievalFilters,
        max_results: Option<usize>,
    ) -> PrecedentResult<QueryOutcome> {
        let query = text.trim();
        if query.is_empty() {
            return Err(RetrievalError::EmptyQuery.into());
        }
        let span = retrieval_span!(query);
        self.run(query, filters, max_results).instrument(span).await
    }

    async fn run(
        &self,
        query: &str,
        filters: &RetrievalFilters,
        max_results: Option<usize>,
    ) -> PrecedentResult<QueryOutcome> {
        let started = Instant::now();
        let deadline = Duration::from_millis(self.config.query_timeout_ms);
        let limit = max_results.unwrap_or(self.config.default_max_results);

        let decision = self.intent.classify(query);
        let mut weights = self.intent.weights(decision.intent);
        let mut outcome = QueryOutcome {
            intent: decision.intent,
            ..QueryOutcome::default()
        };
        let state = self.store.snapshot();

        let search = async {
            tokio::join!(
                self.keyword_search(&state, query),
                self.vector_search(&state, query, deadline)
            )
        };
        let (keyword, vector) = tokio::time::timeout(deadline, search)
            .await
            .map_err(|_| PrecedentError::Timeout {
                component: "retrieval".to_string(),
                timeout_ms: self.config.query_timeout_ms,
            })?;
        let keyword = keyword?;
        let vector = match vector {
            Ok(hits) => {
                self.recover("embeddings");
                hits
            }
            Err(e) => {
                weights = weights.without_semantic();
                self.degrade(&mut outcome, "embeddings", &e.to_string(), "keyword-only ranking");
                Vec::new()
            }
        };
        debug!(keyword = keyword.len(), vector = vector.len(), "first-stage hits");

        let fused = fuse(&state, &keyword, &vector, weights, &self.trust, Utc::now());
        let mut candidates = filters::apply(&state, filters, fused);

        if decision.intent.is_complex() && self.config.max_hops > 0 {
            let expanded = expand_candidates(&state, &candidates, &self.config);
            candidates.extend(filters::apply(&state, filters, expanded));
            sort_candidates(&mut candidates);
        }

        if self.reranker.is_enabled() {
            let remaining = deadline.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                self.degrade(&mut outcome, "reranker", "query deadline reached", "first-pass order");
            } else {
                let texts = rerank_texts(&state, &candidates, self.config.rerank_top_k);
                let (reranked, result) = self.reranker.rerank(query, candidates, texts, remaining).await;
                candidates = reranked;
                match result {
                    RerankOutcome::Reranked => {
                        outcome.reranked = true;
                        self.recover("reranker");
                    }
                    RerankOutcome::Degraded(reason) => {
                        self.degrade(&mut outcome, "reranker", &reason, "first-pass order")
                    }
                    RerankOutcome::Skipped => {}
                }
            }
        }

        candidates.truncate(limit);
        outcome.results = candidates.into_iter().map(Candidate::into_result).collect();
        events::query_completed(
            decision.intent.as_str(),
            outcome.results.len(),
            !outcome.degraded.is_empty(),
            started.elapsed().as_millis() as u64,
        );
        Ok(outcome)
    }

    async fn keyword_search(
        &self,
        state: &Arc<GraphState>,
        query: &str,
    ) -> PrecedentResult<Vec<crate::search::KeywordHit>> {
        let searcher = Arc::clone(&self.keyword);
        let state = Arc::clone(state);
        let query = query.to_string();
        let pool = self.config.candidate_pool;
        tokio::task::spawn_blocking(move || searcher.search(&state, &query, pool))
            .await
            .map_err(|e| {
                RetrievalError::SearchFailed {
                    reason: e.to_string(),
                }
                .into()
            })
    }

    async fn vector_search(
        &self,
        state: &Arc<GraphState>,
        query: &str,
        deadline: Duration,
    ) -> PrecedentResult<Vec<VectorHit>> {
        let timeout = Duration::from_millis(self.config.embed_timeout_ms).min(deadline);
        let embedded = embed_with_timeout(Arc::clone(&self.embeddings), query.to_string(), timeout).await?;
        let state = Arc::clone(state);
        let pool = self.config.candidate_pool;
        tokio::task::spawn_blocking(move || {
            vector_search(&state, &embedded.vector, &embedded.provider, pool)
        })
        .await
        .map_err(|e| PrecedentError::ConcurrencyError(e.to_string()))
    }

    fn degrade(&self, outcome: &mut QueryOutcome, component: &str, failure: &str, fallback: &str) {
        if !outcome.degraded.iter().any(|c| c == component) {
            outcome.degraded.push(component.to_string());
        }
        let event = DegradationEvent::new(component, failure, fallback);
        match self.degradations.lock() {
            Ok(mut tracker) => tracker.record(event),
            Err(poisoned) => poisoned.into_inner().record(event),
        }
    }

    fn recover(&self, component: &str) {
        match self.degradations.lock() {
            Ok(mut tracker) => tracker.mark_recovered(component),
            Err(poisoned) => poisoned.into_inner().mark_recovered(component),
        };
    }
}

/// Chunk text for the first `top_k` candidates, in order.
fn rerank_texts(state: &GraphState, candidates: &[Candidate], top_k: usize) -> Vec<String> {
    candidates
        .iter()
        .take(top_k)
        .map(|c| state.chunk(&c.chunk_id).map(|chunk| chunk.text.clone()).unwrap_or_default())
        .collect()
}
