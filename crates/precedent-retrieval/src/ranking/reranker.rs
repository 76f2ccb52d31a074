//! Second-pass rerank with a pairwise scorer.
//!
//! The scorer runs on the blocking pool under a timeout. Any failure,
//! including the timeout, leaves the first-pass order untouched.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use precedent_core::errors::{PrecedentError, PrecedentResult, RetrievalError};
use precedent_core::traits::IPairwiseScorer;

use crate::search::{sort_candidates, Candidate};

/// How the rerank stage ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RerankOutcome {
    Reranked,
    /// No scorer configured, or nothing to rerank.
    Skipped,
    /// The scorer failed or timed out; carries the failure.
    Degraded(String),
}

pub struct Reranker {
    scorer: Option<Arc<dyn IPairwiseScorer>>,
    top_k: usize,
    blend: f64,
    timeout: Duration,
}

impl Reranker {
    pub fn new(top_k: usize, blend: f64, timeout: Duration) -> Self {
        Self {
            scorer: None,
            top_k,
            blend: blend.clamp(0.0, 1.0),
            timeout,
        }
    }

    pub fn with_scorer(mut self, scorer: Arc<dyn IPairwiseScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.scorer.is_some()
    }

    /// Rescore the first `top_k` of `candidates` (already sorted) as
    /// `blend * pairwise + (1 - blend) * fused`. `texts[i]` is the chunk
    /// text of `candidates[i]`. The tail below `top_k` keeps its order
    /// after the reranked head. The wait is bounded by the configured
    /// timeout and by `remaining`.
    pub async fn rerank(
        &self,
        query: &str,
        mut candidates: Vec<Candidate>,
        texts: Vec<String>,
        remaining: Duration,
    ) -> (Vec<Candidate>, RerankOutcome) {
        let Some(scorer) = self.scorer.clone() else {
            return (candidates, RerankOutcome::Skipped);
        };
        let head = self.top_k.min(candidates.len()).min(texts.len());
        if head == 0 {
            return (candidates, RerankOutcome::Skipped);
        }

        let timeout = self.timeout.min(remaining);
        let mut texts = texts;
        texts.truncate(head);
        match score_with_timeout(scorer, query.to_string(), texts, timeout).await {
            Ok(scores) => {
                for (candidate, pairwise) in candidates.iter_mut().zip(scores) {
                    candidate.score =
                        (self.blend * pairwise.clamp(0.0, 1.0) + (1.0 - self.blend) * candidate.score)
                            .clamp(0.0, 1.0);
                }
                sort_candidates(&mut candidates[..head]);
                debug!(reranked = head, "rerank applied");
                (candidates, RerankOutcome::Reranked)
            }
            Err(e) => {
                warn!(error = %e, "rerank failed; keeping first-pass order");
                (candidates, RerankOutcome::Degraded(e.to_string()))
            }
        }
    }
}

async fn score_with_timeout(
    scorer: Arc<dyn IPairwiseScorer>,
    query: String,
    texts: Vec<String>,
    timeout: Duration,
) -> PrecedentResult<Vec<f64>> {
    let expected = texts.len();
    let task = tokio::task::spawn_blocking(move || scorer.score_batch(&query, &texts));
    let scores = match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result?,
        Ok(Err(join)) => return Err(PrecedentError::ConcurrencyError(join.to_string())),
        Err(_) => {
            return Err(PrecedentError::Timeout {
                component: "reranker".to_string(),
                timeout_ms: timeout.as_millis() as u64,
            })
        }
    };
    if scores.len() != expected {
        return Err(RetrievalError::RerankFailed {
            reason: format!("scorer returned {} scores for {expected} texts", scores.len()),
        }
        .into());
    }
    Ok(scores)
}
