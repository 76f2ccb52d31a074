use crate::errors::PrecedentResult;

/// High-precision pairwise relevance scorer used by the reranker
/// (cross-encoder style). Scores are expected in [0, 1].
pub trait IPairwiseScorer: Send + Sync {
    fn score(&self, query: &str, text: &str) -> PrecedentResult<f64>;

    fn score_batch(&self, query: &str, texts: &[String]) -> PrecedentResult<Vec<f64>> {
        texts.iter().map(|t| self.score(query, t)).collect()
    }

    fn name(&self) -> &str;
}
