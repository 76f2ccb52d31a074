/// Retrieval subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("query text is empty")]
    EmptyQuery,

    #[error("search failed: {reason}")]
    SearchFailed { reason: String },

    #[error("rerank failed: {reason}")]
    RerankFailed { reason: String },
}
