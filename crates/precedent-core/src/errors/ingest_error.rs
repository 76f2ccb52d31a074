/// Ingestion errors (chunking, extraction, classification).
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("entity {entity_id} has no text to ingest")]
    EmptyText { entity_id: String },

    #[error("tokenizer unavailable: {reason}")]
    TokenizerUnavailable { reason: String },

    #[error("batch of {size} exceeds the limit of {limit}")]
    BatchTooLarge { size: usize, limit: usize },

    #[error("classification failed for {citing_id}: {reason}")]
    ClassificationFailed { citing_id: String, reason: String },
}
