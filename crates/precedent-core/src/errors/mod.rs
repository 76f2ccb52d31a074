//! Error hierarchy. Each subsystem has its own enum; `PrecedentError`
//! wraps them so callers propagate a single type with `?`.

mod embedding_error;
mod graph_error;
mod ingest_error;
mod retrieval_error;
mod storage_error;
mod temporal_error;

pub use embedding_error::EmbeddingError;
pub use graph_error::GraphError;
pub use ingest_error::IngestError;
pub use retrieval_error::RetrievalError;
pub use storage_error::StorageError;
pub use temporal_error::TemporalError;

/// Top-level error for every fallible Precedent operation.
#[derive(Debug, thiserror::Error)]
pub enum PrecedentError {
    #[error("entity not found: {id}")]
    EntityNotFound { id: String },

    #[error("citation edge not found: {id}")]
    CitationNotFound { id: String },

    #[error("invalid entity {id}: {reason}")]
    InvalidEntity { id: String, reason: String },

    #[error("graph error: {0}")]
    GraphError(#[from] GraphError),

    #[error("temporal error: {0}")]
    TemporalError(#[from] TemporalError),

    #[error("ingest error: {0}")]
    IngestError(#[from] IngestError),

    #[error("retrieval error: {0}")]
    RetrievalError(#[from] RetrievalError),

    #[error("embedding error: {0}")]
    EmbeddingError(#[from] EmbeddingError),

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("concurrency error: {0}")]
    ConcurrencyError(String),

    #[error("{component} timed out after {timeout_ms}ms")]
    Timeout { component: String, timeout_ms: u64 },

    #[error("degraded mode: {component} fell back to {fallback}")]
    DegradedMode { component: String, fallback: String },
}

pub type PrecedentResult<T> = Result<T, PrecedentError>;

impl From<toml::de::Error> for PrecedentError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError(err.to_string())
    }
}
