//! Span definitions per operation: ingestion, retrieval, maintenance.

/// Create an ingestion span.
#[macro_export]
macro_rules! ingest_span {
    ($entity_id:expr, $kind:expr) => {
        tracing::info_span!("precedent.ingest", entity_id = %$entity_id, kind = %$kind)
    };
}

/// Create a retrieval span.
#[macro_export]
macro_rules! retrieval_span {
    ($query:expr) => {
        tracing::info_span!("precedent.retrieval", query = %$query)
    };
}

/// Create a maintenance span.
#[macro_export]
macro_rules! maintenance_span {
    ($pass:expr) => {
        tracing::info_span!("precedent.maintenance", pass = %$pass)
    };
}
