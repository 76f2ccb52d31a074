//! Structured log events for key engine operations.
//!
//! Each function emits a `tracing` event carrying an `event` field so log
//! pipelines can filter on it.

/// An entity finished ingestion.
pub fn entity_ingested(entity_id: &str, chunks: usize, citations: usize, pending: usize) {
    tracing::info!(
        event = "entity_ingested",
        entity_id = %entity_id,
        chunks = chunks,
        citations = citations,
        pending = pending,
        "entity ingested"
    );
}

/// A citation classification went to human review instead of becoming an active edge.
pub fn citation_routed_to_review(
    citing_id: &str,
    reference: &str,
    treatment: &str,
    confidence: f64,
    edge_created: bool,
) {
    tracing::info!(
        event = "citation_routed_to_review",
        citing_id = %citing_id,
        reference = %reference,
        treatment = %treatment,
        confidence = confidence,
        edge_created = edge_created,
        "citation routed to review"
    );
}

/// A status change was appended.
pub fn status_changed(entity_id: &str, from: &str, to: &str, triggering_entity_id: Option<&str>) {
    tracing::info!(
        event = "status_changed",
        entity_id = %entity_id,
        from = %from,
        to = %to,
        triggering_entity_id = ?triggering_entity_id,
        "precedent status changed"
    );
}

/// A subsystem fell back to a lower-quality mode.
pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}

/// A degraded subsystem is back on its primary path.
pub fn degradation_recovered(component: &str, occurrences: u32) {
    tracing::info!(
        event = "degradation_recovered",
        component = %component,
        occurrences,
        "degradation recovered"
    );
}

/// A data-quality defect was detected and queued for review.
pub fn data_quality_flagged(kind: &str, entity_id: &str, detail: &str) {
    tracing::warn!(
        event = "data_quality_flagged",
        kind = %kind,
        entity_id = %entity_id,
        detail = %detail,
        "data quality issue flagged"
    );
}

/// A trust recompute pass finished.
pub fn trust_pass_completed(entities: usize, chunks: usize, duration_ms: u64) {
    tracing::info!(
        event = "trust_pass_completed",
        entities = entities,
        chunks = chunks,
        duration_ms = duration_ms,
        "trust pass completed"
    );
}

/// A query completed.
pub fn query_completed(intent: &str, results: usize, degraded: bool, duration_ms: u64) {
    tracing::info!(
        event = "query_completed",
        intent = %intent,
        results = results,
        degraded = degraded,
        duration_ms = duration_ms,
        "query completed"
    );
}
