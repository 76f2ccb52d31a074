//! The per-entity ingestion pipeline.
//!
//! chunk → extract → resolve → classify → route by acceptance → propagate
//! status → mark trust dirty → embed. Distinct entities ingest in
//! parallel; one entity's runs are serialized by [`EntityLocks`].
//!
//! An ingest reaches the store in three writes: the entity with its
//! chunks, then its citations with the review items and status changes
//! they produce, then the chunk embeddings.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn, Instrument};

use precedent_core::config::{ClassificationConfig, PrecedentConfig};
use precedent_core::constants::{MAX_INGEST_BATCH_SIZE, RULE_EXTRACTOR};
use precedent_core::errors::{GraphError, IngestError, PrecedentError, PrecedentResult};
use precedent_core::models::{
    Chunk, CitationEdge, DegradationEvent, EdgeState, EntityAttributes, EntityKind, IngestReport,
    LegalEntity, Provenance, ReviewItem, ReviewKind, SourceMeta, StatusChange, Treatment,
    TrustBlock,
};
use precedent_core::traits::ITreatmentModel;
use precedent_embeddings::engine::embed_chunks_with_timeout;
use precedent_embeddings::EmbeddingEngine;
use precedent_graph::{normalize_reference, GraphState, IGraphStore};
use precedent_observability::{events, DegradationTracker};
use precedent_temporal::status::{apply_treatment_in, log_change};
use precedent_temporal::versioning::register_in;
use precedent_trust::DirtySet;

use crate::chunker::{self, sentences, Chunker};
use crate::citations::{self, CitationExtractor, ExtractedReference};
use crate::classifier::{Acceptance, ClassificationInput, TreatmentClassifier};
use crate::locks::EntityLocks;
use crate::tokens::TokenCounter;

/// Characters of the leading sentence kept in an entity summary.
const SUMMARY_CHARS: usize = 200;

/// One document of a batch.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    pub entity_id: String,
    pub kind: EntityKind,
    pub text: String,
    pub meta: SourceMeta,
}

/// Shared collaborators handed to the pipeline.
pub struct PipelineDeps {
    pub store: Arc<dyn IGraphStore>,
    pub dirty: Arc<DirtySet>,
    pub embeddings: Arc<EmbeddingEngine>,
    pub degradations: Arc<Mutex<DegradationTracker>>,
}

pub struct IngestionPipeline {
    store: Arc<dyn IGraphStore>,
    chunker: Chunker,
    extractor: CitationExtractor,
    classifier: TreatmentClassifier,
    dirty: Arc<DirtySet>,
    embeddings: Arc<EmbeddingEngine>,
    degradations: Arc<Mutex<DegradationTracker>>,
    locks: EntityLocks,
    classification: ClassificationConfig,
    embed_timeout: Duration,
}

/// Counters and follow-ups gathered while routing one entity's citations.
#[derive(Default)]
struct Routing {
    extracted: usize,
    pending: usize,
    rejected: usize,
    status_changes: usize,
    touched: HashSet<String>,
    errors: Vec<String>,
}

/// What routing did with one edge, reported once the write commits.
enum Routed {
    /// Below the review floor: a review item, no edge.
    Rejected(CitationEdge),
    Pending(CitationEdge),
    Accepted(CitationEdge, Option<StatusChange>),
    /// A treatment conflict, queued for review.
    Conflict(CitationEdge, String),
    /// An endpoint vanished.
    Missing(CitationEdge, String),
}

impl IngestionPipeline {
    pub fn new(deps: PipelineDeps, config: &PrecedentConfig) -> PrecedentResult<Self> {
        let counter = Arc::new(TokenCounter::new(config.chunking.token_cache_capacity)?);
        Ok(Self {
            chunker: Chunker::new(counter, config.chunking.clone()),
            extractor: CitationExtractor::new(),
            classifier: TreatmentClassifier::new(),
            store: deps.store,
            dirty: deps.dirty,
            embeddings: deps.embeddings,
            degradations: deps.degradations,
            locks: EntityLocks::new(),
            classification: config.classification.clone(),
            embed_timeout: Duration::from_millis(config.retrieval.embed_timeout_ms),
        })
    }

    /// Put a learned treatment model in the classification chain.
    pub fn with_treatment_model(mut self, model: Arc<dyn ITreatmentModel>) -> Self {
        self.classifier = TreatmentClassifier::with_model(model);
        self
    }

    pub fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    /// Ingest one entity's text. Unchanged text (same content hash, chunks
    /// present) is a no-op reported with `unchanged = true`.
    pub async fn ingest(
        &self,
        entity_id: &str,
        kind: EntityKind,
        text: &str,
        meta: SourceMeta,
    ) -> PrecedentResult<IngestReport> {
        let span = precedent_observability::ingest_span!(entity_id, kind);
        self.ingest_locked(entity_id, kind, text, meta)
            .instrument(span)
            .await
    }

    async fn ingest_locked(
        &self,
        entity_id: &str,
        kind: EntityKind,
        text: &str,
        meta: SourceMeta,
    ) -> PrecedentResult<IngestReport> {
        if text.trim().is_empty() {
            return Err(IngestError::EmptyText {
                entity_id: entity_id.to_string(),
            }
            .into());
        }
        let _guard = self.locks.acquire(entity_id).await;

        let hash = chunker::content_hash(text);
        let before = self.store.snapshot();
        let existing = before.current(entity_id).cloned();
        if let Some(current) = &existing {
            if current.content_hash == hash
                && current.kind == kind
                && !before.chunks(entity_id).is_empty()
            {
                debug!(entity_id, "content unchanged, skipping");
                return Ok(IngestReport {
                    entity_id: entity_id.to_string(),
                    unchanged: true,
                    ..IngestReport::default()
                });
            }
        }
        drop(before);

        let mut entity = build_entity(entity_id, kind, text, &meta, hash, existing.as_ref());
        let chunks = self.chunker.chunk(&entity, text);
        entity.trust.parser_confidence = chunker::parser_confidence(&chunks);

        let mut routing = Routing::default();
        for removed in self.commit_entity(entity, existing.as_ref(), &chunks)? {
            if let Some(cited) = removed.cited_id {
                routing.touched.insert(cited);
            }
        }
        let edges = self.plan_citations(entity_id, &chunks, &mut routing);
        self.commit_citations(edges, &mut routing)?;

        self.dirty.mark(entity_id);
        self.dirty.mark_all(routing.touched.iter());

        self.embed(&chunks).await;

        events::entity_ingested(entity_id, chunks.len(), routing.extracted, routing.pending);
        Ok(IngestReport {
            entity_id: entity_id.to_string(),
            chunks_created: chunks.len(),
            citations_extracted: routing.extracted,
            citations_pending: routing.pending,
            citations_rejected: routing.rejected,
            status_changes: routing.status_changes,
            unchanged: false,
            errors: routing.errors,
        })
    }

    /// Ingest many entities concurrently. A failure on one entity is
    /// reported in its own `IngestReport` and never aborts the batch.
    pub async fn ingest_batch(
        self: &Arc<Self>,
        requests: Vec<IngestRequest>,
    ) -> PrecedentResult<Vec<IngestReport>> {
        if requests.len() > MAX_INGEST_BATCH_SIZE {
            return Err(IngestError::BatchTooLarge {
                size: requests.len(),
                limit: MAX_INGEST_BATCH_SIZE,
            }
            .into());
        }
        let ids: Vec<String> = requests.iter().map(|r| r.entity_id.clone()).collect();
        let mut tasks = JoinSet::new();
        for (index, request) in requests.into_iter().enumerate() {
            let pipeline = Arc::clone(self);
            tasks.spawn(async move {
                let result = pipeline
                    .ingest(&request.entity_id, request.kind, &request.text, request.meta)
                    .await;
                (index, result)
            });
        }

        let mut reports: Vec<Option<IngestReport>> = vec![None; ids.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(report))) => reports[index] = Some(report),
                Ok((index, Err(e))) => {
                    warn!(entity_id = %ids[index], error = %e, "ingest failed");
                    reports[index] = Some(IngestReport::failed(&ids[index], e.to_string()));
                }
                Err(join) => warn!(error = %join, "ingest task aborted"),
            }
        }
        Ok(reports
            .into_iter()
            .zip(ids)
            .map(|(report, id)| {
                report.unwrap_or_else(|| IngestReport::failed(id, "ingest task aborted"))
            })
            .collect())
    }

    /// Retry alias resolution for edges whose cited entity was unknown at
    /// extraction time. Returns the number of edges linked.
    pub fn resolve_pending_references(&self) -> PrecedentResult<usize> {
        let snapshot = self.store.snapshot();
        let unresolved: Vec<CitationEdge> = snapshot
            .all_citations()
            .filter(|e| !e.is_resolved())
            .cloned()
            .collect();

        let mut relinked = Vec::new();
        for mut edge in unresolved {
            let Some(hit) = self
                .extractor
                .extract(&edge.raw_reference)
                .first()
                .and_then(|r| citations::resolve(&snapshot, r))
            else {
                continue;
            };
            if hit.entity_id == edge.citing_id {
                continue;
            }
            edge.cited_id = Some(hit.entity_id.clone());
            edge.reference_key = normalize_reference(&hit.matched);
            relinked.push(edge);
        }
        drop(snapshot);
        if relinked.is_empty() {
            return Ok(0);
        }

        let mut outcomes = Vec::new();
        let mut slot = Some(relinked);
        self.store.write(&mut |state| {
            for edge in slot.take().unwrap_or_default() {
                outcomes.push(match state.add_citation(edge.clone()) {
                    Ok(()) => {
                        let change = apply_treatment_in(state, &edge)?;
                        Routed::Accepted(edge, change)
                    }
                    Err(e) => link_failure_in(state, edge, e)?,
                });
            }
            Ok(())
        })?;

        let mut linked = 0;
        let mut routing = Routing::default();
        for outcome in outcomes {
            if matches!(outcome, Routed::Accepted(..)) {
                linked += 1;
            }
            self.report(outcome, &mut routing);
        }
        self.dirty.mark_all(routing.touched.iter());
        if linked > 0 {
            info!(linked, "resolved previously unlinked references");
        }
        Ok(linked)
    }

    // --- steps ---

    /// Store the entity version and its chunks, and drop the previous
    /// extraction's outgoing edges with their review items, in one write.
    /// Returns the dropped edges.
    fn commit_entity(
        &self,
        mut entity: LegalEntity,
        existing: Option<&LegalEntity>,
        chunks: &[Chunk],
    ) -> PrecedentResult<Vec<CitationEdge>> {
        let entity_id = entity.id.clone();
        let replaces = existing.is_some_and(|current| starts_later(&entity, current));
        if let Some(current) = existing.filter(|_| !replaces) {
            entity.version = current.version;
            entity.valid_from = entity.valid_from.or(current.valid_from);
        }
        let uncertain = self.uncertain_chunks_item(&entity_id, chunks);

        let mut slot = Some((entity, chunks.to_vec(), uncertain.clone()));
        let mut registered = None;
        let mut removed = Vec::new();
        self.store.write(&mut |state| {
            let Some((entity, chunks, uncertain)) = slot.take() else {
                return Ok(());
            };
            match (existing, replaces) {
                (None, _) => state.insert_version(entity)?,
                (Some(_), true) => registered = Some(register_in(state, entity)?.version),
                (Some(_), false) => state.update_version(entity)?,
            }
            state.replace_chunks(&entity_id, chunks)?;
            if let Some(item) = uncertain {
                state.enqueue_review(item);
            }
            removed = state.remove_citations_from(&entity_id);
            for edge in &removed {
                state.remove_reviews_for_edge(&edge.id);
            }
            Ok(())
        })?;

        if let Some(version) = registered {
            info!(entity_id = %entity_id, version, "registered new version");
        }
        if let Some(item) = &uncertain {
            events::data_quality_flagged(item.kind.as_str(), &entity_id, &item.detail);
        }
        Ok(removed)
    }

    fn uncertain_chunks_item(&self, entity_id: &str, chunks: &[Chunk]) -> Option<ReviewItem> {
        let uncertain: Vec<String> = chunks
            .iter()
            .filter(|c| c.needs_review)
            .map(|c| c.chunk_index.to_string())
            .collect();
        if uncertain.is_empty() {
            return None;
        }
        let detail = format!(
            "chunk type below {:.2} for chunk(s) {}",
            self.chunker.config().type_review_threshold,
            uncertain.join(", ")
        );
        Some(ReviewItem::new(ReviewKind::ChunkTypeUncertain, entity_id, None, detail))
    }

    /// Extract, resolve and classify every reference in the chunks against
    /// the current graph. Nothing is written.
    fn plan_citations(&self, entity_id: &str, chunks: &[Chunk], routing: &mut Routing) -> Vec<CitationEdge> {
        let snapshot = self.store.snapshot();
        let extracted_at = Utc::now();
        let mut edges = Vec::new();
        for chunk in chunks {
            let mut seen: HashSet<String> = HashSet::new();
            let refs = self.extractor.extract(&chunk.text);
            for (index, reference) in refs.iter().enumerate() {
                let resolved = citations::resolve(&snapshot, reference);
                if resolved.as_ref().is_some_and(|r| r.entity_id == entity_id) {
                    continue;
                }
                let key = resolved
                    .as_ref()
                    .map_or_else(|| reference.key(), |r| normalize_reference(&r.matched));
                let dedupe = resolved.as_ref().map_or(key.clone(), |r| r.entity_id.clone());
                if !seen.insert(dedupe) {
                    continue;
                }
                routing.extracted += 1;

                let cited_id = resolved.map(|r| r.entity_id);
                edges.push(self.classify_reference(
                    &snapshot,
                    entity_id,
                    chunk,
                    (refs.as_slice(), index),
                    key,
                    cited_id,
                    extracted_at,
                ));
            }
        }
        edges
    }

    #[allow(clippy::too_many_arguments)]
    fn classify_reference(
        &self,
        snapshot: &GraphState,
        citing_id: &str,
        chunk: &Chunk,
        (refs, index): (&[ExtractedReference], usize),
        key: String,
        cited_id: Option<String>,
        extracted_at: chrono::DateTime<Utc>,
    ) -> CitationEdge {
        let reference = &refs[index];
        let context = self
            .extractor
            .context(&chunk.text, reference.start, reference.end);
        let clause = self.extractor.clause(&chunk.text, refs, index);
        let cited_summary = cited_id
            .as_deref()
            .and_then(|id| snapshot.current(id))
            .map(|e| e.summary.clone())
            .unwrap_or_default();
        let classification = self.classifier.classify(&ClassificationInput {
            citation_type: reference.citation_type,
            context: &clause,
            cited_summary: &cited_summary,
        });
        let state = match Acceptance::decide(classification.confidence, &self.classification) {
            Acceptance::AutoAccept => EdgeState::Active,
            Acceptance::PendingReview | Acceptance::Reject => EdgeState::PendingReview,
        };
        CitationEdge {
            id: CitationEdge::make_id(citing_id, Some(&chunk.id), &key, reference.start),
            citing_id: citing_id.to_string(),
            cited_id,
            chunk_id: Some(chunk.id.clone()),
            raw_reference: reference.raw.clone(),
            reference_key: key,
            citation_type: reference.citation_type,
            treatment: classification.treatment,
            confidence: classification.confidence,
            weight: classification.treatment.weight(),
            locator: reference.locator.clone(),
            context: Some(context),
            state,
            extracted_by: RULE_EXTRACTOR.to_string(),
            extracted_at,
        }
    }

    /// Route every planned edge by acceptance in one write: review items,
    /// edges and the status changes they trigger commit together.
    fn commit_citations(&self, edges: Vec<CitationEdge>, routing: &mut Routing) -> PrecedentResult<()> {
        if edges.is_empty() {
            return Ok(());
        }
        let mut outcomes = Vec::new();
        let mut slot = Some(edges);
        self.store.write(&mut |state| {
            for edge in slot.take().unwrap_or_default() {
                outcomes.push(self.route_in(state, edge)?);
            }
            Ok(())
        })?;
        for outcome in outcomes {
            self.report(outcome, routing);
        }
        Ok(())
    }

    fn route_in(&self, state: &mut GraphState, edge: CitationEdge) -> PrecedentResult<Routed> {
        let acceptance = Acceptance::decide(edge.confidence, &self.classification);
        if acceptance == Acceptance::Reject {
            let item = ReviewItem::new(
                ReviewKind::LowConfidenceCitation,
                edge.citing_id.clone(),
                edge.cited_id.clone(),
                format!(
                    "{} classified {} at {:.2}; no edge created",
                    edge.raw_reference, edge.treatment, edge.confidence
                ),
            )
            .with_confidence(edge.confidence);
            state.enqueue_review(item);
            return Ok(Routed::Rejected(edge));
        }

        if let Err(e) = state.add_citation(edge.clone()) {
            return link_failure_in(state, edge, e);
        }
        if acceptance == Acceptance::PendingReview {
            let item = ReviewItem::new(
                ReviewKind::PendingCitation,
                edge.citing_id.clone(),
                edge.cited_id.clone(),
                format!(
                    "{} classified {} at {:.2}",
                    edge.raw_reference, edge.treatment, edge.confidence
                ),
            )
            .with_edge(edge.id.clone())
            .with_confidence(edge.confidence);
            state.enqueue_review(item);
            return Ok(Routed::Pending(edge));
        }

        let change = apply_treatment_in(state, &edge)?;
        if let Some(item) = self.qualified_item(&edge) {
            state.enqueue_review(item);
        }
        Ok(Routed::Accepted(edge, change))
    }

    /// With `qualified_triggers_status`, an accepted `qualified` edge asks a
    /// human whether the cited authority's status should change.
    fn qualified_item(&self, edge: &CitationEdge) -> Option<ReviewItem> {
        if !self.classification.qualified_triggers_status || edge.treatment != Treatment::Qualified {
            return None;
        }
        let cited = edge.cited_id.as_deref()?;
        Some(
            ReviewItem::new(
                ReviewKind::QualifiedTreatment,
                cited,
                Some(edge.citing_id.clone()),
                format!("qualified by {}", edge.citing_id),
            )
            .with_edge(edge.id.clone())
            .with_confidence(edge.confidence),
        )
    }

    /// Events and counters for a committed routing outcome.
    fn report(&self, outcome: Routed, routing: &mut Routing) {
        match outcome {
            Routed::Rejected(edge) => {
                routing.rejected += 1;
                events::citation_routed_to_review(
                    &edge.citing_id,
                    &edge.raw_reference,
                    edge.treatment.as_str(),
                    edge.confidence,
                    false,
                );
            }
            Routed::Pending(edge) => {
                routing.pending += 1;
                routing.touched.extend(edge.cited_id.clone());
                events::citation_routed_to_review(
                    &edge.citing_id,
                    &edge.raw_reference,
                    edge.treatment.as_str(),
                    edge.confidence,
                    true,
                );
            }
            Routed::Accepted(edge, change) => {
                routing.touched.extend(edge.cited_id);
                if let Some(change) = change {
                    routing.status_changes += 1;
                    log_change(&change);
                }
            }
            Routed::Conflict(edge, detail) => {
                events::data_quality_flagged("treatment_conflict", &edge.citing_id, &detail);
            }
            Routed::Missing(edge, message) => {
                warn!(edge_id = %edge.id, error = %message, "citation endpoint missing");
                routing.errors.push(message);
            }
        }
    }

    /// Embed chunks with the primary provider under a timeout. Failure
    /// leaves the chunks unembedded and records a degradation.
    async fn embed(&self, chunks: &[Chunk]) {
        if chunks.is_empty() {
            return;
        }
        let result =
            embed_chunks_with_timeout(Arc::clone(&self.embeddings), chunks.to_vec(), self.embed_timeout)
                .await;
        let outcome = result.and_then(|embedded| {
            let vectors = embedded.into_iter().map(|(id, e)| (id, e.vector)).collect();
            self.store
                .set_chunk_embeddings(self.embeddings.primary_model(), vectors)
        });
        let mut tracker = match self.degradations.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match outcome {
            Ok(()) => {
                tracker.mark_recovered("embeddings");
            }
            Err(e) => tracker.record(DegradationEvent::new(
                "embeddings",
                e.to_string(),
                "chunks left unembedded; keyword search only",
            )),
        }
    }
}

/// A treatment conflict becomes a review item and a vanished endpoint a
/// report message; anything else propagates.
fn link_failure_in(
    state: &mut GraphState,
    edge: CitationEdge,
    error: PrecedentError,
) -> PrecedentResult<Routed> {
    match error {
        PrecedentError::GraphError(GraphError::TreatmentConflict { .. }) => {
            let detail = error.to_string();
            let item = ReviewItem::new(
                ReviewKind::TreatmentConflict,
                edge.citing_id.clone(),
                edge.cited_id.clone(),
                detail.clone(),
            )
            .with_edge(edge.id.clone())
            .with_confidence(edge.confidence);
            state.enqueue_review(item);
            Ok(Routed::Conflict(edge, detail))
        }
        PrecedentError::EntityNotFound { .. } => Ok(Routed::Missing(edge, error.to_string())),
        other => Err(other),
    }
}

/// A new version is registered when the incoming text declares a later
/// validity start than the stored current version.
fn starts_later(incoming: &LegalEntity, current: &LegalEntity) -> bool {
    match (incoming.valid_from, current.valid_from) {
        (Some(new), Some(old)) => new > old,
        _ => false,
    }
}

fn build_entity(
    entity_id: &str,
    kind: EntityKind,
    text: &str,
    meta: &SourceMeta,
    content_hash: String,
    existing: Option<&LegalEntity>,
) -> LegalEntity {
    let extracted_by = meta
        .extracted_by
        .clone()
        .unwrap_or_else(|| RULE_EXTRACTOR.to_string());
    let provenance = Provenance::new(meta.source.clone(), meta.source_tier, extracted_by)
        .with_confidence(meta.confidence_score.unwrap_or(1.0));
    let trust = TrustBlock {
        verification_status: meta.verification_status,
        ..existing.map(|e| e.trust.clone()).unwrap_or_default()
    };
    LegalEntity {
        id: entity_id.to_string(),
        kind,
        version: 1,
        valid_from: meta.valid_from,
        valid_to: meta.valid_to,
        is_current_version: true,
        attributes: EntityAttributes {
            title: meta.title.clone(),
            jurisdiction: meta.jurisdiction.clone(),
            court_level: meta.court_level,
            decision_date: meta.decision_date,
            aliases: meta.aliases.clone(),
            extra: meta.extra.clone(),
        },
        summary: summarize(&meta.title, text),
        content_hash,
        provenance,
        trust,
    }
}

/// Title plus the opening sentence, cut to [`SUMMARY_CHARS`].
fn summarize(title: &str, text: &str) -> String {
    let opening = sentences::spans(text, 0, text.len())
        .first()
        .map(|&(s, e)| text[s..e].chars().take(SUMMARY_CHARS).collect::<String>())
        .unwrap_or_default();
    match (title.is_empty(), opening.is_empty()) {
        (true, _) => opening,
        (false, true) => title.to_string(),
        (false, false) => format!("{title}: {opening}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_combines_title_and_opening() {
        assert_eq!(
            summarize("Alpha v. Beta", "1. The appellant sued. It failed."),
            "Alpha v. Beta: 1. The appellant sued."
        );
        assert_eq!(summarize("", "Only text."), "Only text.");
    }

    #[test]
    fn later_start_registers_a_version() {
        let mut old = test_fixtures::version("s", 1, 1908, None, true);
        let new = test_fixtures::version("s", 1, 2020, None, true);
        assert!(starts_later(&new, &old));
        old.valid_from = None;
        assert!(!starts_later(&new, &old));
    }
}
