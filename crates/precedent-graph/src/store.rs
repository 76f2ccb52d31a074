//! Graph store abstraction and its in-memory copy-on-write implementation.

use std::sync::{Arc, RwLock};

use precedent_core::errors::{PrecedentError, PrecedentResult};
use precedent_core::models::{
    Chunk, CitationEdge, CrossJurisdictionRelation, EdgeState, LegalEntity, PrecedentStatus,
    ResolutionStatus, ReviewItem, StatusChange, TrustBlock,
};

use crate::state::GraphState;

/// The graph store every subsystem reads and writes through.
///
/// Reads go through [`IGraphStore::snapshot`] or the convenience accessors
/// below. Every `GraphState` mutation validates before it touches state, so a
/// rejected write leaves the store unchanged.
pub trait IGraphStore: Send + Sync {
    /// Consistent, immutable view of the whole graph.
    fn snapshot(&self) -> Arc<GraphState>;

    /// Run a batch of mutations atomically against the state.
    fn write(&self, f: &mut dyn FnMut(&mut GraphState) -> PrecedentResult<()>) -> PrecedentResult<()>;

    // --- Entities ---

    fn insert_version(&self, entity: LegalEntity) -> PrecedentResult<()> {
        let mut slot = Some(entity);
        self.write(&mut |state| match slot.take() {
            Some(entity) => state.insert_version(entity),
            None => Ok(()),
        })
    }

    fn update_version(&self, entity: LegalEntity) -> PrecedentResult<()> {
        let mut slot = Some(entity);
        self.write(&mut |state| match slot.take() {
            Some(entity) => state.update_version(entity),
            None => Ok(()),
        })
    }

    fn commit_versions(&self, entity_id: &str, versions: Vec<LegalEntity>) -> PrecedentResult<()> {
        let mut slot = Some(versions);
        self.write(&mut |state| match slot.take() {
            Some(versions) => state.commit_versions(entity_id, versions),
            None => Ok(()),
        })
    }

    fn get_current(&self, entity_id: &str) -> Option<LegalEntity> {
        self.snapshot().current(entity_id).cloned()
    }

    fn get_versions(&self, entity_id: &str) -> Vec<LegalEntity> {
        self.snapshot().versions(entity_id).to_vec()
    }

    fn resolve_alias(&self, reference: &str) -> Option<String> {
        self.snapshot().resolve_alias(reference).map(str::to_string)
    }

    // --- Chunks ---

    fn replace_chunks(&self, entity_id: &str, chunks: Vec<Chunk>) -> PrecedentResult<()> {
        let mut slot = Some(chunks);
        self.write(&mut |state| match slot.take() {
            Some(chunks) => state.replace_chunks(entity_id, chunks),
            None => Ok(()),
        })
    }

    fn get_chunks(&self, entity_id: &str) -> Vec<Chunk> {
        self.snapshot().chunks(entity_id).to_vec()
    }

    fn set_chunk_embeddings(
        &self,
        model: &str,
        embeddings: Vec<(String, Vec<f32>)>,
    ) -> PrecedentResult<()> {
        let mut slot = Some(embeddings);
        self.write(&mut |state| {
            for (chunk_id, embedding) in slot.take().unwrap_or_default() {
                state.set_chunk_embedding(&chunk_id, model, embedding)?;
            }
            Ok(())
        })
    }

    fn apply_trust(
        &self,
        entity_updates: Vec<(String, TrustBlock)>,
        chunk_updates: Vec<(String, TrustBlock)>,
    ) -> PrecedentResult<usize> {
        let mut slot = Some((entity_updates, chunk_updates));
        let mut applied = 0;
        self.write(&mut |state| {
            if let Some((entities, chunks)) = slot.take() {
                applied = state.apply_trust(entities, chunks);
            }
            Ok(())
        })?;
        Ok(applied)
    }

    // --- Citations ---

    fn add_citation(&self, edge: CitationEdge) -> PrecedentResult<()> {
        let mut slot = Some(edge);
        self.write(&mut |state| match slot.take() {
            Some(edge) => state.add_citation(edge),
            None => Ok(()),
        })
    }

    fn remove_citations_from(&self, citing_id: &str) -> PrecedentResult<Vec<CitationEdge>> {
        let mut removed = Vec::new();
        self.write(&mut |state| {
            removed = state.remove_citations_from(citing_id);
            Ok(())
        })?;
        Ok(removed)
    }

    fn citations_from(&self, citing_id: &str) -> Vec<CitationEdge> {
        self.snapshot()
            .citations_from(citing_id)
            .into_iter()
            .cloned()
            .collect()
    }

    fn citations_to(&self, cited_id: &str) -> Vec<CitationEdge> {
        self.snapshot()
            .citations_to(cited_id)
            .into_iter()
            .cloned()
            .collect()
    }

    fn get_citation(&self, edge_id: &str) -> Option<CitationEdge> {
        self.snapshot().citation(edge_id).cloned()
    }

    fn set_citation_state(&self, edge_id: &str, state: EdgeState) -> PrecedentResult<CitationEdge> {
        let mut updated = None;
        self.write(&mut |graph| {
            updated = Some(graph.set_citation_state(edge_id, state)?);
            Ok(())
        })?;
        updated.ok_or_else(|| PrecedentError::CitationNotFound {
            id: edge_id.to_string(),
        })
    }

    fn remove_citation(&self, edge_id: &str) -> PrecedentResult<CitationEdge> {
        let mut removed = None;
        self.write(&mut |state| {
            removed = Some(state.remove_citation(edge_id)?);
            Ok(())
        })?;
        removed.ok_or_else(|| PrecedentError::CitationNotFound {
            id: edge_id.to_string(),
        })
    }

    // --- Status log ---

    fn append_status_change(&self, change: StatusChange) -> PrecedentResult<StatusChange> {
        let mut slot = Some(change);
        let mut appended = None;
        self.write(&mut |state| {
            if let Some(change) = slot.take() {
                appended = Some(state.append_status_change(change)?);
            }
            Ok(())
        })?;
        appended.ok_or_else(|| PrecedentError::ConcurrencyError("status append lost".into()))
    }

    fn status_history(&self, entity_id: &str) -> Vec<StatusChange> {
        self.snapshot().status_history(entity_id).to_vec()
    }

    fn current_status(&self, entity_id: &str) -> PrecedentStatus {
        self.snapshot().current_status(entity_id)
    }

    // --- Cross-jurisdiction relations ---

    fn add_relation(&self, relation: CrossJurisdictionRelation) -> PrecedentResult<()> {
        let mut slot = Some(relation);
        self.write(&mut |state| match slot.take() {
            Some(relation) => state.add_relation(relation),
            None => Ok(()),
        })
    }

    fn update_resolution(
        &self,
        relation_id: &str,
        next: ResolutionStatus,
    ) -> PrecedentResult<CrossJurisdictionRelation> {
        let mut updated = None;
        self.write(&mut |state| {
            updated = Some(state.update_resolution(relation_id, next)?);
            Ok(())
        })?;
        updated.ok_or_else(|| PrecedentError::ConcurrencyError("resolution update lost".into()))
    }

    // --- Review queue ---

    fn enqueue_review(&self, item: ReviewItem) -> PrecedentResult<bool> {
        let mut slot = Some(item);
        let mut inserted = false;
        self.write(&mut |state| {
            if let Some(item) = slot.take() {
                inserted = state.enqueue_review(item);
            }
            Ok(())
        })?;
        Ok(inserted)
    }

    fn review_items(&self) -> Vec<ReviewItem> {
        self.snapshot().review_items().into_iter().cloned().collect()
    }

    fn remove_review(&self, id: &str) -> PrecedentResult<Option<ReviewItem>> {
        let mut removed = None;
        self.write(&mut |state| {
            removed = state.remove_review(id);
            Ok(())
        })?;
        Ok(removed)
    }
}

/// In-memory store: `RwLock<Arc<GraphState>>`.
///
/// Writers take the lock briefly and `Arc::make_mut` the state; when a
/// maintenance pass still holds an older snapshot the write lands on a
/// fresh copy, so snapshots are never observed changing.
pub struct InMemoryGraphStore {
    state: RwLock<Arc<GraphState>>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::from_state(GraphState::new())
    }

    pub fn from_state(state: GraphState) -> Self {
        Self {
            state: RwLock::new(Arc::new(state)),
        }
    }
}

impl Default for InMemoryGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IGraphStore for InMemoryGraphStore {
    fn snapshot(&self) -> Arc<GraphState> {
        match self.state.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    fn write(&self, f: &mut dyn FnMut(&mut GraphState) -> PrecedentResult<()>) -> PrecedentResult<()> {
        let mut guard = self
            .state
            .write()
            .map_err(|e| PrecedentError::ConcurrencyError(e.to_string()))?;
        f(Arc::make_mut(&mut *guard))
    }
}
