//! Copy-on-write graph state. Cloning is the snapshot mechanism: the
//! store hands out `Arc<GraphState>` and writers `Arc::make_mut` it.

mod citations;
mod entities;
mod review;
mod status;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use precedent_core::models::{
    Chunk, CitationEdge, CrossJurisdictionRelation, LegalEntity, PrecedentStatus, ReviewItem,
    StatusChange,
};

use crate::indexed::IndexedGraph;

/// Everything the engine knows, as one cloneable value.
#[derive(Debug, Clone, Default)]
pub struct GraphState {
    /// Incremented on every mutation; lets readers cache derived indexes.
    pub(crate) generation: u64,
    /// entity_id → versions ordered by version number.
    pub(crate) entities: HashMap<String, Vec<LegalEntity>>,
    /// normalized alias → entity ids declaring it.
    pub(crate) alias_index: HashMap<String, BTreeSet<String>>,
    pub(crate) aliases_by_entity: HashMap<String, Vec<String>>,
    /// entity_id → chunks ordered by chunk_index.
    pub(crate) chunks: HashMap<String, Vec<Chunk>>,
    /// edge_id → edge, resolved and unresolved alike.
    pub(crate) citations: HashMap<String, CitationEdge>,
    pub(crate) edges_by_citing: HashMap<String, BTreeSet<String>>,
    pub(crate) graph: IndexedGraph,
    /// entity_id → append-only status log.
    pub(crate) status_log: HashMap<String, Vec<StatusChange>>,
    /// Denormalized current status, rewritten on every append.
    pub(crate) status_cache: HashMap<String, PrecedentStatus>,
    pub(crate) relations: BTreeMap<String, CrossJurisdictionRelation>,
    pub(crate) review_queue: BTreeMap<String, ReviewItem>,
}

impl GraphState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn graph(&self) -> &IndexedGraph {
        &self.graph
    }

    pub(crate) fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}
