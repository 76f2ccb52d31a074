//! Batch trust recompute over a snapshot.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rayon::prelude::*;
use tracing::debug;

use precedent_core::config::TrustConfig;
use precedent_core::errors::PrecedentResult;
use precedent_core::models::TrustBlock;
use precedent_graph::{GraphState, IGraphStore};
use precedent_observability::events;

use crate::dirty::DirtySet;
use crate::formula::{self, TrustInputs};

/// Outcome of one recompute pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrustPassReport {
    pub entities_rescored: usize,
    pub chunks_rescored: usize,
    pub duration_ms: u64,
}

/// Recomputes trust for dirty entities without blocking ingestion: scores
/// are computed in parallel over an immutable snapshot and written back
/// in a single short store write.
pub struct TrustMaintenance {
    store: Arc<dyn IGraphStore>,
    dirty: Arc<DirtySet>,
    config: TrustConfig,
}

impl TrustMaintenance {
    pub fn new(store: Arc<dyn IGraphStore>, dirty: Arc<DirtySet>, config: TrustConfig) -> Self {
        Self {
            store,
            dirty,
            config,
        }
    }

    pub fn dirty(&self) -> &Arc<DirtySet> {
        &self.dirty
    }

    /// Rescore dirty entities, or every entity when `full` is set.
    pub fn run_pass(&self, full: bool) -> PrecedentResult<TrustPassReport> {
        let started = Instant::now();
        // Drain before snapshotting so every marked write is visible.
        let drained = self.dirty.drain();
        let snapshot = self.store.snapshot();
        let ids: Vec<String> = if full {
            snapshot.entity_ids().cloned().collect()
        } else {
            drained.clone()
        };

        let (entity_updates, chunk_updates) = score_all(&snapshot, &ids, &self.config);
        let entities_rescored = entity_updates.len();
        let chunks_rescored = chunk_updates.len();

        if let Err(e) = self.store.apply_trust(entity_updates, chunk_updates) {
            self.dirty.mark_all(&drained);
            return Err(e);
        }

        let report = TrustPassReport {
            entities_rescored,
            chunks_rescored,
            duration_ms: started.elapsed().as_millis() as u64,
        };
        events::trust_pass_completed(
            report.entities_rescored,
            report.chunks_rescored,
            report.duration_ms,
        );
        Ok(report)
    }
}

type Updates = Vec<(String, TrustBlock)>;

fn score_all(state: &GraphState, ids: &[String], config: &TrustConfig) -> (Updates, Updates) {
    let now = Utc::now();
    let per_entity: Vec<(Updates, Updates)> = ids
        .par_iter()
        .filter_map(|id| {
            let entity = state.current(id)?;
            let citation_count = state.active_citation_count(id);

            let inputs = TrustInputs::for_entity(entity, citation_count, now);
            let entity_block = TrustBlock {
                trust_score: formula::compute(&inputs, config),
                citation_count,
                ..entity.trust.clone()
            };

            let chunk_blocks: Updates = state
                .chunks(id)
                .iter()
                .map(|chunk| {
                    let inputs = TrustInputs::for_chunk(chunk, entity, citation_count, now);
                    let block = TrustBlock {
                        trust_score: formula::compute(&inputs, config),
                        verification_status: entity.trust.verification_status,
                        citation_count,
                        parser_confidence: chunk.trust.parser_confidence,
                    };
                    (chunk.id.clone(), block)
                })
                .collect();

            debug!(
                entity_id = %id,
                trust = entity_block.trust_score,
                citations = citation_count,
                "rescored entity"
            );
            Some((vec![(id.clone(), entity_block)], chunk_blocks))
        })
        .collect();

    let mut entities = Vec::with_capacity(per_entity.len());
    let mut chunks = Vec::new();
    for (e, c) in per_entity {
        entities.extend(e);
        chunks.extend(c);
    }
    (entities, chunks)
}
