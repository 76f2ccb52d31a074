//! Graph expansion from the strongest direct hits.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use precedent_core::config::RetrievalConfig;
use precedent_core::models::{Chunk, ChunkType, TreatmentContext};
use precedent_graph::traversal::expand;
use precedent_graph::{ExpansionConfig, GraphState};

use crate::search::Candidate;

/// The chunk that best represents an entity reached by expansion: its
/// holding, else its statute text, else its first chunk.
pub fn representative_chunk(chunks: &[Chunk]) -> Option<&Chunk> {
    chunks
        .iter()
        .find(|c| c.chunk_type == ChunkType::Holding)
        .or_else(|| chunks.iter().find(|c| c.chunk_type == ChunkType::StatuteText))
        .or_else(|| chunks.first())
}

/// Candidates for entities one or more citation hops from the top
/// `expansion_seed_k` entities in `direct`. Each scores its parent's score
/// times `hop_decay`. Entities already in `direct` are not repeated.
pub fn expand_candidates(
    state: &GraphState,
    direct: &[Candidate],
    config: &RetrievalConfig,
) -> Vec<Candidate> {
    let mut scores: HashMap<String, f64> = HashMap::new();
    let mut seeds = Vec::new();
    for candidate in direct {
        if seeds.len() >= config.expansion_seed_k {
            break;
        }
        if !scores.contains_key(&candidate.entity_id) {
            scores.insert(candidate.entity_id.clone(), candidate.score);
            seeds.push(candidate.entity_id.clone());
        }
    }
    if seeds.is_empty() {
        return Vec::new();
    }

    let present: HashSet<&str> = direct.iter().map(|c| c.entity_id.as_str()).collect();
    let nodes = expand(
        state,
        &seeds,
        &ExpansionConfig {
            max_hops: config.max_hops,
            budget: config.expansion_budget,
            include_pending: false,
        },
    );

    let mut expanded = Vec::new();
    for node in nodes {
        let parent = scores.get(&node.via_entity_id).copied().unwrap_or(0.0);
        let score = parent * config.hop_decay;
        scores.insert(node.entity_id.clone(), score);
        if present.contains(node.entity_id.as_str()) {
            continue;
        }
        let Some(chunk) = representative_chunk(state.chunks(&node.entity_id)) else {
            continue;
        };
        let context = state.citation(&node.edge_id).and_then(|e| e.context.clone());
        expanded.push(Candidate {
            chunk_id: chunk.id.clone(),
            entity_id: node.entity_id,
            score,
            hop_distance: node.hop as u32,
            treatment_context: Some(TreatmentContext {
                via_entity_id: node.via_entity_id,
                treatment: node.treatment,
                context,
            }),
        });
    }
    debug!(seeds = seeds.len(), added = expanded.len(), "graph expansion");
    expanded
}
