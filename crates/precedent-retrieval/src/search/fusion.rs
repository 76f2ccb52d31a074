//! Weighted fusion of keyword and vector hits with the maintained trust
//! score and a recency term.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use precedent_core::config::TrustConfig;
use precedent_graph::GraphState;
use precedent_trust::factors::recency;

use super::{sort_candidates, Candidate, KeywordHit, VectorHit};
use crate::intent::weight_matrix::StageWeights;

#[derive(Default)]
struct Parts {
    entity_id: String,
    semantic: f64,
    keyword: f64,
}

/// Union of both hit lists scored with `weights`. A chunk missing from one
/// list scores 0 for that stage. Chunks no longer in the graph are dropped.
pub fn fuse(
    state: &GraphState,
    keyword: &[KeywordHit],
    vector: &[VectorHit],
    weights: StageWeights,
    trust: &TrustConfig,
    now: DateTime<Utc>,
) -> Vec<Candidate> {
    let mut parts: HashMap<&str, Parts> = HashMap::new();
    for hit in keyword {
        let entry = parts.entry(hit.chunk_id.as_str()).or_default();
        entry.entity_id.clone_from(&hit.entity_id);
        entry.keyword = entry.keyword.max(hit.score);
    }
    for hit in vector {
        let entry = parts.entry(hit.chunk_id.as_str()).or_default();
        entry.entity_id.clone_from(&hit.entity_id);
        entry.semantic = entry.semantic.max(hit.score);
    }

    let mut fused: Vec<Candidate> = parts
        .into_iter()
        .filter_map(|(chunk_id, p)| {
            let chunk = state.chunk(chunk_id)?;
            let recency = state.current(&p.entity_id).map_or(0.0, |entity| {
                let age = recency::years_between(entity.reference_date(), now);
                recency::score(age, trust.recency_horizon_years, trust.recency_floor)
            });
            let trust_score = chunk.trust.trust_score.clamp(0.0, 1.0);
            let score = weights
                .blend(p.semantic, p.keyword, trust_score, recency)
                .clamp(0.0, 1.0);
            Some(Candidate::direct(chunk_id.to_string(), p.entity_id, score))
        })
        .collect();
    sort_candidates(&mut fused);
    fused
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inputs_fuse_to_nothing() {
        let state = GraphState::new();
        let fused = fuse(
            &state,
            &[],
            &[],
            StageWeights::new(0.5, 0.3, 0.1, 0.1),
            &TrustConfig::default(),
            Utc::now(),
        );
        assert!(fused.is_empty());
    }

    #[test]
    fn unknown_chunks_are_dropped() {
        let state = GraphState::new();
        let hit = KeywordHit {
            chunk_id: "gone:0".into(),
            entity_id: "gone".into(),
            score: 1.0,
            exact_reference: false,
        };
        let fused = fuse(
            &state,
            &[hit],
            &[],
            StageWeights::new(0.5, 0.3, 0.1, 0.1),
            &TrustConfig::default(),
            Utc::now(),
        );
        assert!(fused.is_empty());
    }
}
