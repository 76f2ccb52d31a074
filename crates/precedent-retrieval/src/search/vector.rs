//! Brute-force cosine search over chunk embeddings.

use precedent_embeddings::cosine;
use precedent_graph::GraphState;

#[derive(Debug, Clone, PartialEq)]
pub struct VectorHit {
    pub chunk_id: String,
    pub entity_id: String,
    /// Cosine similarity clamped to [0, 1].
    pub score: f64,
}

/// Top `limit` chunks by similarity to `query`. Only chunks embedded by
/// `model` are compared; vectors from other providers live in another
/// space.
pub fn vector_search(state: &GraphState, query: &[f32], model: &str, limit: usize) -> Vec<VectorHit> {
    let mut hits: Vec<VectorHit> = state
        .current_entities()
        .flat_map(|entity| state.chunks(&entity.id))
        .filter(|chunk| chunk.embedding_model.as_deref() == Some(model))
        .filter_map(|chunk| {
            let vector = chunk.embedding.as_deref()?;
            let score = cosine(query, vector).clamp(0.0, 1.0);
            (score > 0.0).then(|| VectorHit {
                chunk_id: chunk.id.clone(),
                entity_id: chunk.entity_id.clone(),
                score,
            })
        })
        .collect();
    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.chunk_id.cmp(&b.chunk_id))
    });
    hits.truncate(limit);
    hits
}
