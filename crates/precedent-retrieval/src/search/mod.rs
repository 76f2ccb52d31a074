//! First-stage search: keyword and vector fan-out, then weighted fusion.

pub mod fusion;
pub mod keyword;
pub mod vector;

use precedent_core::models::{RankedResult, TreatmentContext};

pub use fusion::fuse;
pub use keyword::{KeywordHit, KeywordIndex, KeywordSearcher};
pub use vector::{vector_search, VectorHit};

/// A chunk under consideration, carrying its score through the later stages.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub chunk_id: String,
    pub entity_id: String,
    pub score: f64,
    pub hop_distance: u32,
    pub treatment_context: Option<TreatmentContext>,
}

impl Candidate {
    pub fn direct(chunk_id: String, entity_id: String, score: f64) -> Self {
        Self {
            chunk_id,
            entity_id,
            score,
            hop_distance: 0,
            treatment_context: None,
        }
    }

    pub fn into_result(self) -> RankedResult {
        RankedResult {
            entity_id: self.entity_id,
            chunk_id: self.chunk_id,
            score: self.score,
            treatment_context: self.treatment_context,
            hop_distance: self.hop_distance,
        }
    }
}

/// Highest score first; ties broken by fewer hops, then chunk id.
pub fn sort_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.hop_distance.cmp(&b.hop_distance))
            .then_with(|| a.chunk_id.cmp(&b.chunk_id))
    });
}
