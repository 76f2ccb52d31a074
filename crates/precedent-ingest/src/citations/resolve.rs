//! Resolution of extracted references against the alias index.

use precedent_graph::GraphState;

use super::ExtractedReference;

/// A reference that matched a stored entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub entity_id: String,
    /// The candidate string that matched.
    pub matched: String,
}

/// First candidate that resolves to exactly one entity. Ambiguous aliases
/// never resolve; the reference stays unlinked.
pub fn resolve(state: &GraphState, reference: &ExtractedReference) -> Option<Resolved> {
    reference.candidates.iter().find_map(|candidate| {
        state.resolve_alias(candidate).map(|id| Resolved {
            entity_id: id.to_string(),
            matched: candidate.clone(),
        })
    })
}
