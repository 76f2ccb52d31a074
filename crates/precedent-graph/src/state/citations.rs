use petgraph::Direction;

use precedent_core::errors::{GraphError, PrecedentError, PrecedentResult};
use precedent_core::models::{
    CitationEdge, CrossJurisdictionRelation, EdgeState, ResolutionStatus,
};

use super::GraphState;
use crate::indexed::CitationLink;

impl GraphState {
    // --- Reads ---

    pub fn citation(&self, edge_id: &str) -> Option<&CitationEdge> {
        self.citations.get(edge_id)
    }

    /// Outgoing edges of a citing entity, resolved or not.
    pub fn citations_from(&self, citing_id: &str) -> Vec<&CitationEdge> {
        self.edges_by_citing
            .get(citing_id)
            .map(|ids| ids.iter().filter_map(|id| self.citations.get(id)).collect())
            .unwrap_or_default()
    }

    /// Incoming resolved edges of a cited entity.
    pub fn citations_to(&self, cited_id: &str) -> Vec<&CitationEdge> {
        self.graph
            .neighbors(cited_id, Direction::Incoming)
            .into_iter()
            .filter_map(|(_, link)| self.citations.get(&link.edge_id))
            .collect()
    }

    pub fn all_citations(&self) -> impl Iterator<Item = &CitationEdge> {
        self.citations.values()
    }

    /// Accepted incoming citations, the input to citation-frequency trust.
    pub fn active_citation_count(&self, cited_id: &str) -> u32 {
        let count = self
            .graph
            .neighbors(cited_id, Direction::Incoming)
            .into_iter()
            .filter(|(_, link)| link.state == EdgeState::Active)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    pub fn relations(&self) -> impl Iterator<Item = &CrossJurisdictionRelation> {
        self.relations.values()
    }

    pub fn relation(&self, relation_id: &str) -> Option<&CrossJurisdictionRelation> {
        self.relations.get(relation_id)
    }

    // --- Writes ---

    /// Insert or replace a citation edge.
    ///
    /// A resolved edge whose treatment conflicts (follows vs distinguishes)
    /// with another edge between the same pair is refused.
    pub fn add_citation(&mut self, edge: CitationEdge) -> PrecedentResult<()> {
        if let Some(cited_id) = edge.cited_id.as_deref() {
            if let Some(existing) = self.citations_from(&edge.citing_id).into_iter().find(|e| {
                e.id != edge.id
                    && e.cited_id.as_deref() == Some(cited_id)
                    && e.treatment.conflicts_with(edge.treatment)
            }) {
                return Err(GraphError::TreatmentConflict {
                    citing_id: edge.citing_id.clone(),
                    cited_id: cited_id.to_string(),
                    existing: existing.treatment,
                    attempted: edge.treatment,
                }
                .into());
            }
        }

        let endpoints = match edge.cited_id.as_deref() {
            Some(cited_id) => {
                let source_kind = self.current(&edge.citing_id).map(|e| e.kind).ok_or_else(|| {
                    PrecedentError::EntityNotFound {
                        id: edge.citing_id.clone(),
                    }
                })?;
                let target_kind = self.current(cited_id).map(|e| e.kind).ok_or_else(|| {
                    PrecedentError::EntityNotFound {
                        id: cited_id.to_string(),
                    }
                })?;
                Some((cited_id.to_string(), source_kind, target_kind))
            }
            None => None,
        };

        self.detach_citation(&edge.id);
        if let Some((cited_id, source_kind, target_kind)) = endpoints {
            let source = self.graph.ensure_node(&edge.citing_id, source_kind);
            let target = self.graph.ensure_node(&cited_id, target_kind);
            self.graph.upsert_link(
                source,
                target,
                CitationLink {
                    edge_id: edge.id.clone(),
                    treatment: edge.treatment,
                    weight: edge.weight,
                    state: edge.state,
                },
            );
        }
        self.edges_by_citing
            .entry(edge.citing_id.clone())
            .or_default()
            .insert(edge.id.clone());
        self.citations.insert(edge.id.clone(), edge);
        self.touch();
        Ok(())
    }

    pub fn set_citation_state(
        &mut self,
        edge_id: &str,
        state: EdgeState,
    ) -> PrecedentResult<CitationEdge> {
        let edge = self
            .citations
            .get_mut(edge_id)
            .ok_or_else(|| PrecedentError::CitationNotFound {
                id: edge_id.to_string(),
            })?;
        edge.state = state;
        let updated = edge.clone();
        self.graph.set_link_state(edge_id, state);
        self.touch();
        Ok(updated)
    }

    pub fn remove_citation(&mut self, edge_id: &str) -> PrecedentResult<CitationEdge> {
        let removed = self
            .detach_citation(edge_id)
            .ok_or_else(|| PrecedentError::CitationNotFound {
                id: edge_id.to_string(),
            })?;
        self.touch();
        Ok(removed)
    }

    /// Drop every outgoing edge of a citing entity (before re-extraction).
    pub fn remove_citations_from(&mut self, citing_id: &str) -> Vec<CitationEdge> {
        let ids: Vec<String> = self
            .edges_by_citing
            .get(citing_id)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default();
        let removed: Vec<CitationEdge> =
            ids.iter().filter_map(|id| self.detach_citation(id)).collect();
        if !removed.is_empty() {
            self.touch();
        }
        removed
    }

    fn detach_citation(&mut self, edge_id: &str) -> Option<CitationEdge> {
        let edge = self.citations.remove(edge_id)?;
        self.graph.remove_link(edge_id);
        if let Some(ids) = self.edges_by_citing.get_mut(&edge.citing_id) {
            ids.remove(edge_id);
            if ids.is_empty() {
                self.edges_by_citing.remove(&edge.citing_id);
            }
        }
        Some(edge)
    }

    /// Add a cross-jurisdiction relation. Both ends must exist and sit in
    /// different jurisdictions when both declare one.
    pub fn add_relation(&mut self, relation: CrossJurisdictionRelation) -> PrecedentResult<()> {
        let source = self
            .current(&relation.source_id)
            .ok_or_else(|| PrecedentError::EntityNotFound {
                id: relation.source_id.clone(),
            })?;
        let target = self
            .current(&relation.target_id)
            .ok_or_else(|| PrecedentError::EntityNotFound {
                id: relation.target_id.clone(),
            })?;
        if let (Some(a), Some(b)) = (
            source.attributes.jurisdiction.as_deref(),
            target.attributes.jurisdiction.as_deref(),
        ) {
            if a.eq_ignore_ascii_case(b) {
                return Err(GraphError::InvalidRelation {
                    reason: format!(
                        "{} and {} are both in {a}",
                        relation.source_id, relation.target_id
                    ),
                }
                .into());
            }
        }
        self.relations.insert(relation.id.clone(), relation);
        self.touch();
        Ok(())
    }

    /// Advance a conflict's resolution state machine.
    pub fn update_resolution(
        &mut self,
        relation_id: &str,
        next: ResolutionStatus,
    ) -> PrecedentResult<CrossJurisdictionRelation> {
        let relation = self
            .relations
            .get_mut(relation_id)
            .ok_or_else(|| GraphError::InvalidRelation {
                reason: format!("unknown relation {relation_id}"),
            })?;
        let Some(current) = relation.resolution else {
            return Err(GraphError::InvalidRelation {
                reason: format!("{relation_id} is not a conflict"),
            }
            .into());
        };
        if !current.can_transition_to(next) {
            return Err(GraphError::InvalidResolutionTransition {
                from: current,
                to: next,
            }
            .into());
        }
        relation.resolution = Some(next);
        let updated = relation.clone();
        self.touch();
        Ok(updated)
    }
}
