//! petgraph::StableGraph wrapper with entity nodes and citation-link edges.

use std::collections::HashMap;

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};
use serde::{Deserialize, Serialize};

use precedent_core::models::{EdgeState, EntityKind, Treatment};

/// A node in the citation graph: one logical entity, all versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityNode {
    pub entity_id: String,
    pub kind: EntityKind,
}

/// Weight on a resolved citation edge. The full record lives in the
/// citation table; this carries what traversal needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationLink {
    pub edge_id: String,
    pub treatment: Treatment,
    pub weight: f64,
    pub state: EdgeState,
}

/// The underlying directed multigraph type.
pub type CitationStableGraph = StableGraph<EntityNode, CitationLink, Directed>;

/// Wrapper providing indexed access to the citation graph.
#[derive(Debug, Clone)]
pub struct IndexedGraph {
    pub graph: CitationStableGraph,
    /// entity_id → NodeIndex.
    pub node_index: HashMap<String, NodeIndex>,
    /// edge_id → EdgeIndex.
    pub edge_index: HashMap<String, EdgeIndex>,
}

impl IndexedGraph {
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            node_index: HashMap::new(),
            edge_index: HashMap::new(),
        }
    }

    /// Get or create the node for an entity.
    pub fn ensure_node(&mut self, entity_id: &str, kind: EntityKind) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(entity_id) {
            if let Some(node) = self.graph.node_weight_mut(idx) {
                node.kind = kind;
            }
            return idx;
        }
        let idx = self.graph.add_node(EntityNode {
            entity_id: entity_id.to_string(),
            kind,
        });
        self.node_index.insert(entity_id.to_string(), idx);
        idx
    }

    pub fn get_node(&self, entity_id: &str) -> Option<NodeIndex> {
        self.node_index.get(entity_id).copied()
    }

    /// Insert or replace the link with this edge id.
    pub fn upsert_link(&mut self, source: NodeIndex, target: NodeIndex, link: CitationLink) {
        self.remove_link(&link.edge_id);
        let edge_id = link.edge_id.clone();
        let idx = self.graph.add_edge(source, target, link);
        self.edge_index.insert(edge_id, idx);
    }

    pub fn remove_link(&mut self, edge_id: &str) -> bool {
        match self.edge_index.remove(edge_id) {
            Some(idx) => self.graph.remove_edge(idx).is_some(),
            None => false,
        }
    }

    pub fn set_link_state(&mut self, edge_id: &str, state: EdgeState) {
        if let Some(&idx) = self.edge_index.get(edge_id) {
            if let Some(link) = self.graph.edge_weight_mut(idx) {
                link.state = state;
            }
        }
    }

    /// Neighbouring entities with the link that connects them, in one direction.
    pub fn neighbors<'a>(
        &'a self,
        entity_id: &str,
        direction: Direction,
    ) -> Vec<(&'a EntityNode, &'a CitationLink)> {
        let Some(idx) = self.get_node(entity_id) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(idx, direction)
            .filter_map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                self.graph.node_weight(other).map(|node| (node, edge.weight()))
            })
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Default for IndexedGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(id: &str, treatment: Treatment) -> CitationLink {
        CitationLink {
            edge_id: id.into(),
            treatment,
            weight: treatment.weight(),
            state: EdgeState::Active,
        }
    }

    #[test]
    fn parallel_edges_are_kept_and_removed_by_id() {
        let mut g = IndexedGraph::new();
        let a = g.ensure_node("a", EntityKind::Case);
        let b = g.ensure_node("b", EntityKind::Case);
        g.upsert_link(b, a, link("e1", Treatment::Applies));
        g.upsert_link(b, a, link("e2", Treatment::Criticizes));
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.neighbors("a", Direction::Incoming).len(), 2);

        assert!(g.remove_link("e1"));
        assert!(!g.remove_link("e1"));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn upsert_replaces_same_edge_id() {
        let mut g = IndexedGraph::new();
        let a = g.ensure_node("a", EntityKind::Case);
        let b = g.ensure_node("b", EntityKind::Case);
        g.upsert_link(b, a, link("e1", Treatment::Applies));
        g.upsert_link(b, a, link("e1", Treatment::Follows));
        assert_eq!(g.edge_count(), 1);
        let (_, l) = g.neighbors("b", Direction::Outgoing)[0];
        assert_eq!(l.treatment, Treatment::Follows);
    }

    #[test]
    fn ensure_node_is_idempotent() {
        let mut g = IndexedGraph::new();
        let first = g.ensure_node("a", EntityKind::Case);
        let second = g.ensure_node("a", EntityKind::Case);
        assert_eq!(first, second);
        assert_eq!(g.node_count(), 1);
    }
}
