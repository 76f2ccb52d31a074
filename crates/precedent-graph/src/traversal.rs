//! Bounded multi-hop expansion over citation edges.

use std::collections::{HashSet, VecDeque};

use petgraph::Direction;

use precedent_core::constants::MAX_EXPANSION_HOPS;
use precedent_core::models::{EdgeState, Treatment};

use crate::state::GraphState;

/// Limits for one expansion.
#[derive(Debug, Clone)]
pub struct ExpansionConfig {
    /// Hop limit, capped at the engine-wide maximum.
    pub max_hops: usize,
    /// Hard cap on entities returned.
    pub budget: usize,
    /// Follow edges still pending review.
    pub include_pending: bool,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            max_hops: MAX_EXPANSION_HOPS,
            budget: 30,
            include_pending: false,
        }
    }
}

/// An entity reached by expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedNode {
    pub entity_id: String,
    pub hop: usize,
    /// Entity on the previous hop.
    pub via_entity_id: String,
    pub edge_id: String,
    pub treatment: Treatment,
}

/// Breadth-first expansion from `seeds` along citation edges in both
/// directions (what a seed cites, and what applies or cites a seed).
///
/// Stops at `max_hops`, at `budget` entities, or as soon as a hop adds
/// nothing new. Seeds themselves are never returned.
pub fn expand(state: &GraphState, seeds: &[String], config: &ExpansionConfig) -> Vec<ExpandedNode> {
    let max_hops = config.max_hops.min(MAX_EXPANSION_HOPS);
    let mut visited: HashSet<&str> = seeds.iter().map(String::as_str).collect();
    let mut frontier: VecDeque<&str> = seeds.iter().map(String::as_str).collect();
    let mut found = Vec::new();

    for hop in 1..=max_hops {
        if frontier.is_empty() || found.len() >= config.budget {
            break;
        }
        let mut next = VecDeque::new();
        'frontier: while let Some(current) = frontier.pop_front() {
            for direction in [Direction::Outgoing, Direction::Incoming] {
                for (node, link) in state.graph().neighbors(current, direction) {
                    if link.state == EdgeState::PendingReview && !config.include_pending {
                        continue;
                    }
                    if !visited.insert(node.entity_id.as_str()) {
                        continue;
                    }
                    found.push(ExpandedNode {
                        entity_id: node.entity_id.clone(),
                        hop,
                        via_entity_id: current.to_string(),
                        edge_id: link.edge_id.clone(),
                        treatment: link.treatment,
                    });
                    next.push_back(node.entity_id.as_str());
                    if found.len() >= config.budget {
                        break 'frontier;
                    }
                }
            }
        }
        if next.is_empty() {
            tracing::debug!(hop, "expansion hop added nothing; stopping");
            break;
        }
        frontier = next;
    }
    found
}
