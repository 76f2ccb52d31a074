use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::citation::Treatment;
use super::entity::EntityKind;
use crate::intent::Intent;

/// Caller-supplied constraints on a query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalFilters {
    pub jurisdiction: Option<String>,
    /// Empty means every kind.
    pub kinds: Vec<EntityKind>,
    pub min_trust: Option<f64>,
    /// Only entities with a version in force at this instant.
    pub as_of: Option<DateTime<Utc>>,
    /// Drop overruled and superseded authorities.
    pub exclude_inactive: bool,
}

/// How the result was reached through the citation graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentContext {
    /// Entity the expansion hop came from.
    pub via_entity_id: String,
    pub treatment: Treatment,
    pub context: Option<String>,
}

/// One entry of a query response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub entity_id: String,
    pub chunk_id: String,
    pub score: f64,
    pub treatment_context: Option<TreatmentContext>,
    /// 0 for direct hits, n for entities reached by n expansion hops.
    pub hop_distance: u32,
}

/// Query response with the diagnostics gathered along the way.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub intent: Intent,
    pub results: Vec<RankedResult>,
    /// Components that fell back during this query.
    pub degraded: Vec<String>,
    pub reranked: bool,
}
