use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JurisdictionRelationKind {
    HarmonizedWith,
    DivergesFrom,
    ConflictsWith,
}

/// Resolution state of a cross-jurisdiction conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    Unresolved,
    PartiallyResolved,
    Resolved,
    PendingHigherCourt,
}

impl ResolutionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::PendingHigherCourt)
    }

    pub fn can_transition_to(self, next: ResolutionStatus) -> bool {
        use ResolutionStatus::*;
        matches!(
            (self, next),
            (Unresolved, PartiallyResolved)
                | (Unresolved, Resolved)
                | (PartiallyResolved, Resolved)
                | (PartiallyResolved, PendingHigherCourt)
        )
    }
}

/// Relation between authorities of different jurisdictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossJurisdictionRelation {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub kind: JurisdictionRelationKind,
    pub similarity: f64,
    /// Present only for `ConflictsWith`.
    pub resolution: Option<ResolutionStatus>,
    pub created_at: DateTime<Utc>,
}

impl CrossJurisdictionRelation {
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        kind: JurisdictionRelationKind,
        similarity: f64,
    ) -> Self {
        let source_id = source_id.into();
        let target_id = target_id.into();
        let resolution = match kind {
            JurisdictionRelationKind::ConflictsWith => Some(ResolutionStatus::Unresolved),
            _ => None,
        };
        Self {
            id: format!("{source_id}~{kind:?}~{target_id}"),
            source_id,
            target_id,
            kind,
            similarity: similarity.clamp(0.0, 1.0),
            resolution,
            created_at: Utc::now(),
        }
    }

    pub fn is_unresolved_conflict(&self) -> bool {
        self.kind == JurisdictionRelationKind::ConflictsWith
            && !self.resolution.is_some_and(ResolutionStatus::is_terminal)
    }
}
