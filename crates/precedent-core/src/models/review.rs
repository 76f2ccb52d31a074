use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why something landed in the human review queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewKind {
    /// Edge created in `PendingReview`; awaiting adjudication.
    PendingCitation,
    /// Classification below the review threshold; no edge created.
    LowConfidenceCitation,
    ChunkTypeUncertain,
    TemporalGap,
    TemporalOverlap,
    TreatmentConflict,
    ConflictingActivePrecedents,
    QualifiedTreatment,
}

impl ReviewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingCitation => "pending_citation",
            Self::LowConfidenceCitation => "low_confidence_citation",
            Self::ChunkTypeUncertain => "chunk_type_uncertain",
            Self::TemporalGap => "temporal_gap",
            Self::TemporalOverlap => "temporal_overlap",
            Self::TreatmentConflict => "treatment_conflict",
            Self::ConflictingActivePrecedents => "conflicting_active_precedents",
            Self::QualifiedTreatment => "qualified_treatment",
        }
    }
}

/// One entry of the review queue. Items are never auto-resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub id: String,
    pub kind: ReviewKind,
    pub entity_id: String,
    pub related_id: Option<String>,
    pub edge_id: Option<String>,
    pub detail: String,
    pub confidence: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl ReviewItem {
    /// Ids are content-derived so re-detecting the same issue does not duplicate it.
    pub fn new(
        kind: ReviewKind,
        entity_id: impl Into<String>,
        related_id: Option<String>,
        detail: impl Into<String>,
    ) -> Self {
        let entity_id = entity_id.into();
        let detail = detail.into();
        let mut hasher = blake3::Hasher::new();
        hasher.update(format!("{kind:?}").as_bytes());
        hasher.update(b"\0");
        hasher.update(entity_id.as_bytes());
        hasher.update(b"\0");
        hasher.update(related_id.as_deref().unwrap_or("").as_bytes());
        hasher.update(b"\0");
        hasher.update(detail.as_bytes());
        Self {
            id: format!("rev-{}", &hasher.finalize().to_hex()[..16]),
            kind,
            entity_id,
            related_id,
            edge_id: None,
            detail,
            confidence: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_edge(mut self, edge_id: impl Into<String>) -> Self {
        self.edge_id = Some(edge_id.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}
