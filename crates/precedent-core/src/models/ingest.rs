use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::provenance::SourceTier;
use super::trust::VerificationStatus;

/// Metadata accompanying a document handed to ingestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceMeta {
    pub title: String,
    pub jurisdiction: Option<String>,
    pub court_level: Option<u8>,
    pub decision_date: Option<DateTime<Utc>>,
    pub aliases: Vec<String>,
    /// Source document identifier.
    pub source: String,
    pub source_tier: SourceTier,
    pub extracted_by: Option<String>,
    /// Extraction confidence; 1.0 when absent.
    pub confidence_score: Option<f64>,
    pub verification_status: VerificationStatus,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Per-entity ingestion result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestReport {
    pub entity_id: String,
    pub chunks_created: usize,
    pub citations_extracted: usize,
    /// Edges created in `PendingReview`.
    pub citations_pending: usize,
    /// Classifications below the review threshold.
    pub citations_rejected: usize,
    pub status_changes: usize,
    /// True when the text hash matched the stored version and nothing was rewritten.
    pub unchanged: bool,
    pub errors: Vec<String>,
}

impl IngestReport {
    pub fn failed(entity_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            errors: vec![error.into()],
            ..Self::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
