use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a piece of legal text came from, ordered by authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTier {
    PrimaryStatute,
    PrimaryJudgment,
    OfficialReport,
    Secondary,
    Commentary,
    Tertiary,
}

impl SourceTier {
    /// Fixed source-authority lookup used by the trust scorer.
    pub fn authority(self) -> f64 {
        match self {
            Self::PrimaryStatute | Self::PrimaryJudgment => 1.0,
            Self::OfficialReport => 0.9,
            Self::Secondary => 0.75,
            Self::Commentary => 0.6,
            Self::Tertiary => 0.5,
        }
    }
}

impl Default for SourceTier {
    fn default() -> Self {
        Self::Secondary
    }
}

/// Origin record attached to every entity and chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    /// Source document identifier (URL, report citation, file name).
    pub source: String,
    pub source_tier: SourceTier,
    pub extracted_at: DateTime<Utc>,
    /// Extractor or person responsible.
    pub extracted_by: String,
    /// Confidence of the extraction step, in [0, 1].
    pub confidence_score: f64,
}

impl Provenance {
    pub fn new(source: impl Into<String>, source_tier: SourceTier, extracted_by: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            source_tier,
            extracted_at: Utc::now(),
            extracted_by: extracted_by.into(),
            confidence_score: 1.0,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence_score = confidence.clamp(0.0, 1.0);
        self
    }
}
