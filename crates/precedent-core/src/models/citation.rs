use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Family of the cited authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationType {
    Statutory,
    Judicial,
    Secondary,
}

/// How the citing authority regards the cited one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Treatment {
    Applies,
    Follows,
    Harmonized,
    Qualified,
    Distinguishes,
    Criticizes,
    Overruled,
}

/// Doctrinal consequence of a treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreatmentEffect {
    Binding,
    Reconciled,
    Limited,
    NonBinding,
    Weakened,
    Reversed,
}

impl Treatment {
    pub const ALL: [Treatment; 7] = [
        Self::Applies,
        Self::Follows,
        Self::Harmonized,
        Self::Qualified,
        Self::Distinguishes,
        Self::Criticizes,
        Self::Overruled,
    ];

    /// Directional weight in [-1, 1] used for precedent scoring.
    pub fn weight(self) -> f64 {
        match self {
            Self::Applies => 1.0,
            Self::Follows => 0.9,
            Self::Harmonized => 0.8,
            Self::Qualified => 0.6,
            Self::Distinguishes => 0.3,
            Self::Criticizes => -0.3,
            Self::Overruled => -1.0,
        }
    }

    pub fn effect(self) -> TreatmentEffect {
        match self {
            Self::Applies | Self::Follows => TreatmentEffect::Binding,
            Self::Harmonized => TreatmentEffect::Reconciled,
            Self::Qualified => TreatmentEffect::Limited,
            Self::Distinguishes => TreatmentEffect::NonBinding,
            Self::Criticizes => TreatmentEffect::Weakened,
            Self::Overruled => TreatmentEffect::Reversed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Applies => "applies",
            Self::Follows => "follows",
            Self::Harmonized => "harmonized",
            Self::Qualified => "qualified",
            Self::Distinguishes => "distinguishes",
            Self::Criticizes => "criticizes",
            Self::Overruled => "overruled",
        }
    }

    /// `follows` and `distinguishes` may not both hold between the same pair.
    pub fn conflicts_with(self, other: Treatment) -> bool {
        matches!(
            (self, other),
            (Self::Follows, Self::Distinguishes) | (Self::Distinguishes, Self::Follows)
        )
    }
}

impl std::fmt::Display for Treatment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a citation edge under the acceptance policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeState {
    Active,
    PendingReview,
}

/// Directed citation, citing -> cited.
///
/// `cited_id` is `None` for references that did not resolve to a stored
/// entity; they are kept so a later pass can link them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationEdge {
    pub id: String,
    pub citing_id: String,
    pub cited_id: Option<String>,
    /// Chunk of the citing entity the reference was found in.
    pub chunk_id: Option<String>,
    /// Reference exactly as written.
    pub raw_reference: String,
    /// Normalized lookup key, e.g. "section 17".
    pub reference_key: String,
    pub citation_type: CitationType,
    pub treatment: Treatment,
    pub confidence: f64,
    pub weight: f64,
    /// Pinpoint within the cited authority ("para 12", "sub-section (2)").
    pub locator: Option<String>,
    /// Text surrounding the reference.
    pub context: Option<String>,
    pub state: EdgeState,
    pub extracted_by: String,
    pub extracted_at: DateTime<Utc>,
}

impl CitationEdge {
    /// Stable edge id: identical input text produces identical ids.
    pub fn make_id(citing_id: &str, chunk_id: Option<&str>, reference_key: &str, offset: usize) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(citing_id.as_bytes());
        hasher.update(b"\0");
        hasher.update(chunk_id.unwrap_or("").as_bytes());
        hasher.update(b"\0");
        hasher.update(reference_key.as_bytes());
        hasher.update(b"\0");
        hasher.update(offset.to_le_bytes().as_slice());
        let hash = hasher.finalize();
        format!("cit-{}", &hash.to_hex()[..16])
    }

    pub fn is_active(&self) -> bool {
        self.state == EdgeState::Active
    }

    pub fn is_resolved(&self) -> bool {
        self.cited_id.is_some()
    }
}
