use serde::{Deserialize, Serialize};

/// Human verification state of an entity or chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Verified,
    #[default]
    Unverified,
    Disputed,
    Deprecated,
}

impl VerificationStatus {
    /// Multiplier applied to source authority in the trust formula.
    pub fn factor(self) -> f64 {
        match self {
            Self::Verified => 1.0,
            Self::Unverified => 0.9,
            Self::Disputed => 0.5,
            Self::Deprecated => 0.0,
        }
    }
}

/// Maintained trust state. `trust_score` is recomputed by the trust pass,
/// never at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustBlock {
    pub trust_score: f64,
    pub verification_status: VerificationStatus,
    /// Accepted incoming citations at the last recompute.
    #[serde(default)]
    pub citation_count: u32,
    /// Mean confidence of the parser's structural decisions (chunk typing).
    #[serde(default = "default_parser_confidence")]
    pub parser_confidence: f64,
}

fn default_parser_confidence() -> f64 {
    1.0
}

impl Default for TrustBlock {
    fn default() -> Self {
        Self {
            trust_score: 0.0,
            verification_status: VerificationStatus::Unverified,
            citation_count: 0,
            parser_confidence: 1.0,
        }
    }
}

impl TrustBlock {
    pub fn with_status(verification_status: VerificationStatus) -> Self {
        Self {
            verification_status,
            ..Self::default()
        }
    }
}
