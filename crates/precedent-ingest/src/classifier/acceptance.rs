use serde::{Deserialize, Serialize};

use precedent_core::config::ClassificationConfig;

/// What the acceptance policy does with a classified citation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Acceptance {
    /// Edge created active.
    AutoAccept,
    /// Edge created in `PendingReview` and queued for adjudication.
    PendingReview,
    /// No edge; the classification is logged and queued.
    Reject,
}

impl Acceptance {
    pub fn decide(confidence: f64, config: &ClassificationConfig) -> Self {
        if confidence >= config.auto_accept_threshold {
            Self::AutoAccept
        } else if confidence >= config.review_threshold {
            Self::PendingReview
        } else {
            Self::Reject
        }
    }
}
