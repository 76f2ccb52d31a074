use serde::{Deserialize, Serialize};

use super::defaults;

/// Treatment classification acceptance policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// At or above: edge is created and active.
    pub auto_accept_threshold: f64,
    /// At or above (and below auto-accept): edge is created pending review.
    pub review_threshold: f64,
    /// When set, an accepted `qualified` edge raises a review item on the cited entity.
    pub qualified_triggers_status: bool,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            auto_accept_threshold: defaults::DEFAULT_AUTO_ACCEPT_THRESHOLD,
            review_threshold: defaults::DEFAULT_REVIEW_THRESHOLD,
            qualified_triggers_status: defaults::DEFAULT_QUALIFIED_TRIGGERS_STATUS,
        }
    }
}
