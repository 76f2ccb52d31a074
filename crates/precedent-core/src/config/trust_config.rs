use serde::{Deserialize, Serialize};

use super::defaults;

/// Trust scorer normalisation constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustConfig {
    /// Citation count at which the frequency term saturates to 1.0.
    pub citation_saturation: u32,
    /// Age in years at which recency would reach zero (before flooring).
    pub recency_horizon_years: f64,
    /// Lowest recency score an authority can receive.
    pub recency_floor: f64,
    /// Entries kept per kind in the top-cited view.
    pub top_cited_limit: usize,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            citation_saturation: defaults::DEFAULT_CITATION_SATURATION,
            recency_horizon_years: defaults::DEFAULT_RECENCY_HORIZON_YEARS,
            recency_floor: defaults::DEFAULT_RECENCY_FLOOR,
            top_cited_limit: defaults::DEFAULT_TOP_CITED_LIMIT,
        }
    }
}
