//! Layered configuration. Every section defaults independently, so a
//! partial TOML file only overrides what it names.

mod chunking_config;
mod classification_config;
pub mod defaults;
mod embedding_config;
mod observability_config;
mod retrieval_config;
mod storage_config;
mod trust_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use chunking_config::ChunkingConfig;
pub use classification_config::ClassificationConfig;
pub use embedding_config::EmbeddingConfig;
pub use observability_config::ObservabilityConfig;
pub use retrieval_config::RetrievalConfig;
pub use storage_config::StorageConfig;
pub use trust_config::TrustConfig;

use crate::errors::{PrecedentError, PrecedentResult};

/// Root configuration for the Precedent engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrecedentConfig {
    pub chunking: ChunkingConfig,
    pub classification: ClassificationConfig,
    pub trust: TrustConfig,
    pub retrieval: RetrievalConfig,
    pub embedding: EmbeddingConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

impl PrecedentConfig {
    /// Parse configuration from a TOML string. Missing keys take defaults.
    pub fn from_toml(input: &str) -> PrecedentResult<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_file(path: &Path) -> PrecedentResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            PrecedentError::ConfigError(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&raw)
    }

    /// Reject settings that would break the pipeline's invariants.
    pub fn validate(&self) -> PrecedentResult<()> {
        let c = &self.chunking;
        if !(c.min_tokens <= c.target_tokens && c.target_tokens <= c.max_tokens) {
            return Err(PrecedentError::ConfigError(format!(
                "chunking requires min <= target <= max, got {} / {} / {}",
                c.min_tokens, c.target_tokens, c.max_tokens
            )));
        }
        let cl = &self.classification;
        if !(0.0..=1.0).contains(&cl.review_threshold)
            || !(0.0..=1.0).contains(&cl.auto_accept_threshold)
            || cl.review_threshold > cl.auto_accept_threshold
        {
            return Err(PrecedentError::ConfigError(format!(
                "classification thresholds must satisfy 0 <= review ({}) <= auto ({}) <= 1",
                cl.review_threshold, cl.auto_accept_threshold
            )));
        }
        if self.retrieval.max_hops > crate::constants::MAX_EXPANSION_HOPS {
            return Err(PrecedentError::ConfigError(format!(
                "retrieval.max_hops {} exceeds the hard limit {}",
                self.retrieval.max_hops,
                crate::constants::MAX_EXPANSION_HOPS
            )));
        }
        Ok(())
    }
}
