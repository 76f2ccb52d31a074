//! Intent → stage weight table.
//!
//! Each intent blends the semantic, keyword, trust and recency scores of a
//! candidate. Rows sum to 1.0. Lookups lean on keyword matching; open
//! questions lean on semantic similarity.

use std::collections::HashMap;

use precedent_core::intent::Intent;

/// Blend weights for one intent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageWeights {
    pub semantic: f64,
    pub keyword: f64,
    pub trust: f64,
    pub recency: f64,
}

impl StageWeights {
    pub const fn new(semantic: f64, keyword: f64, trust: f64, recency: f64) -> Self {
        Self {
            semantic,
            keyword,
            trust,
            recency,
        }
    }

    pub fn sum(&self) -> f64 {
        self.semantic + self.keyword + self.trust + self.recency
    }

    /// Weights for a query with no embedding: the semantic share moves to
    /// keyword matching so the row still sums to 1.0.
    pub fn without_semantic(self) -> Self {
        Self {
            semantic: 0.0,
            keyword: self.keyword + self.semantic,
            ..self
        }
    }

    /// Weighted blend of the four stage scores.
    pub fn blend(&self, semantic: f64, keyword: f64, trust: f64, recency: f64) -> f64 {
        self.semantic * semantic + self.keyword * keyword + self.trust * trust + self.recency * recency
    }
}

pub struct WeightMatrix {
    weights: HashMap<Intent, StageWeights>,
}

impl WeightMatrix {
    pub fn default_weights() -> Self {
        let mut weights = HashMap::new();

        weights.insert(Intent::StatuteLookup, StageWeights::new(0.20, 0.65, 0.10, 0.05));
        weights.insert(Intent::CaseLookup, StageWeights::new(0.20, 0.60, 0.12, 0.08));

        weights.insert(Intent::Definition, StageWeights::new(0.45, 0.35, 0.12, 0.08));
        weights.insert(Intent::Procedure, StageWeights::new(0.45, 0.35, 0.12, 0.08));
        weights.insert(Intent::Comparison, StageWeights::new(0.50, 0.30, 0.12, 0.08));

        weights.insert(Intent::Factual, StageWeights::new(0.60, 0.20, 0.12, 0.08));
        weights.insert(Intent::Hypothetical, StageWeights::new(0.65, 0.15, 0.12, 0.08));

        weights.insert(Intent::General, StageWeights::new(0.45, 0.35, 0.12, 0.08));

        Self { weights }
    }

    /// Row for `intent`; the general row when none is configured.
    pub fn weights(&self, intent: Intent) -> StageWeights {
        self.weights
            .get(&intent)
            .or_else(|| self.weights.get(&Intent::General))
            .copied()
            .unwrap_or(StageWeights::new(0.45, 0.35, 0.12, 0.08))
    }
}

impl Default for WeightMatrix {
    fn default() -> Self {
        Self::default_weights()
    }
}
