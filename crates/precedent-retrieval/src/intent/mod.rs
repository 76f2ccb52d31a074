//! IntentEngine: classify a query and look up its stage weights.

pub mod classifier;
pub mod weight_matrix;

use std::sync::Arc;

use tracing::debug;

use precedent_core::intent::Intent;
use precedent_core::traits::IIntentModel;

use classifier::{IntentStrategy, LearnedIntent, LexicalHeuristic, ReferencePattern};
use weight_matrix::{StageWeights, WeightMatrix};

/// Outcome of intent classification.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentDecision {
    pub intent: Intent,
    pub confidence: f64,
    /// Strategy that decided, or "fallback".
    pub strategy: String,
}

pub struct IntentEngine {
    chain: Vec<Box<dyn IntentStrategy>>,
    matrix: WeightMatrix,
}

impl IntentEngine {
    pub fn new() -> Self {
        Self {
            chain: vec![Box::new(ReferencePattern::new()), Box::new(LexicalHeuristic)],
            matrix: WeightMatrix::default_weights(),
        }
    }

    /// Append a learned model as the last stage.
    pub fn with_model(mut self, model: Arc<dyn IIntentModel>) -> Self {
        self.chain.push(Box::new(LearnedIntent::new(model)));
        self
    }

    /// First stage with an answer wins; `General` when none answers.
    pub fn classify(&self, query: &str) -> IntentDecision {
        for stage in &self.chain {
            if let Some((intent, confidence)) = stage.classify(query) {
                debug!(%intent, confidence, strategy = stage.name(), "classified intent");
                return IntentDecision {
                    intent,
                    confidence,
                    strategy: stage.name().to_string(),
                };
            }
        }
        IntentDecision {
            intent: Intent::General,
            confidence: 0.5,
            strategy: "fallback".to_string(),
        }
    }

    pub fn weights(&self, intent: Intent) -> StageWeights {
        self.matrix.weights(intent)
    }
}

impl Default for IntentEngine {
    fn default() -> Self {
        Self::new()
    }
}
