//! Treatment classification as an ordered strategy chain with early exit:
//! explicit signals, statutory references, context heuristics, an optional
//! learned model, then a default for bare mentions.

pub mod acceptance;
pub mod learned;
pub mod signals;

use std::sync::Arc;

use precedent_core::models::{CitationType, Treatment};
use precedent_core::traits::{ITreatmentModel, TreatmentPrediction};

pub use acceptance::Acceptance;

/// What a strategy sees: the citing text around the reference and the
/// cited entity's summary (empty when unresolved).
#[derive(Debug, Clone, Copy)]
pub struct ClassificationInput<'a> {
    pub citation_type: CitationType,
    pub context: &'a str,
    pub cited_summary: &'a str,
}

/// One stage of the chain. `None` passes to the next stage.
pub trait TreatmentStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn classify(&self, input: &ClassificationInput<'_>) -> Option<TreatmentPrediction>;
}

/// A prediction and the stage that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub treatment: Treatment,
    pub confidence: f64,
    pub strategy: String,
}

pub struct TreatmentClassifier {
    chain: Vec<Box<dyn TreatmentStrategy>>,
}

impl TreatmentClassifier {
    /// Rule-based chain without a learned stage.
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_model(model: Arc<dyn ITreatmentModel>) -> Self {
        Self::build(Some(model))
    }

    fn build(model: Option<Arc<dyn ITreatmentModel>>) -> Self {
        let mut chain: Vec<Box<dyn TreatmentStrategy>> = vec![
            Box::new(signals::ExplicitSignal),
            Box::new(signals::StatutoryReference),
            Box::new(signals::ContextHeuristic),
        ];
        if let Some(model) = model {
            chain.push(Box::new(learned::LearnedModel::new(model)));
        }
        chain.push(Box::new(signals::DefaultMention));
        Self { chain }
    }

    /// Stage names in evaluation order.
    pub fn stages(&self) -> Vec<&str> {
        self.chain.iter().map(|s| s.name()).collect()
    }

    pub fn classify(&self, input: &ClassificationInput<'_>) -> Classification {
        self.chain
            .iter()
            .find_map(|stage| {
                stage.classify(input).map(|p| Classification {
                    treatment: p.treatment,
                    confidence: p.confidence,
                    strategy: stage.name().to_string(),
                })
            })
            .unwrap_or_else(|| Classification {
                treatment: Treatment::Applies,
                confidence: 0.0,
                strategy: "none".to_string(),
            })
    }
}

impl Default for TreatmentClassifier {
    fn default() -> Self {
        Self::new()
    }
}
