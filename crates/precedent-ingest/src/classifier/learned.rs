use std::sync::Arc;

use tracing::warn;

use precedent_core::traits::{ITreatmentModel, TreatmentPrediction};

use super::{ClassificationInput, TreatmentStrategy};

/// Adapter placing an external treatment model in the chain. Model errors
/// are logged and treated as an abstention.
pub struct LearnedModel {
    model: Arc<dyn ITreatmentModel>,
}

impl LearnedModel {
    pub fn new(model: Arc<dyn ITreatmentModel>) -> Self {
        Self { model }
    }
}

impl TreatmentStrategy for LearnedModel {
    fn name(&self) -> &str {
        self.model.name()
    }

    fn classify(&self, input: &ClassificationInput<'_>) -> Option<TreatmentPrediction> {
        match self.model.classify(input.context, input.cited_summary) {
            Ok(prediction) => prediction.map(|p| TreatmentPrediction {
                treatment: p.treatment,
                confidence: if p.confidence.is_finite() {
                    p.confidence.clamp(0.0, 1.0)
                } else {
                    0.0
                },
            }),
            Err(e) => {
                warn!(model = self.model.name(), error = %e, "treatment model failed, skipping");
                None
            }
        }
    }
}
