use crate::errors::PrecedentResult;
use crate::intent::Intent;
use crate::models::Treatment;

/// A treatment prediction with its confidence in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreatmentPrediction {
    pub treatment: Treatment,
    pub confidence: f64,
}

/// Learned treatment classifier: last stage of the classification chain.
pub trait ITreatmentModel: Send + Sync {
    /// `Ok(None)` means the model abstains.
    fn classify(
        &self,
        citing_text: &str,
        cited_summary: &str,
    ) -> PrecedentResult<Option<TreatmentPrediction>>;

    fn name(&self) -> &str;
}

/// Learned query-intent classifier: last stage of the intent chain.
pub trait IIntentModel: Send + Sync {
    fn classify(&self, query: &str) -> PrecedentResult<Option<(Intent, f64)>>;

    fn name(&self) -> &str;
}
