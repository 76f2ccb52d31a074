mod classifier;
mod embedding;
mod scorer;

pub use classifier::{IIntentModel, ITreatmentModel, TreatmentPrediction};
pub use embedding::IEmbeddingProvider;
pub use scorer::IPairwiseScorer;
