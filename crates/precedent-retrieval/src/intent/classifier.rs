//! Intent strategies: citation-shaped tokens, then leading-word heuristics,
//! then an optional learned model.

use std::sync::Arc;

use tracing::warn;

use precedent_core::intent::Intent;
use precedent_core::models::CitationType;
use precedent_core::traits::IIntentModel;
use precedent_ingest::CitationExtractor;

/// One stage of the intent chain. `None` passes to the next stage.
pub trait IntentStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn classify(&self, query: &str) -> Option<(Intent, f64)>;
}

/// A statutory or case reference in the query makes it a lookup.
pub struct ReferencePattern {
    extractor: CitationExtractor,
}

impl ReferencePattern {
    pub fn new() -> Self {
        Self {
            extractor: CitationExtractor::new(),
        }
    }
}

impl Default for ReferencePattern {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentStrategy for ReferencePattern {
    fn name(&self) -> &str {
        "reference_pattern"
    }

    fn classify(&self, query: &str) -> Option<(Intent, f64)> {
        let refs = self.extractor.extract(query);
        if refs.iter().any(|r| r.citation_type == CitationType::Statutory) {
            return Some((Intent::StatuteLookup, 0.95));
        }
        if refs.iter().any(|r| r.citation_type == CitationType::Judicial) {
            return Some((Intent::CaseLookup, 0.9));
        }
        None
    }
}

/// Phrases that mark a comparison anywhere in the query.
const COMPARISON_MARKERS: &[&str] = &[
    "compare",
    "comparison",
    "difference between",
    "differences between",
    "distinguish between",
    "contrast",
    " versus ",
    " vs ",
];

/// Leading words mapped to intents, checked in order.
const LEADING_WORDS: &[(Intent, &[&str])] = &[
    (
        Intent::Hypothetical,
        &["what if", "suppose", "supposing", "assuming", "hypothetically", "if a ", "if an "],
    ),
    (
        Intent::Definition,
        &["what is", "what are", "what does", "define", "definition of", "meaning of", "who is"],
    ),
    (
        Intent::Procedure,
        &["how to", "how do", "how can", "how does", "procedure", "steps to", "process for"],
    ),
    (
        Intent::Factual,
        &["whether", "can ", "is it", "does ", "do i", "am i", "should ", "must ", "when "],
    ),
];

/// Leading-word heuristics over the lowercased query.
pub struct LexicalHeuristic;

impl IntentStrategy for LexicalHeuristic {
    fn name(&self) -> &str {
        "lexical_heuristic"
    }

    fn classify(&self, query: &str) -> Option<(Intent, f64)> {
        let lowered = format!("{} ", query.trim().to_lowercase());
        if COMPARISON_MARKERS.iter().any(|m| lowered.contains(m)) {
            return Some((Intent::Comparison, 0.8));
        }
        LEADING_WORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| lowered.starts_with(w)))
            .map(|(intent, _)| (*intent, 0.75))
    }
}

/// Adapter putting an [`IIntentModel`] at the end of the chain. Model
/// errors abstain.
pub struct LearnedIntent {
    model: Arc<dyn IIntentModel>,
}

impl LearnedIntent {
    pub fn new(model: Arc<dyn IIntentModel>) -> Self {
        Self { model }
    }
}

impl IntentStrategy for LearnedIntent {
    fn name(&self) -> &str {
        self.model.name()
    }

    fn classify(&self, query: &str) -> Option<(Intent, f64)> {
        match self.model.classify(query) {
            Ok(prediction) => prediction.map(|(intent, conf)| (intent, conf.clamp(0.0, 1.0))),
            Err(e) => {
                warn!(model = self.model.name(), error = %e, "intent model failed; abstaining");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_reference_is_statute_lookup() {
        let got = ReferencePattern::new().classify("Section 17 registration");
        assert_eq!(got.map(|(i, _)| i), Some(Intent::StatuteLookup));
    }

    #[test]
    fn case_name_is_case_lookup() {
        let got = ReferencePattern::new().classify("Alpha Builders v. Union of India");
        assert_eq!(got.map(|(i, _)| i), Some(Intent::CaseLookup));
    }

    #[test]
    fn plain_question_has_no_reference() {
        assert!(ReferencePattern::new()
            .classify("is an unregistered sale deed admissible")
            .is_none());
    }

    #[test]
    fn leading_words() {
        let cases = [
            ("What is adverse possession", Intent::Definition),
            ("how to file an appeal", Intent::Procedure),
            ("compare gift and sale", Intent::Comparison),
            ("What is the difference between a lease and a licence", Intent::Comparison),
            ("what if the buyer never paid", Intent::Hypothetical),
            ("whether an oral gift is valid", Intent::Factual),
        ];
        for (query, expected) in cases {
            assert_eq!(
                LexicalHeuristic.classify(query).map(|(i, _)| i),
                Some(expected),
                "{query}"
            );
        }
        assert!(LexicalHeuristic.classify("tenancy").is_none());
    }
}
