//! Rule-based treatment strategies.

use std::sync::LazyLock;

use regex::Regex;

use precedent_core::models::{CitationType, Treatment};
use precedent_core::traits::TreatmentPrediction;

use super::{ClassificationInput, TreatmentStrategy};
use crate::patterns::{
    is_match, RE_CONTEXT_COMPARE, RE_CONTEXT_CONSISTENT, RE_CONTEXT_CONTRA, RE_CONTEXT_RELIED,
    RE_CONTEXT_SEE_ALSO, RE_NEGATION, RE_TREAT_APPLIED, RE_TREAT_CRITICIZED,
    RE_TREAT_DISTINGUISHED, RE_TREAT_FOLLOWED, RE_TREAT_HARMONIZED, RE_TREAT_OVERRULED,
    RE_TREAT_QUALIFIED,
};

type Signal = (&'static LazyLock<Option<Regex>>, Treatment, f64);

/// Characters before a signal word searched for a negation.
const NEGATION_WINDOW: usize = 20;

fn predict(treatment: Treatment, confidence: f64) -> Option<TreatmentPrediction> {
    Some(TreatmentPrediction {
        treatment,
        confidence,
    })
}

/// The last `n` characters of `text[..pos]`.
fn preceding(text: &str, pos: usize, n: usize) -> &str {
    let head = &text[..pos];
    let start = head
        .char_indices()
        .rev()
        .nth(n.saturating_sub(1))
        .map_or(0, |(i, _)| i);
    &head[start..]
}

/// A non-negated occurrence of the pattern.
fn affirmed(pattern: &LazyLock<Option<Regex>>, text: &str) -> bool {
    let Some(re) = pattern.as_ref() else {
        return false;
    };
    re.find_iter(text)
        .any(|m| !is_match(&RE_NEGATION, preceding(text, m.start(), NEGATION_WINDOW)))
}

/// Strongest signals first.
static EXPLICIT_SIGNALS: [Signal; 7] = [
    (&RE_TREAT_OVERRULED, Treatment::Overruled, 0.95),
    (&RE_TREAT_DISTINGUISHED, Treatment::Distinguishes, 0.9),
    (&RE_TREAT_CRITICIZED, Treatment::Criticizes, 0.8),
    (&RE_TREAT_QUALIFIED, Treatment::Qualified, 0.8),
    (&RE_TREAT_HARMONIZED, Treatment::Harmonized, 0.85),
    (&RE_TREAT_FOLLOWED, Treatment::Follows, 0.9),
    (&RE_TREAT_APPLIED, Treatment::Applies, 0.88),
];

static CONTEXT_SIGNALS: [Signal; 5] = [
    (&RE_CONTEXT_COMPARE, Treatment::Follows, 0.40),
    (&RE_CONTEXT_SEE_ALSO, Treatment::Applies, 0.62),
    (&RE_CONTEXT_RELIED, Treatment::Follows, 0.75),
    (&RE_CONTEXT_CONSISTENT, Treatment::Harmonized, 0.70),
    (&RE_CONTEXT_CONTRA, Treatment::Criticizes, 0.55),
];

/// Explicit treatment verbs ("overruled", "distinguished", "followed").
pub struct ExplicitSignal;

impl TreatmentStrategy for ExplicitSignal {
    fn name(&self) -> &str {
        "explicit_signal"
    }

    fn classify(&self, input: &ClassificationInput<'_>) -> Option<TreatmentPrediction> {
        EXPLICIT_SIGNALS
            .iter()
            .find(|(pattern, _, _)| affirmed(pattern, input.context))
            .and_then(|(_, treatment, confidence)| predict(*treatment, *confidence))
    }
}

/// Statutes are applied, not followed or distinguished.
pub struct StatutoryReference;

impl TreatmentStrategy for StatutoryReference {
    fn name(&self) -> &str {
        "statutory_reference"
    }

    fn classify(&self, input: &ClassificationInput<'_>) -> Option<TreatmentPrediction> {
        if input.citation_type == CitationType::Statutory {
            predict(Treatment::Applies, 0.88)
        } else {
            None
        }
    }
}

/// Citation signals and reliance phrases; weaker than explicit verbs.
pub struct ContextHeuristic;

impl TreatmentStrategy for ContextHeuristic {
    fn name(&self) -> &str {
        "context_heuristic"
    }

    fn classify(&self, input: &ClassificationInput<'_>) -> Option<TreatmentPrediction> {
        CONTEXT_SIGNALS
            .iter()
            .find(|(pattern, _, _)| is_match(pattern, input.context))
            .and_then(|(_, treatment, confidence)| predict(*treatment, *confidence))
    }
}

/// A bare mention: treated as applied, below the auto-accept threshold.
pub struct DefaultMention;

impl TreatmentStrategy for DefaultMention {
    fn name(&self) -> &str {
        "default_mention"
    }

    fn classify(&self, _input: &ClassificationInput<'_>) -> Option<TreatmentPrediction> {
        predict(Treatment::Applies, 0.62)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn judicial(context: &str) -> ClassificationInput<'_> {
        ClassificationInput {
            citation_type: CitationType::Judicial,
            context,
            cited_summary: "",
        }
    }

    #[test]
    fn overruled_is_strongest() {
        let p = ExplicitSignal
            .classify(&judicial("Alpha v. Beta, though followed once, is hereby overruled."))
            .unwrap();
        assert_eq!(p.treatment, Treatment::Overruled);
        assert_eq!(p.confidence, 0.95);
    }

    #[test]
    fn negated_signal_is_ignored() {
        assert!(ExplicitSignal
            .classify(&judicial("Alpha v. Beta was not overruled by the larger bench."))
            .is_none());
        let p = ExplicitSignal
            .classify(&judicial("Alpha v. Beta, never distinguished, was followed here."))
            .unwrap();
        assert_eq!(p.treatment, Treatment::Follows);
    }

    #[test]
    fn following_the_decision() {
        let p = ExplicitSignal
            .classify(&judicial("Following the decision in Alpha v. Beta, the appeal fails."))
            .unwrap();
        assert_eq!(p.treatment, Treatment::Follows);
    }

    #[test]
    fn statutory_only_for_statutes() {
        let input = ClassificationInput {
            citation_type: CitationType::Statutory,
            context: "Section 17 makes registration compulsory.",
            cited_summary: "",
        };
        assert_eq!(
            StatutoryReference.classify(&input).map(|p| p.treatment),
            Some(Treatment::Applies)
        );
        assert!(StatutoryReference.classify(&judicial("Alpha v. Beta")).is_none());
    }

    #[test]
    fn compare_signal_is_weak() {
        let p = ContextHeuristic
            .classify(&judicial("Counsel referred to it, cf. Alpha v. Beta."))
            .unwrap();
        assert_eq!(p.treatment, Treatment::Follows);
        assert!(p.confidence < 0.6);
    }

    #[test]
    fn preceding_window_is_char_safe() {
        assert_eq!(preceding("café overruled", 6, 3), "fé ");
        assert_eq!(preceding("ab", 2, 20), "ab");
    }
}
