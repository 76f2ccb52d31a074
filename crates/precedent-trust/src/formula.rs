use chrono::{DateTime, Utc};

use precedent_core::config::TrustConfig;
use precedent_core::models::{Chunk, LegalEntity};

use crate::factors;

const W_AUTHORITY: f64 = 0.40;
const W_EXTRACTION: f64 = 0.20;
const W_FREQUENCY: f64 = 0.15;
const W_PARSER: f64 = 0.15;
const W_RECENCY: f64 = 0.10;

/// Raw inputs to the trust formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrustInputs {
    pub source_authority: f64,
    pub verification_factor: f64,
    pub extraction_confidence: f64,
    pub citation_count: u32,
    pub parser_confidence: f64,
    pub years_old: f64,
}

impl TrustInputs {
    pub fn for_entity(entity: &LegalEntity, citation_count: u32, now: DateTime<Utc>) -> Self {
        Self {
            source_authority: entity.provenance.source_tier.authority(),
            verification_factor: entity.trust.verification_status.factor(),
            extraction_confidence: entity.provenance.confidence_score,
            citation_count,
            parser_confidence: entity.trust.parser_confidence,
            years_old: factors::recency::years_between(entity.reference_date(), now),
        }
    }

    /// A chunk inherits the entity's verification, citations and age, but
    /// carries its own provenance and parser confidence.
    pub fn for_chunk(chunk: &Chunk, entity: &LegalEntity, citation_count: u32, now: DateTime<Utc>) -> Self {
        Self {
            source_authority: chunk.provenance.source_tier.authority(),
            extraction_confidence: chunk.provenance.confidence_score,
            parser_confidence: chunk.trust.parser_confidence,
            ..Self::for_entity(entity, citation_count, now)
        }
    }
}

/// Per-term values for debugging and observability.
#[derive(Debug, Clone, PartialEq)]
pub struct TrustBreakdown {
    pub authority_term: f64,
    pub extraction_term: f64,
    pub frequency_term: f64,
    pub parser_term: f64,
    pub recency_term: f64,
    pub trust: f64,
}

/// Five-term weighted trust score.
///
/// ```text
/// trust = 0.40 · authority · verification
///       + 0.20 · extraction
///       + 0.15 · min(1, citations / saturation)
///       + 0.15 · parser
///       + 0.10 · clamp(1 − years / horizon, floor, 1)
/// ```
///
/// Every term is clamped to [0, 1] first; the result is clamped to [0, 1].
pub fn compute(inputs: &TrustInputs, config: &TrustConfig) -> f64 {
    compute_breakdown(inputs, config).trust
}

pub fn compute_breakdown(inputs: &TrustInputs, config: &TrustConfig) -> TrustBreakdown {
    let authority = unit(inputs.source_authority) * unit(inputs.verification_factor);
    let extraction = unit(inputs.extraction_confidence);
    let frequency = factors::citation::frequency(inputs.citation_count, config.citation_saturation);
    let parser = unit(inputs.parser_confidence);
    let recency = factors::recency::score(
        inputs.years_old,
        config.recency_horizon_years,
        config.recency_floor,
    );

    let trust = (W_AUTHORITY * authority
        + W_EXTRACTION * extraction
        + W_FREQUENCY * frequency
        + W_PARSER * parser
        + W_RECENCY * recency)
        .clamp(0.0, 1.0);

    TrustBreakdown {
        authority_term: authority,
        extraction_term: extraction,
        frequency_term: frequency,
        parser_term: parser,
        recency_term: recency,
        trust,
    }
}

// NaN collapses to 0.
fn unit(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perfect() -> TrustInputs {
        TrustInputs {
            source_authority: 1.0,
            verification_factor: 1.0,
            extraction_confidence: 1.0,
            citation_count: 20,
            parser_confidence: 1.0,
            years_old: 0.0,
        }
    }

    #[test]
    fn perfect_inputs_score_one() {
        assert!((compute(&perfect(), &TrustConfig::default()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unverified_uncited_old_judgment() {
        let inputs = TrustInputs {
            verification_factor: 0.9,
            citation_count: 0,
            years_old: 80.0,
            ..perfect()
        };
        // 0.36 + 0.20 + 0 + 0.15 + 0.05
        assert!((compute(&inputs, &TrustConfig::default()) - 0.76).abs() < 1e-12);
    }

    #[test]
    fn deprecated_source_loses_authority_term() {
        let inputs = TrustInputs {
            verification_factor: 0.0,
            ..perfect()
        };
        let b = compute_breakdown(&inputs, &TrustConfig::default());
        assert_eq!(b.authority_term, 0.0);
        assert!((b.trust - 0.6).abs() < 1e-12);
    }
}
