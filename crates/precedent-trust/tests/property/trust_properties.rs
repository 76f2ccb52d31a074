use proptest::prelude::*;

use precedent_core::config::TrustConfig;
use precedent_trust::formula::{compute, TrustInputs};

fn inputs() -> impl Strategy<Value = TrustInputs> {
    (
        -0.5f64..1.5,
        -0.5f64..1.5,
        -0.5f64..1.5,
        0u32..200,
        -0.5f64..1.5,
        -10.0f64..300.0,
    )
        .prop_map(|(a, v, e, c, p, y)| TrustInputs {
            source_authority: a,
            verification_factor: v,
            extraction_confidence: e,
            citation_count: c,
            parser_confidence: p,
            years_old: y,
        })
}

proptest! {
    #[test]
    fn trust_is_bounded(i in inputs()) {
        let t = compute(&i, &TrustConfig::default());
        prop_assert!((0.0..=1.0).contains(&t));
    }

    #[test]
    fn monotone_in_verification(i in inputs(), bump in 0.0f64..1.0) {
        let config = TrustConfig::default();
        let higher = TrustInputs { verification_factor: i.verification_factor + bump, ..i };
        prop_assert!(compute(&higher, &config) >= compute(&i, &config));
    }

    #[test]
    fn monotone_in_authority(i in inputs(), bump in 0.0f64..1.0) {
        let config = TrustConfig::default();
        let higher = TrustInputs { source_authority: i.source_authority + bump, ..i };
        prop_assert!(compute(&higher, &config) >= compute(&i, &config));
    }
}
