use chrono::{TimeZone, Utc};
use precedent_core::errors::*;
use precedent_core::models::{PrecedentStatus, ResolutionStatus, Treatment};

#[test]
fn entity_not_found_carries_id() {
    let err = PrecedentError::EntityNotFound {
        id: "case-abc".into(),
    };
    assert!(err.to_string().contains("case-abc"));
}

#[test]
fn temporal_errors_carry_entity_and_date() {
    let at = Utc.with_ymd_and_hms(2001, 5, 1, 0, 0, 0).unwrap();
    let err: PrecedentError = TemporalError::NoVersionFound {
        entity_id: "reg-act-s17".into(),
        at,
    }
    .into();
    let msg = err.to_string();
    assert!(msg.contains("reg-act-s17"));
    assert!(msg.contains("2001"));

    let err = TemporalError::AmbiguousVersion {
        entity_id: "reg-act-s17".into(),
        at,
        versions: vec![2, 3],
    };
    let msg = err.to_string();
    assert!(msg.contains("[2, 3]"));
}

#[test]
fn treatment_conflict_names_both_treatments() {
    let err = GraphError::TreatmentConflict {
        citing_id: "b".into(),
        cited_id: "a".into(),
        existing: Treatment::Follows,
        attempted: Treatment::Distinguishes,
    };
    let msg = err.to_string();
    assert!(msg.contains("follows"));
    assert!(msg.contains("distinguishes"));
}

#[test]
fn status_transition_error_names_statuses() {
    let err = TemporalError::InvalidStatusTransition {
        entity_id: "a".into(),
        from: PrecedentStatus::Deprecated,
        to: PrecedentStatus::Overruled,
    };
    let msg = err.to_string();
    assert!(msg.contains("deprecated"));
    assert!(msg.contains("overruled"));
}

#[test]
fn resolution_transition_error_is_debug_formatted() {
    let err = GraphError::InvalidResolutionTransition {
        from: ResolutionStatus::Resolved,
        to: ResolutionStatus::Unresolved,
    };
    assert!(err.to_string().contains("Resolved"));
}

#[test]
fn serde_json_error_converts() {
    let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: PrecedentError = bad.into();
    assert!(matches!(err, PrecedentError::SerializationError(_)));
}

#[test]
fn timeout_carries_component_and_duration() {
    let err = PrecedentError::Timeout {
        component: "reranker".into(),
        timeout_ms: 250,
    };
    let msg = err.to_string();
    assert!(msg.contains("reranker"));
    assert!(msg.contains("250"));
}
