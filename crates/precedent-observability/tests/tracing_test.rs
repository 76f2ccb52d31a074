use precedent_core::config::ObservabilityConfig;
use precedent_observability::{events, init_tracing, init_tracing_with_filter};

#[test]
fn second_init_reports_existing_subscriber() {
    let _ = init_tracing_with_filter("debug");
    assert!(!init_tracing(&ObservabilityConfig::default()));
}

#[test]
fn event_helpers_do_not_panic_without_subscriber() {
    events::entity_ingested("case-a", 3, 2, 1);
    events::citation_routed_to_review("case-c", "Alpha v. Beta", "follows", 0.4, false);
    events::status_changed("case-a", "active", "overruled", Some("case-b"));
    events::degradation_triggered("embedding", "timeout", "keyword_only");
    events::data_quality_flagged("temporal_gap", "s17", "2001..2002");
    events::trust_pass_completed(10, 40, 3);
    events::query_completed("statute_lookup", 5, false, 12);
}
