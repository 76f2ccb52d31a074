use std::sync::Arc;

use precedent_core::errors::{GraphError, PrecedentError};
use precedent_core::models::*;
use precedent_graph::{consistency, IGraphStore, InMemoryGraphStore};
use test_fixtures::{chunk, citation, entity, version};

fn store_with_cases(ids: &[&str]) -> InMemoryGraphStore {
    let store = InMemoryGraphStore::new();
    for id in ids {
        store
            .insert_version(entity(id, EntityKind::Case, &format!("{id} title")))
            .unwrap();
    }
    store
}

#[test]
fn second_current_version_is_rejected() {
    let store = InMemoryGraphStore::new();
    store.insert_version(version("s17", 1, 1908, None, true)).unwrap();
    let err = store
        .insert_version(version("s17", 2, 2001, None, true))
        .unwrap_err();
    assert!(matches!(
        err,
        PrecedentError::GraphError(GraphError::MultipleCurrentVersions { .. })
    ));
    assert_eq!(store.get_versions("s17").len(), 1);
}

#[test]
fn inverted_validity_is_rejected() {
    let store = InMemoryGraphStore::new();
    let err = store
        .insert_version(version("s17", 1, 2001, Some(1999), true))
        .unwrap_err();
    assert!(matches!(
        err,
        PrecedentError::GraphError(GraphError::InvalidValidity { .. })
    ));
}

#[test]
fn duplicate_version_number_is_rejected() {
    let store = InMemoryGraphStore::new();
    store.insert_version(version("s17", 1, 1908, Some(2001), false)).unwrap();
    let err = store
        .insert_version(version("s17", 1, 2001, None, true))
        .unwrap_err();
    assert!(matches!(
        err,
        PrecedentError::GraphError(GraphError::DuplicateVersion { version: 1, .. })
    ));
}

#[test]
fn follows_then_distinguishes_is_refused() {
    let store = store_with_cases(&["a", "b"]);
    store
        .add_citation(citation("b", "a", Treatment::Follows, 0.9))
        .unwrap();
    let mut second = citation("b", "a", Treatment::Distinguishes, 0.9);
    second.id = "other-edge".into();
    let err = store.add_citation(second).unwrap_err();
    assert!(matches!(
        err,
        PrecedentError::GraphError(GraphError::TreatmentConflict {
            existing: Treatment::Follows,
            attempted: Treatment::Distinguishes,
            ..
        })
    ));
    assert_eq!(store.citations_from("b").len(), 1);
}

#[test]
fn same_edge_id_replaces_instead_of_duplicating() {
    let store = store_with_cases(&["a", "b"]);
    let edge = citation("b", "a", Treatment::Applies, 0.9);
    store.add_citation(edge.clone()).unwrap();
    store.add_citation(edge).unwrap();
    assert_eq!(store.citations_to("a").len(), 1);
    assert_eq!(store.snapshot().graph().edge_count(), 1);
}

#[test]
fn unresolved_citations_are_retained_without_graph_edge() {
    let store = store_with_cases(&["b"]);
    let mut edge = citation("b", "ghost", Treatment::Applies, 0.9);
    edge.cited_id = None;
    store.add_citation(edge).unwrap();
    assert_eq!(store.citations_from("b").len(), 1);
    assert_eq!(store.snapshot().graph().edge_count(), 0);
}

#[test]
fn citation_to_unknown_entity_is_rejected() {
    let store = store_with_cases(&["b"]);
    let err = store
        .add_citation(citation("b", "ghost", Treatment::Applies, 0.9))
        .unwrap_err();
    assert!(matches!(err, PrecedentError::EntityNotFound { .. }));
}

#[test]
fn pending_edges_do_not_count_as_citations() {
    let store = store_with_cases(&["a", "b", "c"]);
    store
        .add_citation(citation("b", "a", Treatment::Applies, 0.9))
        .unwrap();
    let mut pending = citation("c", "a", Treatment::Applies, 0.7);
    pending.state = EdgeState::PendingReview;
    store.add_citation(pending.clone()).unwrap();
    assert_eq!(store.snapshot().active_citation_count("a"), 1);

    store
        .set_citation_state(&pending.id, EdgeState::Active)
        .unwrap();
    assert_eq!(store.snapshot().active_citation_count("a"), 2);
}

#[test]
fn snapshots_are_isolated_from_later_writes() {
    let store = store_with_cases(&["a", "b"]);
    let before = store.snapshot();
    store
        .add_citation(citation("b", "a", Treatment::Applies, 0.9))
        .unwrap();
    assert_eq!(before.citations_to("a").len(), 0);
    assert_eq!(store.snapshot().citations_to("a").len(), 1);
    assert!(store.snapshot().generation() > before.generation());
    assert_eq!(Arc::strong_count(&before), 1);
}

#[test]
fn replace_chunks_discards_previous_chunks() {
    let store = store_with_cases(&["a"]);
    store
        .replace_chunks(
            "a",
            vec![
                chunk("a", 0, ChunkType::Facts, "one"),
                chunk("a", 1, ChunkType::Holding, "two"),
            ],
        )
        .unwrap();
    store
        .replace_chunks("a", vec![chunk("a", 0, ChunkType::Facts, "only")])
        .unwrap();
    let chunks = store.get_chunks("a");
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "only");
    assert!(store.snapshot().chunk("a:1").is_none());
}

#[test]
fn alias_resolution_normalizes_and_refuses_ambiguity() {
    let store = InMemoryGraphStore::new();
    let mut s17 = entity("ra-s17", EntityKind::Section, "Registration Act, 1908, Section 17");
    s17.attributes.aliases = vec!["Section 17 of the Registration Act".into(), "Section 17".into()];
    let mut other = entity("ca-s17", EntityKind::Section, "Contract Act, 1872, Section 17");
    other.attributes.aliases = vec!["Section 17".into()];
    store.insert_version(s17).unwrap();
    store.insert_version(other).unwrap();

    assert_eq!(
        store.resolve_alias("s. 17 of the Registration Act").as_deref(),
        Some("ra-s17")
    );
    assert_eq!(store.resolve_alias("Section 17"), None);
    assert_eq!(store.snapshot().alias_candidates("sec. 17").len(), 2);
}

#[test]
fn status_append_assigns_sequences_and_checks_previous() {
    let store = store_with_cases(&["a"]);
    let change = |prev, next| StatusChange {
        sequence: 0,
        entity_id: "a".into(),
        previous_status: prev,
        new_status: next,
        change_date: chrono::Utc::now(),
        reason: "test".into(),
        triggering_entity_id: Some("b".into()),
        kind: StatusChangeKind::Transition,
    };
    let first = store
        .append_status_change(change(PrecedentStatus::Active, PrecedentStatus::Overruled))
        .unwrap();
    assert_eq!(first.sequence, 1);
    assert_eq!(store.current_status("a"), PrecedentStatus::Overruled);

    let stale = store.append_status_change(change(PrecedentStatus::Active, PrecedentStatus::Deprecated));
    assert!(matches!(stale, Err(PrecedentError::ConcurrencyError(_))));
    assert_eq!(store.status_history("a").len(), 1);
}

#[test]
fn review_queue_deduplicates_items() {
    let store = InMemoryGraphStore::new();
    let item = ReviewItem::new(ReviewKind::TemporalGap, "s17", None, "gap");
    assert!(store.enqueue_review(item.clone()).unwrap());
    assert!(!store.enqueue_review(item.clone()).unwrap());
    assert_eq!(store.review_items().len(), 1);
    assert!(store.remove_review(&item.id).unwrap().is_some());
    assert!(store.review_items().is_empty());
}

#[test]
fn resolution_state_machine_is_enforced() {
    let store = InMemoryGraphStore::new();
    let mut a = entity("a", EntityKind::Case, "A");
    a.attributes.jurisdiction = Some("IN".into());
    let mut b = entity("b", EntityKind::Case, "B");
    b.attributes.jurisdiction = Some("UK".into());
    store.insert_version(a).unwrap();
    store.insert_version(b).unwrap();

    let relation = CrossJurisdictionRelation::new("a", "b", JurisdictionRelationKind::ConflictsWith, 0.8);
    let id = relation.id.clone();
    store.add_relation(relation).unwrap();

    assert_eq!(consistency::conflicting_active_precedents(&store.snapshot()).len(), 1);

    store.update_resolution(&id, ResolutionStatus::PartiallyResolved).unwrap();
    store.update_resolution(&id, ResolutionStatus::PendingHigherCourt).unwrap();
    let err = store.update_resolution(&id, ResolutionStatus::Resolved).unwrap_err();
    assert!(matches!(
        err,
        PrecedentError::GraphError(GraphError::InvalidResolutionTransition { .. })
    ));
    assert!(consistency::conflicting_active_precedents(&store.snapshot()).is_empty());
}

#[test]
fn same_jurisdiction_relation_is_rejected() {
    let store = InMemoryGraphStore::new();
    let mut a = entity("a", EntityKind::Case, "A");
    a.attributes.jurisdiction = Some("IN".into());
    let mut b = entity("b", EntityKind::Case, "B");
    b.attributes.jurisdiction = Some("in".into());
    store.insert_version(a).unwrap();
    store.insert_version(b).unwrap();
    let relation = CrossJurisdictionRelation::new("a", "b", JurisdictionRelationKind::DivergesFrom, 0.5);
    assert!(store.add_relation(relation).is_err());
}
