use std::sync::Arc;

use precedent_core::config::TrustConfig;
use precedent_core::models::{ChunkType, EntityKind, Treatment, VerificationStatus};
use precedent_graph::{IGraphStore, InMemoryGraphStore};
use precedent_trust::{DirtySet, TopCitedView, TrustMaintenance};
use test_fixtures::{chunk, citation, entity};

fn store_with_cases() -> Arc<InMemoryGraphStore> {
    let store = Arc::new(InMemoryGraphStore::new());
    for id in ["a", "b", "c"] {
        store.insert_version(entity(id, EntityKind::Case, id)).unwrap();
    }
    store
        .insert_version(entity("s17", EntityKind::Section, "Section 17"))
        .unwrap();
    store
        .replace_chunks("a", vec![chunk("a", 0, ChunkType::Holding, "We hold.")])
        .unwrap();
    store
}

#[test]
fn pass_scores_only_dirty_entities() {
    let store = store_with_cases();
    let dirty = Arc::new(DirtySet::new());
    let maintenance = TrustMaintenance::new(store.clone(), dirty.clone(), TrustConfig::default());

    dirty.mark("a");
    let report = maintenance.run_pass(false).unwrap();
    assert_eq!(report.entities_rescored, 1);
    assert_eq!(report.chunks_rescored, 1);
    assert!(dirty.is_empty());

    let a = store.get_current("a").unwrap();
    assert!(a.trust.trust_score > 0.0 && a.trust.trust_score <= 1.0);
    assert_eq!(store.get_current("b").unwrap().trust.trust_score, 0.0);
    assert!(store.get_chunks("a")[0].trust.trust_score > 0.0);
}

#[test]
fn citations_raise_trust() {
    let store = store_with_cases();
    let dirty = Arc::new(DirtySet::new());
    let maintenance = TrustMaintenance::new(store.clone(), dirty, TrustConfig::default());
    maintenance.run_pass(true).unwrap();
    let before = store.get_current("a").unwrap().trust.trust_score;

    store
        .add_citation(citation("b", "a", Treatment::Follows, 0.9))
        .unwrap();
    store
        .add_citation(citation("c", "a", Treatment::Applies, 0.9))
        .unwrap();
    maintenance.dirty().mark("a");
    maintenance.run_pass(false).unwrap();

    let after = store.get_current("a").unwrap();
    assert_eq!(after.trust.citation_count, 2);
    assert!(after.trust.trust_score > before);
}

#[test]
fn verification_status_is_preserved() {
    let store = Arc::new(InMemoryGraphStore::new());
    let mut verified = entity("v", EntityKind::Statute, "Act");
    verified.trust.verification_status = VerificationStatus::Verified;
    store.insert_version(verified).unwrap();

    let maintenance =
        TrustMaintenance::new(store.clone(), Arc::new(DirtySet::new()), TrustConfig::default());
    maintenance.run_pass(true).unwrap();
    let v = store.get_current("v").unwrap();
    assert_eq!(v.trust.verification_status, VerificationStatus::Verified);
}

#[test]
fn top_cited_view_groups_by_kind() {
    let store = store_with_cases();
    store
        .add_citation(citation("b", "a", Treatment::Follows, 0.9))
        .unwrap();
    store
        .add_citation(citation("c", "a", Treatment::Follows, 0.9))
        .unwrap();
    store
        .add_citation(citation("a", "s17", Treatment::Applies, 0.9))
        .unwrap();

    let view = TopCitedView::new();
    let snapshot = store.snapshot();
    assert!(view.refresh(&snapshot, 20));
    assert!(!view.refresh(&snapshot, 20));

    let cases = view.top(EntityKind::Case);
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].entity_id, "a");
    assert_eq!(cases[0].citation_count, 2);
    assert_eq!(view.top(EntityKind::Section)[0].entity_id, "s17");
    assert!(view.top(EntityKind::Judge).is_empty());
}
