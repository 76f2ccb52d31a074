use precedent_core::models::*;
use precedent_graph::traversal::{expand, ExpansionConfig};
use precedent_graph::{IGraphStore, InMemoryGraphStore};
use test_fixtures::{citation, entity};

/// a -> b -> c -> d -> e chain of citations.
fn chain() -> InMemoryGraphStore {
    let store = InMemoryGraphStore::new();
    for id in ["a", "b", "c", "d", "e"] {
        store.insert_version(entity(id, EntityKind::Case, id)).unwrap();
    }
    for (from, to) in [("a", "b"), ("b", "c"), ("c", "d"), ("d", "e")] {
        store
            .add_citation(citation(from, to, Treatment::Applies, 0.9))
            .unwrap();
    }
    store
}

#[test]
fn expansion_respects_max_hops() {
    let store = chain();
    let config = ExpansionConfig {
        max_hops: 2,
        budget: 100,
        include_pending: false,
    };
    let found = expand(&store.snapshot(), &["a".to_string()], &config);
    let ids: Vec<_> = found.iter().map(|n| n.entity_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c"]);
    assert_eq!(found[1].hop, 2);
    assert_eq!(found[1].via_entity_id, "b");
}

#[test]
fn expansion_never_exceeds_three_hops() {
    let store = chain();
    let config = ExpansionConfig {
        max_hops: 10,
        budget: 100,
        include_pending: false,
    };
    let found = expand(&store.snapshot(), &["a".to_string()], &config);
    assert!(found.iter().all(|n| n.hop <= 3));
    assert!(!found.iter().any(|n| n.entity_id == "e"));
}

#[test]
fn expansion_respects_budget() {
    let store = chain();
    let config = ExpansionConfig {
        max_hops: 3,
        budget: 1,
        include_pending: false,
    };
    let found = expand(&store.snapshot(), &["c".to_string()], &config);
    assert_eq!(found.len(), 1);
}

#[test]
fn expansion_follows_incoming_edges_and_skips_seeds() {
    let store = chain();
    let found = expand(
        &store.snapshot(),
        &["c".to_string(), "d".to_string()],
        &ExpansionConfig::default(),
    );
    let ids: Vec<_> = found.iter().map(|n| n.entity_id.as_str()).collect();
    assert!(ids.contains(&"b"));
    assert!(ids.contains(&"e"));
    assert!(!ids.contains(&"c"));
    assert!(!ids.contains(&"d"));
}

#[test]
fn pending_edges_are_not_followed_by_default() {
    let store = InMemoryGraphStore::new();
    for id in ["a", "b"] {
        store.insert_version(entity(id, EntityKind::Case, id)).unwrap();
    }
    let mut edge = citation("a", "b", Treatment::Applies, 0.7);
    edge.state = EdgeState::PendingReview;
    store.add_citation(edge).unwrap();
    let snapshot = store.snapshot();
    assert!(expand(&snapshot, &["a".to_string()], &ExpansionConfig::default()).is_empty());
    let with_pending = ExpansionConfig {
        include_pending: true,
        ..ExpansionConfig::default()
    };
    assert_eq!(expand(&snapshot, &["a".to_string()], &with_pending).len(), 1);
}

#[test]
fn isolated_seed_terminates_immediately() {
    let store = InMemoryGraphStore::new();
    store.insert_version(entity("lonely", EntityKind::Case, "x")).unwrap();
    assert!(expand(&store.snapshot(), &["lonely".to_string()], &ExpansionConfig::default()).is_empty());
}
