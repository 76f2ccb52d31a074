use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use precedent_core::models::{EntityKind, PrecedentStatus};
use precedent_graph::{IGraphStore, InMemoryGraphStore};
use precedent_temporal::{coverage, resolve_version, StatusPropagationManager};
use test_fixtures::{entity, version};

use std::sync::Arc;

// Gap-free chain built from positive durations in years.
fn chain_from(lengths: &[i32]) -> Vec<precedent_core::models::LegalEntity> {
    let mut start = 1900;
    let last = lengths.len() - 1;
    lengths
        .iter()
        .enumerate()
        .map(|(i, len)| {
            let end = if i == last { None } else { Some(start + len) };
            let v = version("s", i as u32 + 1, start, end, i == last);
            start += len;
            v
        })
        .collect()
}

proptest! {
    #[test]
    fn gap_free_chain_resolves_exactly_once(
        lengths in prop::collection::vec(1i32..40, 1..6),
        offset_days in 0i64..(200 * 365),
    ) {
        let chain = chain_from(&lengths);
        prop_assert!(coverage::audit(&chain).is_empty());

        let origin = Utc.with_ymd_and_hms(1900, 1, 1, 0, 0, 0).unwrap();
        let at = origin + Duration::days(offset_days);
        let resolved = resolve_version(&chain, "s", at);
        prop_assert!(resolved.is_ok());
        let hits = chain.iter().filter(|v| v.covers(at)).count();
        prop_assert_eq!(hits, 1);
    }

    #[test]
    fn current_status_is_last_appended(flips in prop::collection::vec(any::<bool>(), 1..12)) {
        let store = Arc::new(InMemoryGraphStore::new());
        store.insert_version(entity("a", EntityKind::Case, "a")).unwrap();
        store.insert_version(entity("b", EntityKind::Case, "b")).unwrap();
        let manager = StatusPropagationManager::new(store.clone());
        let date = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();

        let mut seen = Vec::new();
        for overrule in flips {
            let status = manager.current_status("a");
            let result = if overrule && status == PrecedentStatus::Active {
                manager.record_change("a", PrecedentStatus::Overruled, "x", Some("b"), date)
            } else if !overrule && status == PrecedentStatus::Overruled {
                manager.reinstate("a", "b", "y", date)
            } else {
                continue;
            };
            let change = result.unwrap();
            let history = manager.history("a").unwrap();
            prop_assert_eq!(&history[..seen.len()], &seen[..]);
            prop_assert_eq!(history.last(), Some(&change));
            prop_assert_eq!(manager.current_status("a"), change.new_status);
            seen = history;
        }
    }
}
