//! Caller filters applied to candidates before and after expansion.

use precedent_core::models::{PrecedentStatus, RetrievalFilters};
use precedent_graph::GraphState;
use precedent_temporal::resolver::resolve_in_state;

use crate::search::Candidate;

/// Whether the entity behind a candidate passes every filter.
pub fn admits(state: &GraphState, filters: &RetrievalFilters, entity_id: &str) -> bool {
    let Some(entity) = state.current(entity_id) else {
        return false;
    };
    if let Some(wanted) = &filters.jurisdiction {
        let matches = entity
            .attributes
            .jurisdiction
            .as_deref()
            .is_some_and(|j| j.eq_ignore_ascii_case(wanted));
        if !matches {
            return false;
        }
    }
    if !filters.kinds.is_empty() && !filters.kinds.contains(&entity.kind) {
        return false;
    }
    if let Some(min) = filters.min_trust {
        if entity.trust.trust_score < min {
            return false;
        }
    }
    if let Some(at) = filters.as_of {
        // Gaps and overlaps are data-quality defects reported elsewhere;
        // here they simply exclude.
        if resolve_in_state(state, entity_id, at).is_err() {
            return false;
        }
    }
    if filters.exclude_inactive
        && matches!(
            state.current_status(entity_id),
            PrecedentStatus::Overruled | PrecedentStatus::Superseded
        )
    {
        return false;
    }
    true
}

pub fn apply(state: &GraphState, filters: &RetrievalFilters, candidates: Vec<Candidate>) -> Vec<Candidate> {
    if *filters == RetrievalFilters::default() {
        return candidates
            .into_iter()
            .filter(|c| state.contains_entity(&c.entity_id))
            .collect();
    }
    candidates
        .into_iter()
        .filter(|c| admits(state, filters, &c.entity_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use precedent_core::models::{EntityKind, StatusChange, StatusChangeKind};
    use test_fixtures::{entity, year};

    fn state() -> GraphState {
        let mut state = GraphState::new();
        let mut s17 = entity("s17", EntityKind::Section, "Section 17");
        s17.attributes.jurisdiction = Some("IN".into());
        s17.valid_from = Some(year(1908));
        s17.trust.trust_score = 0.8;
        state.insert_version(s17).unwrap();

        let mut alpha = entity("alpha", EntityKind::Case, "Alpha v. Union");
        alpha.attributes.jurisdiction = Some("UK".into());
        alpha.valid_from = Some(year(1990));
        alpha.trust.trust_score = 0.4;
        state.insert_version(alpha).unwrap();
        state
            .append_status_change(StatusChange {
                sequence: 0,
                entity_id: "alpha".into(),
                previous_status: PrecedentStatus::Active,
                new_status: PrecedentStatus::Overruled,
                change_date: year(2005),
                reason: "overruled".into(),
                triggering_entity_id: Some("beta".into()),
                kind: StatusChangeKind::Transition,
            })
            .unwrap();
        state
    }

    #[test]
    fn each_filter_excludes() {
        let state = state();
        let by_jurisdiction = RetrievalFilters {
            jurisdiction: Some("in".into()),
            ..Default::default()
        };
        assert!(admits(&state, &by_jurisdiction, "s17"));
        assert!(!admits(&state, &by_jurisdiction, "alpha"));

        let by_kind = RetrievalFilters {
            kinds: vec![EntityKind::Case],
            ..Default::default()
        };
        assert!(!admits(&state, &by_kind, "s17"));
        assert!(admits(&state, &by_kind, "alpha"));

        let by_trust = RetrievalFilters {
            min_trust: Some(0.5),
            ..Default::default()
        };
        assert!(admits(&state, &by_trust, "s17"));
        assert!(!admits(&state, &by_trust, "alpha"));

        let as_of = RetrievalFilters {
            as_of: Some(year(1950)),
            ..Default::default()
        };
        assert!(admits(&state, &as_of, "s17"));
        assert!(!admits(&state, &as_of, "alpha"));

        let active_only = RetrievalFilters {
            exclude_inactive: true,
            ..Default::default()
        };
        assert!(admits(&state, &active_only, "s17"));
        assert!(!admits(&state, &active_only, "alpha"));
    }

    #[test]
    fn unknown_entities_never_pass() {
        assert!(!admits(&GraphState::new(), &RetrievalFilters::default(), "ghost"));
    }
}
