//! Data-quality checks over a snapshot. Violations are reported as review
//! items and never corrected automatically.

use std::collections::{BTreeMap, HashSet};

use precedent_core::models::{
    JurisdictionRelationKind, PrecedentStatus, ReviewItem, ReviewKind, Treatment,
};

use crate::state::GraphState;

/// Every citing/cited pair holding both a `follows` and a `distinguishes` edge.
///
/// The store refuses to create such pairs, so this only fires on state
/// loaded from elsewhere or written around the store.
pub fn treatment_conflicts(state: &GraphState) -> Vec<ReviewItem> {
    let mut by_pair: BTreeMap<(&str, &str), HashSet<Treatment>> = BTreeMap::new();
    for edge in state.all_citations() {
        if let Some(cited) = edge.cited_id.as_deref() {
            by_pair
                .entry((edge.citing_id.as_str(), cited))
                .or_default()
                .insert(edge.treatment);
        }
    }
    by_pair
        .into_iter()
        .filter(|(_, treatments)| {
            treatments.contains(&Treatment::Follows) && treatments.contains(&Treatment::Distinguishes)
        })
        .map(|((citing, cited), _)| {
            ReviewItem::new(
                ReviewKind::TreatmentConflict,
                cited,
                Some(citing.to_string()),
                format!("{citing} both follows and distinguishes {cited}"),
            )
        })
        .collect()
}

/// Unresolved conflicts between two authorities that are both still Active.
pub fn conflicting_active_precedents(state: &GraphState) -> Vec<ReviewItem> {
    state
        .relations()
        .filter(|r| r.kind == JurisdictionRelationKind::ConflictsWith && r.is_unresolved_conflict())
        .filter(|r| {
            state.current_status(&r.source_id) == PrecedentStatus::Active
                && state.current_status(&r.target_id) == PrecedentStatus::Active
        })
        .map(|r| {
            ReviewItem::new(
                ReviewKind::ConflictingActivePrecedents,
                r.source_id.clone(),
                Some(r.target_id.clone()),
                format!(
                    "{} conflicts with {} and both are active",
                    r.source_id, r.target_id
                ),
            )
        })
        .collect()
}

/// All consistency findings for a snapshot.
pub fn check(state: &GraphState) -> Vec<ReviewItem> {
    let mut findings = treatment_conflicts(state);
    findings.extend(conflicting_active_precedents(state));
    findings
}
