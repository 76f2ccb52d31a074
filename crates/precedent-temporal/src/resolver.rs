//! Point-in-time version resolution.

use chrono::{DateTime, Utc};

use precedent_core::errors::{PrecedentError, PrecedentResult, TemporalError};
use precedent_core::models::LegalEntity;
use precedent_graph::GraphState;

/// The single version of `entity_id` in force at `at`.
///
/// No covering version is a gap (`NoVersionFound`); several covering
/// versions is an overlap (`AmbiguousVersion`). Neither is papered over.
pub fn resolve_version<'a>(
    versions: &'a [LegalEntity],
    entity_id: &str,
    at: DateTime<Utc>,
) -> PrecedentResult<&'a LegalEntity> {
    let mut covering = versions.iter().filter(|v| v.covers(at));
    let first = covering.next().ok_or_else(|| TemporalError::NoVersionFound {
        entity_id: entity_id.to_string(),
        at,
    })?;
    let rest: Vec<&LegalEntity> = covering.collect();
    if rest.is_empty() {
        return Ok(first);
    }
    let mut clashing: Vec<u32> = std::iter::once(first)
        .chain(rest)
        .map(|v| v.version)
        .collect();
    clashing.sort_unstable();
    Err(TemporalError::AmbiguousVersion {
        entity_id: entity_id.to_string(),
        at,
        versions: clashing,
    }
    .into())
}

/// Resolve against a graph snapshot; unknown ids are `EntityNotFound`.
pub fn resolve_in_state(
    state: &GraphState,
    entity_id: &str,
    at: DateTime<Utc>,
) -> PrecedentResult<LegalEntity> {
    let versions = state.versions(entity_id);
    if versions.is_empty() {
        return Err(PrecedentError::EntityNotFound {
            id: entity_id.to_string(),
        });
    }
    resolve_version(versions, entity_id, at).cloned()
}
