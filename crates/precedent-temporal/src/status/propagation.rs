//! Status propagation: turns accepted `overruled` citations into status
//! changes on the cited authority and records manual transitions.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use precedent_core::errors::{PrecedentError, PrecedentResult};
use precedent_core::models::{
    CitationEdge, PrecedentStatus, StatusChange, StatusChangeKind, Treatment,
};
use precedent_graph::{GraphState, IGraphStore};
use precedent_observability::events;

use super::transitions::check_transition;

/// Appends status changes through the graph store. The current status is
/// always derived from the log; this type never caches it.
pub struct StatusPropagationManager {
    store: Arc<dyn IGraphStore>,
}

struct Request<'a> {
    entity_id: &'a str,
    new_status: PrecedentStatus,
    kind: StatusChangeKind,
    reason: String,
    triggering_entity_id: Option<&'a str>,
    change_date: DateTime<Utc>,
}

impl StatusPropagationManager {
    pub fn new(store: Arc<dyn IGraphStore>) -> Self {
        Self { store }
    }

    /// Record an ordinary transition out of `Active`.
    pub fn record_change(
        &self,
        entity_id: &str,
        new_status: PrecedentStatus,
        reason: impl Into<String>,
        triggering_entity_id: Option<&str>,
        change_date: DateTime<Utc>,
    ) -> PrecedentResult<StatusChange> {
        self.append(Request {
            entity_id,
            new_status,
            kind: StatusChangeKind::Transition,
            reason: reason.into(),
            triggering_entity_id,
            change_date,
        })
    }

    /// Return an overruled or superseded entity to `Active` on the
    /// authority of `reinstating_entity_id`.
    pub fn reinstate(
        &self,
        entity_id: &str,
        reinstating_entity_id: &str,
        reason: impl Into<String>,
        change_date: DateTime<Utc>,
    ) -> PrecedentResult<StatusChange> {
        self.append(Request {
            entity_id,
            new_status: PrecedentStatus::Active,
            kind: StatusChangeKind::Reinstated,
            reason: reason.into(),
            triggering_entity_id: Some(reinstating_entity_id),
            change_date,
        })
    }

    /// Apply an accepted citation edge. Only active, resolved `overruled`
    /// edges change anything.
    ///
    /// Idempotent per triggering entity: if the citing entity already
    /// overruled the cited one, nothing is appended. An entity that is
    /// already out of `Active` is left alone.
    pub fn apply_treatment(&self, edge: &CitationEdge) -> PrecedentResult<Option<StatusChange>> {
        if !triggers_status(edge) {
            return Ok(None);
        }
        let mut appended = None;
        self.store.write(&mut |state| {
            appended = apply_treatment_in(state, edge)?;
            Ok(())
        })?;
        if let Some(change) = &appended {
            log_change(change);
        }
        Ok(appended)
    }

    /// Apply every active `overruled` edge in the graph. Used by maintenance
    /// to catch edges accepted outside ingestion.
    pub fn propagate(&self) -> PrecedentResult<Vec<StatusChange>> {
        let snapshot = self.store.snapshot();
        let mut edges: Vec<CitationEdge> = snapshot
            .all_citations()
            .filter(|e| e.is_active() && e.treatment == Treatment::Overruled)
            .cloned()
            .collect();
        edges.sort_by(|a, b| a.extracted_at.cmp(&b.extracted_at).then(a.id.cmp(&b.id)));

        let mut changes = Vec::new();
        for edge in &edges {
            if let Some(change) = self.apply_treatment(edge)? {
                changes.push(change);
            }
        }
        Ok(changes)
    }

    /// Status log of an entity, ordered by sequence.
    pub fn history(&self, entity_id: &str) -> PrecedentResult<Vec<StatusChange>> {
        let snapshot = self.store.snapshot();
        if !snapshot.contains_entity(entity_id) {
            return Err(PrecedentError::EntityNotFound {
                id: entity_id.to_string(),
            });
        }
        Ok(snapshot.status_history(entity_id).to_vec())
    }

    pub fn current_status(&self, entity_id: &str) -> PrecedentStatus {
        self.store.current_status(entity_id)
    }

    fn append(&self, request: Request<'_>) -> PrecedentResult<StatusChange> {
        let mut slot = Some(request);
        let mut appended = None;
        self.store.write(&mut |state| {
            if let Some(request) = slot.take() {
                appended = Some(append_in(state, request)?);
            }
            Ok(())
        })?;
        let change = appended
            .ok_or_else(|| PrecedentError::ConcurrencyError("status append lost".into()))?;
        log_change(&change);
        Ok(change)
    }
}

/// [`StatusPropagationManager::apply_treatment`] inside a caller's write,
/// so a status change commits together with the edge that caused it. The
/// caller logs the returned change with [`log_change`] once the write has
/// committed.
pub fn apply_treatment_in(
    state: &mut GraphState,
    edge: &CitationEdge,
) -> PrecedentResult<Option<StatusChange>> {
    let Some(cited_id) = edge.cited_id.as_deref().filter(|_| triggers_status(edge)) else {
        return Ok(None);
    };
    if already_triggered(state, cited_id, &edge.citing_id) {
        debug!(
            entity_id = %cited_id,
            triggering_entity_id = %edge.citing_id,
            "overruling already recorded"
        );
        return Ok(None);
    }
    let current = state.current_status(cited_id);
    if current != PrecedentStatus::Active {
        debug!(
            entity_id = %cited_id,
            status = %current,
            triggering_entity_id = %edge.citing_id,
            "overruling ignored; authority is not active"
        );
        return Ok(None);
    }
    let change_date = state
        .current(&edge.citing_id)
        .map_or(edge.extracted_at, |e| e.reference_date());
    append_in(
        state,
        Request {
            entity_id: cited_id,
            new_status: PrecedentStatus::Overruled,
            kind: StatusChangeKind::Transition,
            reason: format!("overruled by {}", edge.citing_id),
            triggering_entity_id: Some(edge.citing_id.as_str()),
            change_date,
        },
    )
    .map(Some)
}

fn triggers_status(edge: &CitationEdge) -> bool {
    edge.is_active() && edge.treatment == Treatment::Overruled && edge.cited_id.is_some()
}

fn already_triggered(state: &GraphState, entity_id: &str, triggering_entity_id: &str) -> bool {
    state.status_history(entity_id).iter().any(|c| {
        c.new_status == PrecedentStatus::Overruled
            && c.triggering_entity_id.as_deref() == Some(triggering_entity_id)
    })
}

fn append_in(state: &mut GraphState, request: Request<'_>) -> PrecedentResult<StatusChange> {
    if !state.contains_entity(request.entity_id) {
        return Err(PrecedentError::EntityNotFound {
            id: request.entity_id.to_string(),
        });
    }
    let current = state.current_status(request.entity_id);
    check_transition(
        request.entity_id,
        current,
        request.new_status,
        request.kind,
        request.triggering_entity_id,
    )?;
    state.append_status_change(StatusChange {
        sequence: 0,
        entity_id: request.entity_id.to_string(),
        previous_status: current,
        new_status: request.new_status,
        change_date: request.change_date,
        reason: request.reason,
        triggering_entity_id: request.triggering_entity_id.map(str::to_string),
        kind: request.kind,
    })
}

pub fn log_change(change: &StatusChange) {
    events::status_changed(
        &change.entity_id,
        change.previous_status.as_str(),
        change.new_status.as_str(),
        change.triggering_entity_id.as_deref(),
    );
}
