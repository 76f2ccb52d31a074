//! Materialized "top-cited" view, refreshed by maintenance and read
//! without recomputation.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use precedent_core::models::EntityKind;
use precedent_graph::GraphState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitedEntry {
    pub entity_id: String,
    pub kind: EntityKind,
    pub title: String,
    pub citation_count: u32,
}

#[derive(Debug, Default)]
struct ViewState {
    generation: Option<u64>,
    by_kind: HashMap<EntityKind, Vec<CitedEntry>>,
}

/// Most-cited entities per kind, by accepted incoming citations.
#[derive(Debug, Default)]
pub struct TopCitedView {
    inner: RwLock<ViewState>,
}

impl TopCitedView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a snapshot. A no-op when the snapshot generation has
    /// not moved since the last refresh. Returns whether it rebuilt.
    pub fn refresh(&self, state: &GraphState, limit: usize) -> bool {
        if self.generation() == Some(state.generation()) {
            return false;
        }

        let mut by_kind: HashMap<EntityKind, Vec<CitedEntry>> = HashMap::new();
        for entity in state.current_entities() {
            let citation_count = state.active_citation_count(&entity.id);
            if citation_count == 0 {
                continue;
            }
            by_kind.entry(entity.kind).or_default().push(CitedEntry {
                entity_id: entity.id.clone(),
                kind: entity.kind,
                title: entity.attributes.title.clone(),
                citation_count,
            });
        }
        for entries in by_kind.values_mut() {
            entries.sort_by(|a, b| {
                b.citation_count
                    .cmp(&a.citation_count)
                    .then_with(|| a.entity_id.cmp(&b.entity_id))
            });
            entries.truncate(limit);
        }

        match self.inner.write() {
            Ok(mut guard) => {
                guard.generation = Some(state.generation());
                guard.by_kind = by_kind;
            }
            Err(poisoned) => {
                let mut guard = poisoned.into_inner();
                guard.generation = Some(state.generation());
                guard.by_kind = by_kind;
            }
        }
        true
    }

    pub fn top(&self, kind: EntityKind) -> Vec<CitedEntry> {
        match self.inner.read() {
            Ok(guard) => guard.by_kind.get(&kind).cloned().unwrap_or_default(),
            Err(poisoned) => poisoned
                .into_inner()
                .by_kind
                .get(&kind)
                .cloned()
                .unwrap_or_default(),
        }
    }

    pub fn generation(&self) -> Option<u64> {
        match self.inner.read() {
            Ok(guard) => guard.generation,
            Err(poisoned) => poisoned.into_inner().generation,
        }
    }
}
