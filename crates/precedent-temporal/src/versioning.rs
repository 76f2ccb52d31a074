//! Registering new versions of a logical entity.

use std::sync::Arc;

use tracing::info;

use precedent_core::errors::{GraphError, PrecedentError, PrecedentResult, TemporalError};
use precedent_core::models::LegalEntity;
use precedent_graph::{GraphState, IGraphStore};

/// Appends versions to an entity's chain, closing the one it replaces.
pub struct VersionManager {
    store: Arc<dyn IGraphStore>,
}

impl VersionManager {
    pub fn new(store: Arc<dyn IGraphStore>) -> Self {
        Self { store }
    }

    /// Register `entity` as the new current version of its logical id.
    ///
    /// The version number is assigned (previous highest + 1). The previous
    /// current version gets `valid_to = entity.valid_from` (or keeps an
    /// earlier end it already had) and loses its current flag. A first
    /// version is stored as-is with version 1.
    pub fn register_version(&self, entity: LegalEntity) -> PrecedentResult<LegalEntity> {
        let mut slot = Some(entity);
        let mut registered = None;
        self.store.write(&mut |state| {
            if let Some(entity) = slot.take() {
                registered = Some(register_in(state, entity)?);
            }
            Ok(())
        })?;

        let registered = registered
            .ok_or_else(|| PrecedentError::ConcurrencyError("version registration lost".into()))?;
        info!(
            entity_id = %registered.id,
            version = registered.version,
            "registered entity version"
        );
        Ok(registered)
    }
}

/// [`VersionManager::register_version`] inside a caller's write.
pub fn register_in(state: &mut GraphState, entity: LegalEntity) -> PrecedentResult<LegalEntity> {
    if !entity.has_valid_interval() {
        return Err(GraphError::InvalidValidity {
            entity_id: entity.id.clone(),
            version: entity.version,
        }
        .into());
    }

    let mut chain = state.versions(&entity.id).to_vec();
    let next_version = chain.iter().map(|v| v.version).max().unwrap_or(0) + 1;

    let previous_index = chain
        .iter()
        .position(|v| v.is_current_version)
        .or_else(|| (0..chain.len()).max_by_key(|&i| chain[i].version));
    if let Some(previous) = previous_index.map(|i| &mut chain[i]) {
        let Some(start) = entity.valid_from else {
            return Err(PrecedentError::InvalidEntity {
                id: entity.id.clone(),
                reason: "a replacing version needs valid_from".to_string(),
            });
        };
        if previous.valid_from.is_some_and(|prev| start <= prev) {
            return Err(TemporalError::VersionOutOfOrder {
                entity_id: entity.id.clone(),
                valid_from: start,
            }
            .into());
        }
        previous.valid_to = Some(previous.valid_to.map_or(start, |end| end.min(start)));
        previous.is_current_version = false;
    }

    let mut new_version = entity;
    new_version.version = next_version;
    new_version.is_current_version = true;
    chain.push(new_version.clone());
    state.commit_versions(&new_version.id, chain)?;
    Ok(new_version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use precedent_graph::InMemoryGraphStore;
    use test_fixtures::{version, year};

    fn manager() -> (Arc<InMemoryGraphStore>, VersionManager) {
        let store = Arc::new(InMemoryGraphStore::new());
        (store.clone(), VersionManager::new(store))
    }

    #[test]
    fn second_version_closes_first() {
        let (store, versions) = manager();
        versions
            .register_version(version("s17", 1, 1908, None, true))
            .unwrap();
        let v2 = versions
            .register_version(version("s17", 1, 2001, None, true))
            .unwrap();
        assert_eq!(v2.version, 2);

        let chain = store.get_versions("s17");
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].valid_to, Some(year(2001)));
        assert!(!chain[0].is_current_version);
        assert!(chain[1].is_current_version);
    }

    #[test]
    fn rejects_out_of_order_start() {
        let (_, versions) = manager();
        versions
            .register_version(version("s17", 1, 2001, None, true))
            .unwrap();
        let err = versions
            .register_version(version("s17", 1, 1990, None, true))
            .unwrap_err();
        assert!(matches!(
            err,
            PrecedentError::TemporalError(TemporalError::VersionOutOfOrder { .. })
        ));
    }

    #[test]
    fn rejects_inverted_interval() {
        let (_, versions) = manager();
        let err = versions
            .register_version(version("s17", 1, 2001, Some(1990), true))
            .unwrap_err();
        assert!(matches!(
            err,
            PrecedentError::GraphError(GraphError::InvalidValidity { .. })
        ));
    }
}
