use std::collections::HashSet;

use precedent_core::errors::{GraphError, PrecedentError, PrecedentResult};
use precedent_core::models::{Chunk, LegalEntity, TrustBlock};

use super::GraphState;
use crate::alias::normalize_reference;

/// Structural checks on a full version chain of one logical entity.
pub fn validate_chain(entity_id: &str, versions: &[LegalEntity]) -> PrecedentResult<()> {
    let mut seen = HashSet::new();
    let mut current = 0usize;
    for v in versions {
        if v.id != entity_id {
            return Err(PrecedentError::InvalidEntity {
                id: v.id.clone(),
                reason: format!("version chain belongs to {entity_id}"),
            });
        }
        if !seen.insert(v.version) {
            return Err(GraphError::DuplicateVersion {
                entity_id: entity_id.to_string(),
                version: v.version,
            }
            .into());
        }
        if !v.has_valid_interval() {
            return Err(GraphError::InvalidValidity {
                entity_id: entity_id.to_string(),
                version: v.version,
            }
            .into());
        }
        if v.is_current_version {
            current += 1;
        }
    }
    if current > 1 {
        return Err(GraphError::MultipleCurrentVersions {
            entity_id: entity_id.to_string(),
        }
        .into());
    }
    Ok(())
}

impl GraphState {
    // --- Reads ---

    pub fn versions(&self, entity_id: &str) -> &[LegalEntity] {
        self.entities.get(entity_id).map_or(&[], Vec::as_slice)
    }

    /// The version flagged current, falling back to the highest version.
    pub fn current(&self, entity_id: &str) -> Option<&LegalEntity> {
        let versions = self.entities.get(entity_id)?;
        versions
            .iter()
            .find(|v| v.is_current_version)
            .or_else(|| versions.last())
    }

    pub fn contains_entity(&self, entity_id: &str) -> bool {
        self.entities.contains_key(entity_id)
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = &String> {
        self.entities.keys()
    }

    /// Current version of every logical entity.
    pub fn current_entities(&self) -> impl Iterator<Item = &LegalEntity> {
        self.entities.keys().filter_map(|id| self.current(id))
    }

    /// Every stored version of every entity.
    pub fn all_versions(&self) -> impl Iterator<Item = &LegalEntity> {
        self.entities.values().flatten()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Entity whose alias index entry matches the normalized reference.
    /// Ambiguous references (several entities) do not resolve.
    pub fn resolve_alias(&self, reference: &str) -> Option<&str> {
        let key = normalize_reference(reference);
        let ids = self.alias_index.get(&key)?;
        if ids.len() == 1 {
            ids.iter().next().map(String::as_str)
        } else {
            None
        }
    }

    /// All entities declaring the alias.
    pub fn alias_candidates(&self, reference: &str) -> Vec<&str> {
        self.alias_index
            .get(&normalize_reference(reference))
            .map(|ids| ids.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn chunks(&self, entity_id: &str) -> &[Chunk] {
        self.chunks.get(entity_id).map_or(&[], Vec::as_slice)
    }

    pub fn chunk(&self, chunk_id: &str) -> Option<&Chunk> {
        let (entity_id, _) = chunk_id.rsplit_once(':')?;
        self.chunks(entity_id).iter().find(|c| c.id == chunk_id)
    }

    pub fn all_chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values().flatten()
    }

    // --- Writes ---

    /// Replace the whole version chain of an entity after validating it.
    pub fn commit_versions(
        &mut self,
        entity_id: &str,
        mut versions: Vec<LegalEntity>,
    ) -> PrecedentResult<()> {
        validate_chain(entity_id, &versions)?;
        versions.sort_by_key(|v| v.version);
        if let Some(kind) = versions.last().map(|v| v.kind) {
            self.graph.ensure_node(entity_id, kind);
        }
        self.entities.insert(entity_id.to_string(), versions);
        self.reindex_aliases(entity_id);
        self.touch();
        Ok(())
    }

    /// Add one version; rejects a duplicate version number or a second current version.
    pub fn insert_version(&mut self, entity: LegalEntity) -> PrecedentResult<()> {
        let id = entity.id.clone();
        let mut chain = self.versions(&id).to_vec();
        chain.push(entity);
        self.commit_versions(&id, chain)
    }

    /// Replace an existing version in place (same id and version number).
    pub fn update_version(&mut self, entity: LegalEntity) -> PrecedentResult<()> {
        let id = entity.id.clone();
        let mut chain = self.versions(&id).to_vec();
        let Some(slot) = chain.iter_mut().find(|v| v.version == entity.version) else {
            return Err(PrecedentError::EntityNotFound {
                id: format!("{id}@v{}", entity.version),
            });
        };
        *slot = entity;
        self.commit_versions(&id, chain)
    }

    /// Replace all chunks of an entity. Chunks are owned by their entity.
    pub fn replace_chunks(&mut self, entity_id: &str, mut chunks: Vec<Chunk>) -> PrecedentResult<()> {
        if !self.contains_entity(entity_id) {
            return Err(PrecedentError::EntityNotFound {
                id: entity_id.to_string(),
            });
        }
        if let Some(stray) = chunks.iter().find(|c| c.entity_id != entity_id) {
            return Err(PrecedentError::InvalidEntity {
                id: stray.id.clone(),
                reason: format!("chunk does not belong to {entity_id}"),
            });
        }
        chunks.sort_by_key(|c| c.chunk_index);
        self.chunks.insert(entity_id.to_string(), chunks);
        self.touch();
        Ok(())
    }

    pub fn set_chunk_embedding(
        &mut self,
        chunk_id: &str,
        model: &str,
        embedding: Vec<f32>,
    ) -> PrecedentResult<()> {
        let chunk = self.chunk_mut(chunk_id)?;
        chunk.embedding = Some(embedding);
        chunk.embedding_model = Some(model.to_string());
        self.touch();
        Ok(())
    }

    /// Write trust recompute results in one pass. Unknown ids are skipped.
    pub fn apply_trust(
        &mut self,
        entity_updates: Vec<(String, TrustBlock)>,
        chunk_updates: Vec<(String, TrustBlock)>,
    ) -> usize {
        let mut applied = 0;
        for (entity_id, trust) in entity_updates {
            if let Some(versions) = self.entities.get_mut(&entity_id) {
                for v in versions.iter_mut() {
                    v.trust = trust.clone();
                }
                applied += 1;
            }
        }
        for (chunk_id, trust) in chunk_updates {
            if let Ok(chunk) = self.chunk_mut(&chunk_id) {
                chunk.trust = trust;
                applied += 1;
            }
        }
        self.touch();
        applied
    }

    fn chunk_mut(&mut self, chunk_id: &str) -> PrecedentResult<&mut Chunk> {
        let not_found = || PrecedentError::EntityNotFound {
            id: chunk_id.to_string(),
        };
        let (entity_id, _) = chunk_id.rsplit_once(':').ok_or_else(not_found)?;
        self.chunks
            .get_mut(entity_id)
            .and_then(|chunks| chunks.iter_mut().find(|c| c.id == chunk_id))
            .ok_or_else(not_found)
    }

    fn reindex_aliases(&mut self, entity_id: &str) {
        if let Some(old) = self.aliases_by_entity.remove(entity_id) {
            for key in old {
                if let Some(ids) = self.alias_index.get_mut(&key) {
                    ids.remove(entity_id);
                    if ids.is_empty() {
                        self.alias_index.remove(&key);
                    }
                }
            }
        }

        let mut keys: Vec<String> = vec![normalize_reference(entity_id)];
        for v in self.versions(entity_id) {
            keys.push(normalize_reference(&v.attributes.title));
            keys.extend(v.attributes.aliases.iter().map(|a| normalize_reference(a)));
        }
        keys.retain(|k| !k.is_empty());
        keys.sort();
        keys.dedup();

        for key in &keys {
            self.alias_index
                .entry(key.clone())
                .or_default()
                .insert(entity_id.to_string());
        }
        self.aliases_by_entity.insert(entity_id.to_string(), keys);
    }
}
