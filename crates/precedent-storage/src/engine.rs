//! StorageEngine: owns the write connection (migrated when opened) and
//! persists or restores whole graph snapshots.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::info;

use precedent_core::errors::PrecedentResult;
use precedent_core::models::LegalEntity;
use precedent_graph::GraphState;

use crate::pool::WriteConnection;
use crate::queries::{chunk_ops, citation_ops, entity_ops, review_ops, status_ops};
use crate::to_storage_err;

/// Row counts written or read by one save/load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistStats {
    pub entity_versions: usize,
    pub chunks: usize,
    pub citations: usize,
    pub status_changes: usize,
    pub relations: usize,
    pub review_items: usize,
}

/// The persistence engine.
pub struct StorageEngine {
    writer: WriteConnection,
    db_path: Option<PathBuf>,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path) -> PrecedentResult<Self> {
        Ok(Self {
            writer: WriteConnection::open(path)?,
            db_path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory storage engine (for testing).
    pub fn open_in_memory() -> PrecedentResult<Self> {
        Ok(Self {
            writer: WriteConnection::open_in_memory()?,
            db_path: None,
        })
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub fn writer(&self) -> &WriteConnection {
        &self.writer
    }

    /// Persist a full snapshot.
    pub async fn save(&self, state: &GraphState) -> PrecedentResult<PersistStats> {
        self.writer.with_conn(|conn| save_state(conn, state)).await
    }

    /// Restore the full graph.
    pub async fn load(&self) -> PrecedentResult<GraphState> {
        self.writer.with_conn(load_state).await
    }

    /// Blocking variant of [`StorageEngine::save`]. Panics if called from
    /// inside a Tokio runtime; async callers use [`StorageEngine::save`].
    pub fn save_sync(&self, state: &GraphState) -> PrecedentResult<PersistStats> {
        self.writer.with_conn_sync(|conn| save_state(conn, state))
    }

    /// Blocking variant of [`StorageEngine::load`]. Not for async callers.
    pub fn load_sync(&self) -> PrecedentResult<GraphState> {
        self.writer.with_conn_sync(load_state)
    }
}

/// Rewrite every mutable table from the snapshot in one transaction.
/// The status log is append-only and is only ever extended.
fn save_state(conn: &Connection, state: &GraphState) -> PrecedentResult<PersistStats> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(e.to_string()))?;
    tx.execute_batch(
        "
        DELETE FROM entities;
        DELETE FROM chunks;
        DELETE FROM citations;
        DELETE FROM jurisdiction_relations;
        DELETE FROM review_queue;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let mut stats = PersistStats::default();
    for entity in state.all_versions() {
        entity_ops::insert_entity(&tx, entity)?;
        stats.entity_versions += 1;
    }
    for chunk in state.all_chunks() {
        chunk_ops::insert_chunk(&tx, chunk)?;
        stats.chunks += 1;
    }
    for edge in state.all_citations() {
        citation_ops::insert_citation(&tx, edge)?;
        stats.citations += 1;
    }
    for id in state.entity_ids() {
        for change in state.status_history(id) {
            status_ops::insert_status_change(&tx, change)?;
            stats.status_changes += 1;
        }
    }
    for relation in state.relations() {
        citation_ops::insert_relation(&tx, relation)?;
        stats.relations += 1;
    }
    for item in state.review_items() {
        review_ops::insert_review(&tx, item)?;
        stats.review_items += 1;
    }
    tx.commit().map_err(|e| to_storage_err(e.to_string()))?;
    info!(
        entity_versions = stats.entity_versions,
        chunks = stats.chunks,
        citations = stats.citations,
        "graph snapshot saved"
    );
    Ok(stats)
}

/// Rebuild a graph by replaying rows through the state's own validating writes.
fn load_state(conn: &Connection) -> PrecedentResult<GraphState> {
    let mut state = GraphState::new();

    let mut by_entity: BTreeMap<String, Vec<LegalEntity>> = BTreeMap::new();
    for entity in entity_ops::load_entities(conn)? {
        by_entity.entry(entity.id.clone()).or_default().push(entity);
    }
    for (id, versions) in by_entity {
        state.commit_versions(&id, versions)?;
    }

    let mut chunks_by_entity: BTreeMap<String, Vec<_>> = BTreeMap::new();
    for chunk in chunk_ops::load_chunks(conn)? {
        chunks_by_entity
            .entry(chunk.entity_id.clone())
            .or_default()
            .push(chunk);
    }
    for (id, chunks) in chunks_by_entity {
        state.replace_chunks(&id, chunks)?;
    }

    for edge in citation_ops::load_citations(conn)? {
        state.add_citation(edge)?;
    }
    for change in status_ops::load_status_changes(conn)? {
        state.append_status_change(change)?;
    }
    for relation in citation_ops::load_relations(conn)? {
        state.add_relation(relation)?;
    }
    for item in review_ops::load_reviews(conn)? {
        state.enqueue_review(item);
    }

    info!(entities = state.entity_count(), "graph snapshot loaded");
    Ok(state)
}
