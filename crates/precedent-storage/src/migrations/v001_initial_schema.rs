//! v001: entities, chunks, citations, status log, jurisdiction relations,
//! review queue, schema_version.

use rusqlite::Connection;

use precedent_core::errors::PrecedentResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> PrecedentResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version     INTEGER PRIMARY KEY,
            applied_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE TABLE IF NOT EXISTS entities (
            id                  TEXT NOT NULL,
            version             INTEGER NOT NULL,
            kind                TEXT NOT NULL,
            valid_from          TEXT,
            valid_to            TEXT,
            is_current_version  INTEGER NOT NULL DEFAULT 0,
            attributes          TEXT NOT NULL DEFAULT '{}',
            summary             TEXT NOT NULL DEFAULT '',
            content_hash        TEXT NOT NULL DEFAULT '',
            provenance          TEXT NOT NULL,
            trust               TEXT NOT NULL,
            PRIMARY KEY (id, version),
            CHECK (valid_from IS NULL OR valid_to IS NULL OR valid_from <= valid_to)
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_entities_single_current
            ON entities(id) WHERE is_current_version = 1;
        CREATE INDEX IF NOT EXISTS idx_entities_kind ON entities(kind);

        CREATE TABLE IF NOT EXISTS chunks (
            entity_id         TEXT NOT NULL,
            chunk_index       INTEGER NOT NULL,
            chunk_type        TEXT NOT NULL,
            type_confidence   REAL NOT NULL,
            needs_review      INTEGER NOT NULL DEFAULT 0,
            paragraph_number  INTEGER,
            section_marker    TEXT,
            text              TEXT NOT NULL,
            start_offset      INTEGER NOT NULL,
            end_offset        INTEGER NOT NULL,
            page              INTEGER NOT NULL DEFAULT 1,
            token_count       INTEGER NOT NULL,
            embedding         BLOB,
            embedding_model   TEXT,
            provenance        TEXT NOT NULL,
            trust             TEXT NOT NULL,
            content_hash      TEXT NOT NULL,
            PRIMARY KEY (entity_id, chunk_index)
        );

        CREATE TABLE IF NOT EXISTS citations (
            id              TEXT PRIMARY KEY,
            citing_id       TEXT NOT NULL,
            cited_id        TEXT,
            chunk_id        TEXT,
            raw_reference   TEXT NOT NULL,
            reference_key   TEXT NOT NULL,
            citation_type   TEXT NOT NULL,
            treatment       TEXT NOT NULL,
            confidence      REAL NOT NULL CHECK (confidence BETWEEN 0.0 AND 1.0),
            weight          REAL NOT NULL CHECK (weight BETWEEN -1.0 AND 1.0),
            locator         TEXT,
            context         TEXT,
            state           TEXT NOT NULL,
            extracted_by    TEXT NOT NULL,
            extracted_at    TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_citations_citing ON citations(citing_id);
        CREATE INDEX IF NOT EXISTS idx_citations_cited ON citations(cited_id);

        CREATE TABLE IF NOT EXISTS status_changes (
            entity_id             TEXT NOT NULL,
            sequence              INTEGER NOT NULL,
            previous_status       TEXT NOT NULL,
            new_status            TEXT NOT NULL,
            change_date           TEXT NOT NULL,
            reason                TEXT NOT NULL,
            triggering_entity_id  TEXT,
            kind                  TEXT NOT NULL,
            PRIMARY KEY (entity_id, sequence)
        );

        CREATE TABLE IF NOT EXISTS jurisdiction_relations (
            id          TEXT PRIMARY KEY,
            source_id   TEXT NOT NULL,
            target_id   TEXT NOT NULL,
            kind        TEXT NOT NULL,
            similarity  REAL NOT NULL,
            resolution  TEXT,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS review_queue (
            id          TEXT PRIMARY KEY,
            kind        TEXT NOT NULL,
            entity_id   TEXT NOT NULL,
            related_id  TEXT,
            edge_id     TEXT,
            detail      TEXT NOT NULL,
            confidence  REAL,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_review_entity ON review_queue(entity_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
