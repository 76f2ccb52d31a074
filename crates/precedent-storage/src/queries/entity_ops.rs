//! Entity version rows.

use rusqlite::{params, Connection};

use precedent_core::errors::PrecedentResult;
use precedent_core::models::{EntityKind, LegalEntity};

use crate::{enum_from_str, enum_to_str, fmt_time, parse_opt_time, to_storage_err};

/// Plain insert: the partial unique index on current versions must reject a
/// second current row rather than replace the first.
pub fn insert_entity(conn: &Connection, entity: &LegalEntity) -> PrecedentResult<()> {
    conn.execute(
        "INSERT INTO entities
            (id, version, kind, valid_from, valid_to, is_current_version,
             attributes, summary, content_hash, provenance, trust)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            entity.id,
            entity.version,
            enum_to_str(&entity.kind)?,
            entity.valid_from.as_ref().map(fmt_time),
            entity.valid_to.as_ref().map(fmt_time),
            entity.is_current_version,
            serde_json::to_string(&entity.attributes)?,
            entity.summary,
            entity.content_hash,
            serde_json::to_string(&entity.provenance)?,
            serde_json::to_string(&entity.trust)?,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// All entity versions, ordered by id then version.
pub fn load_entities(conn: &Connection) -> PrecedentResult<Vec<LegalEntity>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, version, kind, valid_from, valid_to, is_current_version,
                    attributes, summary, content_hash, provenance, trust
             FROM entities ORDER BY id, version",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, bool>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, String>(7)?,
                row.get::<_, String>(8)?,
                row.get::<_, String>(9)?,
                row.get::<_, String>(10)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut entities = Vec::new();
    for row in rows {
        let (id, version, kind, from, to, current, attributes, summary, hash, provenance, trust) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        entities.push(LegalEntity {
            id,
            kind: enum_from_str::<EntityKind>("entities", &kind)?,
            version,
            valid_from: parse_opt_time("entities", from)?,
            valid_to: parse_opt_time("entities", to)?,
            is_current_version: current,
            attributes: serde_json::from_str(&attributes)?,
            summary,
            content_hash: hash,
            provenance: serde_json::from_str(&provenance)?,
            trust: serde_json::from_str(&trust)?,
        });
    }
    Ok(entities)
}

pub fn count_entities(conn: &Connection) -> PrecedentResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(DISTINCT id) FROM entities", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count.max(0) as usize)
}
