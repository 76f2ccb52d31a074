//! Append-only status log rows.

use rusqlite::{params, Connection};

use precedent_core::errors::PrecedentResult;
use precedent_core::models::StatusChange;

use crate::{enum_from_str, enum_to_str, fmt_time, parse_time, to_storage_err};

/// Insert a status change. Existing (entity_id, sequence) rows are never
/// overwritten: the log is immutable once written.
pub fn insert_status_change(conn: &Connection, change: &StatusChange) -> PrecedentResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO status_changes
            (entity_id, sequence, previous_status, new_status, change_date, reason,
             triggering_entity_id, kind)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            change.entity_id,
            change.sequence as i64,
            enum_to_str(&change.previous_status)?,
            enum_to_str(&change.new_status)?,
            fmt_time(&change.change_date),
            change.reason,
            change.triggering_entity_id,
            enum_to_str(&change.kind)?,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// The whole log, ordered by entity then sequence.
pub fn load_status_changes(conn: &Connection) -> PrecedentResult<Vec<StatusChange>> {
    let mut stmt = conn
        .prepare(
            "SELECT entity_id, sequence, previous_status, new_status, change_date, reason,
                    triggering_entity_id, kind
             FROM status_changes ORDER BY entity_id, sequence",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, Option<String>>(6)?,
                row.get::<_, String>(7)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut changes = Vec::new();
    for row in rows {
        let (entity_id, sequence, previous, new, date, reason, trigger, kind) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        changes.push(StatusChange {
            sequence: sequence.max(0) as u64,
            entity_id,
            previous_status: enum_from_str("status_changes", &previous)?,
            new_status: enum_from_str("status_changes", &new)?,
            change_date: parse_time("status_changes", &date)?,
            reason,
            triggering_entity_id: trigger,
            kind: enum_from_str("status_changes", &kind)?,
        });
    }
    Ok(changes)
}
