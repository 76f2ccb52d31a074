//! Review queue rows.

use rusqlite::{params, Connection};

use precedent_core::errors::PrecedentResult;
use precedent_core::models::ReviewItem;

use crate::{enum_from_str, enum_to_str, fmt_time, parse_time, to_storage_err};

pub fn insert_review(conn: &Connection, item: &ReviewItem) -> PrecedentResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO review_queue
            (id, kind, entity_id, related_id, edge_id, detail, confidence, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            item.id,
            enum_to_str(&item.kind)?,
            item.entity_id,
            item.related_id,
            item.edge_id,
            item.detail,
            item.confidence,
            fmt_time(&item.created_at),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn load_reviews(conn: &Connection) -> PrecedentResult<Vec<ReviewItem>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, kind, entity_id, related_id, edge_id, detail, confidence, created_at
             FROM review_queue ORDER BY created_at, id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, Option<f64>>(6)?,
                row.get::<_, String>(7)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut items = Vec::new();
    for row in rows {
        let (id, kind, entity_id, related_id, edge_id, detail, confidence, created_at) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        items.push(ReviewItem {
            id,
            kind: enum_from_str("review_queue", &kind)?,
            entity_id,
            related_id,
            edge_id,
            detail,
            confidence,
            created_at: parse_time("review_queue", &created_at)?,
        });
    }
    Ok(items)
}

pub fn count_reviews(conn: &Connection) -> PrecedentResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM review_queue", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count.max(0) as usize)
}
