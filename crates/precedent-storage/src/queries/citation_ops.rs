//! Citation edges and cross-jurisdiction relations.

use rusqlite::{params, Connection};

use precedent_core::errors::PrecedentResult;
use precedent_core::models::{CitationEdge, CrossJurisdictionRelation};

use crate::{enum_from_str, enum_to_str, fmt_time, parse_time, to_storage_err};

pub fn insert_citation(conn: &Connection, edge: &CitationEdge) -> PrecedentResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO citations
            (id, citing_id, cited_id, chunk_id, raw_reference, reference_key, citation_type,
             treatment, confidence, weight, locator, context, state, extracted_by, extracted_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            edge.id,
            edge.citing_id,
            edge.cited_id,
            edge.chunk_id,
            edge.raw_reference,
            edge.reference_key,
            enum_to_str(&edge.citation_type)?,
            enum_to_str(&edge.treatment)?,
            edge.confidence,
            edge.weight,
            edge.locator,
            edge.context,
            enum_to_str(&edge.state)?,
            edge.extracted_by,
            fmt_time(&edge.extracted_at),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn load_citations(conn: &Connection) -> PrecedentResult<Vec<CitationEdge>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, citing_id, cited_id, chunk_id, raw_reference, reference_key, citation_type,
                    treatment, confidence, weight, locator, context, state, extracted_by, extracted_at
             FROM citations ORDER BY citing_id, id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                (
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                ),
                (
                    row.get::<_, String>(7)?,
                    row.get::<_, f64>(8)?,
                    row.get::<_, f64>(9)?,
                    row.get::<_, Option<String>>(10)?,
                    row.get::<_, Option<String>>(11)?,
                    row.get::<_, String>(12)?,
                    row.get::<_, String>(13)?,
                    row.get::<_, String>(14)?,
                ),
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut edges = Vec::new();
    for row in rows {
        let (
            (id, citing_id, cited_id, chunk_id, raw_reference, reference_key, citation_type),
            (treatment, confidence, weight, locator, context, state, extracted_by, extracted_at),
        ) = row.map_err(|e| to_storage_err(e.to_string()))?;
        edges.push(CitationEdge {
            id,
            citing_id,
            cited_id,
            chunk_id,
            raw_reference,
            reference_key,
            citation_type: enum_from_str("citations", &citation_type)?,
            treatment: enum_from_str("citations", &treatment)?,
            confidence,
            weight,
            locator,
            context,
            state: enum_from_str("citations", &state)?,
            extracted_by,
            extracted_at: parse_time("citations", &extracted_at)?,
        });
    }
    Ok(edges)
}

pub fn insert_relation(conn: &Connection, relation: &CrossJurisdictionRelation) -> PrecedentResult<()> {
    let resolution = relation.resolution.as_ref().map(enum_to_str).transpose()?;
    conn.execute(
        "INSERT OR REPLACE INTO jurisdiction_relations
            (id, source_id, target_id, kind, similarity, resolution, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            relation.id,
            relation.source_id,
            relation.target_id,
            enum_to_str(&relation.kind)?,
            relation.similarity,
            resolution,
            fmt_time(&relation.created_at),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn load_relations(conn: &Connection) -> PrecedentResult<Vec<CrossJurisdictionRelation>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, source_id, target_id, kind, similarity, resolution, created_at
             FROM jurisdiction_relations ORDER BY id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, String>(6)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut relations = Vec::new();
    for row in rows {
        let (id, source_id, target_id, kind, similarity, resolution, created_at) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        relations.push(CrossJurisdictionRelation {
            id,
            source_id,
            target_id,
            kind: enum_from_str("jurisdiction_relations", &kind)?,
            similarity,
            resolution: resolution
                .map(|r| enum_from_str("jurisdiction_relations", &r))
                .transpose()?,
            created_at: parse_time("jurisdiction_relations", &created_at)?,
        });
    }
    Ok(relations)
}
