//! Chunk rows. Embeddings are stored as little-endian f32 blobs.

use rusqlite::{params, Connection};

use precedent_core::errors::{PrecedentResult, StorageError};
use precedent_core::models::{Chunk, ChunkType};

use crate::{enum_from_str, enum_to_str, to_storage_err};

pub fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn decode_embedding(bytes: &[u8]) -> PrecedentResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(StorageError::CorruptRow {
            table: "chunks".into(),
            details: format!("embedding blob of {} bytes is not f32-aligned", bytes.len()),
        }
        .into());
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

pub fn insert_chunk(conn: &Connection, chunk: &Chunk) -> PrecedentResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO chunks
            (entity_id, chunk_index, chunk_type, type_confidence, needs_review,
             paragraph_number, section_marker, text, start_offset, end_offset, page,
             token_count, embedding, embedding_model, provenance, trust, content_hash)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
        params![
            chunk.entity_id,
            chunk.chunk_index,
            enum_to_str(&chunk.chunk_type)?,
            chunk.type_confidence,
            chunk.needs_review,
            chunk.paragraph_number,
            chunk.section_marker,
            chunk.text,
            chunk.start_offset as i64,
            chunk.end_offset as i64,
            chunk.page,
            chunk.token_count as i64,
            chunk.embedding.as_deref().map(encode_embedding),
            chunk.embedding_model,
            serde_json::to_string(&chunk.provenance)?,
            serde_json::to_string(&chunk.trust)?,
            chunk.content_hash,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

struct ChunkRow {
    entity_id: String,
    chunk_index: u32,
    chunk_type: String,
    type_confidence: f64,
    needs_review: bool,
    paragraph_number: Option<u32>,
    section_marker: Option<String>,
    text: String,
    start_offset: i64,
    end_offset: i64,
    page: u32,
    token_count: i64,
    embedding: Option<Vec<u8>>,
    embedding_model: Option<String>,
    provenance: String,
    trust: String,
    content_hash: String,
}

/// All chunks, ordered by entity then chunk index.
pub fn load_chunks(conn: &Connection) -> PrecedentResult<Vec<Chunk>> {
    let mut stmt = conn
        .prepare(
            "SELECT entity_id, chunk_index, chunk_type, type_confidence, needs_review,
                    paragraph_number, section_marker, text, start_offset, end_offset, page,
                    token_count, embedding, embedding_model, provenance, trust, content_hash
             FROM chunks ORDER BY entity_id, chunk_index",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ChunkRow {
                entity_id: row.get(0)?,
                chunk_index: row.get(1)?,
                chunk_type: row.get(2)?,
                type_confidence: row.get(3)?,
                needs_review: row.get(4)?,
                paragraph_number: row.get(5)?,
                section_marker: row.get(6)?,
                text: row.get(7)?,
                start_offset: row.get(8)?,
                end_offset: row.get(9)?,
                page: row.get(10)?,
                token_count: row.get(11)?,
                embedding: row.get(12)?,
                embedding_model: row.get(13)?,
                provenance: row.get(14)?,
                trust: row.get(15)?,
                content_hash: row.get(16)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut chunks = Vec::new();
    for row in rows {
        let row = row.map_err(|e| to_storage_err(e.to_string()))?;
        chunks.push(Chunk {
            id: Chunk::make_id(&row.entity_id, row.chunk_index),
            chunk_type: enum_from_str::<ChunkType>("chunks", &row.chunk_type)?,
            entity_id: row.entity_id,
            chunk_index: row.chunk_index,
            type_confidence: row.type_confidence,
            needs_review: row.needs_review,
            paragraph_number: row.paragraph_number,
            section_marker: row.section_marker,
            text: row.text,
            start_offset: row.start_offset.max(0) as usize,
            end_offset: row.end_offset.max(0) as usize,
            page: row.page,
            token_count: row.token_count.max(0) as usize,
            embedding: row.embedding.as_deref().map(decode_embedding).transpose()?,
            embedding_model: row.embedding_model,
            provenance: serde_json::from_str(&row.provenance)?,
            trust: serde_json::from_str(&row.trust)?,
            content_hash: row.content_hash,
        });
    }
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_blob_round_trips() {
        let v = vec![0.25_f32, -1.5, 3.0];
        assert_eq!(decode_embedding(&encode_embedding(&v)).unwrap(), v);
    }

    #[test]
    fn misaligned_blob_is_corrupt() {
        assert!(decode_embedding(&[0, 1, 2]).is_err());
    }
}
