//! Test fixture loader and builders for the Precedent legal corpus.
//!
//! Fixture JSON lives under `test-fixtures/golden/`; builders construct
//! entities, chunks and edges with sensible defaults so tests only spell
//! out what they assert on.

use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use precedent_core::models::{
    Chunk, ChunkType, CitationEdge, CitationType, EdgeState, EntityAttributes, EntityKind,
    LegalEntity, Provenance, SourceMeta, SourceTier, Treatment, TrustBlock,
};

/// Root directory of the test-fixtures folder.
fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up to find test-fixtures.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    while !path.join("test-fixtures").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Get the absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// One document of the golden corpus.
#[derive(Debug, Clone, Deserialize)]
pub struct CorpusDocument {
    pub id: String,
    pub kind: EntityKind,
    pub text: String,
    pub meta: SourceMeta,
}

/// The small statute-and-case corpus shared by retrieval and ingestion tests.
pub fn legal_corpus() -> Vec<CorpusDocument> {
    load_fixture("golden/legal_corpus.json")
}

/// 1 January of `year`, UTC.
pub fn year(year: i32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("invalid year {year}"))
}

/// A current, open-ended version 1 entity.
pub fn entity(id: &str, kind: EntityKind, title: &str) -> LegalEntity {
    let tier = if kind.is_legislation() {
        SourceTier::PrimaryStatute
    } else {
        SourceTier::PrimaryJudgment
    };
    LegalEntity {
        id: id.to_string(),
        kind,
        version: 1,
        valid_from: None,
        valid_to: None,
        is_current_version: true,
        attributes: EntityAttributes {
            title: title.to_string(),
            ..EntityAttributes::default()
        },
        summary: title.to_string(),
        content_hash: String::new(),
        provenance: Provenance::new("fixture", tier, "test-fixtures"),
        trust: TrustBlock::default(),
    }
}

/// Version `version` of `id` valid over `[from, to)` (years).
pub fn version(id: &str, version: u32, from: i32, to: Option<i32>, current: bool) -> LegalEntity {
    LegalEntity {
        version,
        valid_from: Some(year(from)),
        valid_to: to.map(year),
        is_current_version: current,
        ..entity(id, EntityKind::Section, id)
    }
}

pub fn chunk(entity_id: &str, index: u32, chunk_type: ChunkType, text: &str) -> Chunk {
    Chunk {
        id: Chunk::make_id(entity_id, index),
        entity_id: entity_id.to_string(),
        chunk_index: index,
        chunk_type,
        type_confidence: 0.9,
        needs_review: false,
        paragraph_number: Some(index + 1),
        section_marker: None,
        text: text.to_string(),
        start_offset: 0,
        end_offset: text.len(),
        page: 1,
        token_count: text.split_whitespace().count(),
        embedding: None,
        embedding_model: None,
        provenance: Provenance::new("fixture", SourceTier::PrimaryJudgment, "test-fixtures"),
        trust: TrustBlock::default(),
        content_hash: String::new(),
    }
}

/// An active, resolved judicial citation.
pub fn citation(citing: &str, cited: &str, treatment: Treatment, confidence: f64) -> CitationEdge {
    let key = cited.to_string();
    CitationEdge {
        id: CitationEdge::make_id(citing, None, &key, 0),
        citing_id: citing.to_string(),
        cited_id: Some(cited.to_string()),
        chunk_id: None,
        raw_reference: cited.to_string(),
        reference_key: key,
        citation_type: CitationType::Judicial,
        treatment,
        confidence,
        weight: treatment.weight(),
        locator: None,
        context: None,
        state: EdgeState::Active,
        extracted_by: "test-fixtures".to_string(),
        extracted_at: Utc::now(),
    }
}

/// Source metadata for a primary judgment.
pub fn judgment_meta(title: &str, decided: i32) -> SourceMeta {
    SourceMeta {
        title: title.to_string(),
        jurisdiction: Some("IN".to_string()),
        court_level: Some(1),
        decision_date: Some(year(decided)),
        source: format!("reports/{}", title.to_lowercase().replace(' ', "-")),
        source_tier: SourceTier::PrimaryJudgment,
        ..SourceMeta::default()
    }
}

/// Source metadata for a statutory provision.
pub fn statute_meta(title: &str, aliases: &[&str], enacted: i32) -> SourceMeta {
    SourceMeta {
        title: title.to_string(),
        jurisdiction: Some("IN".to_string()),
        aliases: aliases.iter().map(|a| a.to_string()).collect(),
        source: "gazette".to_string(),
        source_tier: SourceTier::PrimaryStatute,
        valid_from: Some(year(enacted)),
        ..SourceMeta::default()
    }
}
