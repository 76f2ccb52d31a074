use serde::{Deserialize, Serialize};

use super::provenance::Provenance;
use super::trust::TrustBlock;

/// Structural role of a chunk within its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkType {
    Facts,
    Issues,
    Holding,
    Reasoning,
    Dissent,
    Procedural,
    StatuteText,
    LegalAnalysis,
}

impl ChunkType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Facts => "facts",
            Self::Issues => "issues",
            Self::Holding => "holding",
            Self::Reasoning => "reasoning",
            Self::Dissent => "dissent",
            Self::Procedural => "procedural",
            Self::StatuteText => "statute_text",
            Self::LegalAnalysis => "legal_analysis",
        }
    }
}

/// A contiguous, typed, token-budgeted span of an entity's text.
/// Owned by its entity and replaced wholesale on re-chunking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// `"{entity_id}:{chunk_index}"`.
    pub id: String,
    pub entity_id: String,
    pub chunk_index: u32,
    pub chunk_type: ChunkType,
    pub type_confidence: f64,
    pub needs_review: bool,
    /// Paragraph number as printed in the judgment, if any.
    pub paragraph_number: Option<u32>,
    /// Section or subsection marker for legislative text, e.g. "17(1)".
    pub section_marker: Option<String>,
    pub text: String,
    /// Character offsets into the source text, end exclusive.
    pub start_offset: usize,
    pub end_offset: usize,
    /// 1-based page of `start_offset`, counted by form feeds.
    pub page: u32,
    pub token_count: usize,
    pub embedding: Option<Vec<f32>>,
    /// Provider that produced `embedding`; vectors from different
    /// providers are not comparable.
    #[serde(default)]
    pub embedding_model: Option<String>,
    pub provenance: Provenance,
    pub trust: TrustBlock,
    pub content_hash: String,
}

impl Chunk {
    pub fn make_id(entity_id: &str, chunk_index: u32) -> String {
        format!("{entity_id}:{chunk_index}")
    }
}
