//! Paragraph-aligned, typed, token-budgeted chunking.
//!
//! Output depends only on the input text, the entity and the config, so
//! re-chunking unchanged text reproduces identical boundaries.

pub mod paragraphs;
pub mod sentences;
pub mod typing;

use std::collections::VecDeque;
use std::sync::Arc;

use precedent_core::config::ChunkingConfig;
use precedent_core::constants::RULE_EXTRACTOR;
use precedent_core::models::{Chunk, LegalEntity, Provenance, TrustBlock};

use crate::tokens::TokenCounter;
use paragraphs::Block;
use typing::Position;

/// blake3 hex digest used for entity and chunk content hashes.
pub fn content_hash(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}

/// Mean type confidence of a chunk set; 1.0 when empty.
pub fn parser_confidence(chunks: &[Chunk]) -> f64 {
    if chunks.is_empty() {
        return 1.0;
    }
    chunks.iter().map(|c| c.type_confidence).sum::<f64>() / chunks.len() as f64
}

/// A contiguous byte span with its token count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Piece {
    start: usize,
    end: usize,
    tokens: usize,
}

/// Maps byte offsets to character offsets and page numbers.
struct OffsetMap {
    /// Byte index of every char; empty for ASCII text.
    char_starts: Vec<usize>,
    form_feeds: Vec<usize>,
}

impl OffsetMap {
    fn new(text: &str) -> Self {
        let char_starts = if text.is_ascii() {
            Vec::new()
        } else {
            text.char_indices().map(|(b, _)| b).collect()
        };
        let form_feeds = text
            .char_indices()
            .filter(|(_, c)| *c == '\x0c')
            .map(|(b, _)| b)
            .collect();
        Self {
            char_starts,
            form_feeds,
        }
    }

    fn char_offset(&self, byte: usize) -> usize {
        if self.char_starts.is_empty() {
            byte
        } else {
            self.char_starts.partition_point(|&b| b < byte)
        }
    }

    fn page(&self, byte: usize) -> u32 {
        let breaks = self.form_feeds.partition_point(|&b| b < byte);
        u32::try_from(breaks).map_or(u32::MAX, |n| n.saturating_add(1))
    }
}

pub struct Chunker {
    counter: Arc<TokenCounter>,
    config: ChunkingConfig,
}

impl Chunker {
    pub fn new(counter: Arc<TokenCounter>, config: ChunkingConfig) -> Self {
        Self { counter, config }
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Chunk the text of `entity`. Chunks inherit the entity's provenance
    /// (tagged with the rule extractor) and verification status.
    pub fn chunk(&self, entity: &LegalEntity, text: &str) -> Vec<Chunk> {
        let blocks = paragraphs::split(entity.kind, text);
        let offsets = OffsetMap::new(text);
        let provenance = Provenance {
            extracted_by: RULE_EXTRACTOR.to_string(),
            ..entity.provenance.clone()
        };

        let mut chunks = Vec::new();
        for (block_index, block) in blocks.iter().enumerate() {
            let position = Position {
                index: block_index,
                total: blocks.len(),
            };
            for piece in self.pack(text, block) {
                let chunk_text = &text[piece.start..piece.end];
                let (chunk_type, type_confidence) =
                    typing::classify(entity.kind, chunk_text, position);
                let index = u32::try_from(chunks.len()).unwrap_or(u32::MAX);
                chunks.push(Chunk {
                    id: Chunk::make_id(&entity.id, index),
                    entity_id: entity.id.clone(),
                    chunk_index: index,
                    chunk_type,
                    type_confidence,
                    needs_review: type_confidence < self.config.type_review_threshold,
                    paragraph_number: block.paragraph_number,
                    section_marker: block.section_marker.clone(),
                    text: chunk_text.to_string(),
                    start_offset: offsets.char_offset(piece.start),
                    end_offset: offsets.char_offset(piece.end),
                    page: offsets.page(piece.start),
                    token_count: self.counter.count_cached(chunk_text),
                    embedding: None,
                    embedding_model: None,
                    provenance: provenance.clone(),
                    trust: TrustBlock {
                        parser_confidence: type_confidence,
                        ..TrustBlock::with_status(entity.trust.verification_status)
                    },
                    content_hash: content_hash(chunk_text),
                });
            }
        }
        chunks
    }

    /// One piece for a paragraph within budget; otherwise sentence-packed
    /// pieces aiming at `target_tokens`. Every piece but the paragraph's
    /// last holds at least `min_tokens` and none exceeds `max_tokens`,
    /// splitting sentences at word boundaries where needed.
    fn pack(&self, text: &str, block: &Block) -> Vec<Piece> {
        let max = self.config.max_tokens;
        let whole = self.measure(text, block.start, block.end);
        if whole <= max {
            return vec![Piece {
                start: block.start,
                end: block.end,
                tokens: whole,
            }];
        }
        let target = self.config.target_tokens;
        let min = self.config.min_tokens;

        let mut units: VecDeque<(usize, usize)> =
            sentences::spans(text, block.start, block.end).into();
        let mut out: Vec<Piece> = Vec::new();
        let mut current: Option<Piece> = None;
        while let Some((start, end)) = units.pop_front() {
            let tokens = self.measure(text, start, end);
            if tokens > max && queue_words(&mut units, text, start, end) {
                continue;
            }
            let Some(cur) = current else {
                current = Some(Piece { start, end, tokens });
                continue;
            };
            let merged = self.measure(text, cur.start, end);
            if merged <= max && (merged <= target || cur.tokens < min) {
                current = Some(Piece {
                    start: cur.start,
                    end,
                    tokens: merged,
                });
                continue;
            }
            // A short piece is topped up from the next sentence's words.
            if cur.tokens < min && queue_words(&mut units, text, start, end) {
                continue;
            }
            out.push(cur);
            current = Some(Piece { start, end, tokens });
        }
        out.extend(current);

        // A short final remainder joins its predecessor when that fits.
        if out.len() >= 2 {
            let last = out[out.len() - 1];
            let prev = out[out.len() - 2];
            let joined = self.measure(text, prev.start, last.end);
            if last.tokens < min && joined <= max {
                out.truncate(out.len() - 2);
                out.push(Piece {
                    start: prev.start,
                    end: last.end,
                    tokens: joined,
                });
            }
        }
        out
    }

    fn measure(&self, text: &str, start: usize, end: usize) -> usize {
        self.counter.count_cached(&text[start..end])
    }
}

/// Replace a sentence at the front of the queue by its words. False when
/// it is a single word and cannot be split further.
fn queue_words(units: &mut VecDeque<(usize, usize)>, text: &str, start: usize, end: usize) -> bool {
    let words = sentences::words(text, start, end);
    if words.len() < 2 {
        return false;
    }
    for span in words.into_iter().rev() {
        units.push_front(span);
    }
    true
}
