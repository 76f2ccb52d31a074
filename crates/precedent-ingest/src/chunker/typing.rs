//! Ordered rule cascade assigning a [`ChunkType`] to each block.

use precedent_core::models::{ChunkType, EntityKind};

use crate::patterns::{
    is_match, RE_DISSENT, RE_FACTS, RE_HOLDING, RE_ISSUES, RE_ISSUE_WHETHER, RE_PROCEDURAL,
    RE_REASONING,
};

/// Where a block sits in its document.
#[derive(Debug, Clone, Copy)]
pub struct Position {
    pub index: usize,
    pub total: usize,
}

impl Position {
    /// First two blocks or the first third of the document.
    pub fn is_early(self) -> bool {
        self.index < 2 || self.index * 3 < self.total
    }
}

/// First matching rule wins. Explicit markers beat positional keyword sets;
/// anything unrecognized falls back to low-confidence legal analysis.
pub fn classify(kind: EntityKind, text: &str, position: Position) -> (ChunkType, f64) {
    if kind.is_legislation() {
        return (ChunkType::StatuteText, 0.95);
    }
    if is_match(&RE_DISSENT, text) {
        return (ChunkType::Dissent, 0.9);
    }
    if is_match(&RE_HOLDING, text) {
        return (ChunkType::Holding, 0.9);
    }
    if is_match(&RE_ISSUES, text) || is_match(&RE_ISSUE_WHETHER, text) {
        return (ChunkType::Issues, 0.85);
    }
    if is_match(&RE_PROCEDURAL, text) {
        let confidence = if position.is_early() { 0.75 } else { 0.7 };
        return (ChunkType::Procedural, confidence);
    }
    if position.is_early() && is_match(&RE_FACTS, text) {
        return (ChunkType::Facts, 0.7);
    }
    if is_match(&RE_REASONING, text) {
        return (ChunkType::Reasoning, 0.65);
    }
    (ChunkType::LegalAnalysis, 0.4)
}
