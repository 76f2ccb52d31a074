use std::sync::Arc;

use proptest::prelude::*;

use precedent_core::config::ChunkingConfig;
use precedent_core::models::EntityKind;
use precedent_ingest::{Chunker, TokenCounter};
use test_fixtures::entity;

const WORDS: &[&str] = &[
    "the", "appellant", "registration", "instrument", "Court", "held", "section", "immovable",
    "property", "agreement", "evidence", "v.", "cf.", "compulsory", "respondent", "appeal",
];

fn sentence() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 1..30).prop_map(|words| {
        let mut s = words.join(" ");
        s.push('.');
        s
    })
}

/// Sentences of up to 150 words, so some exceed the chunk ceiling.
fn uneven_sentence() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 1..150).prop_map(|words| {
        let mut s = words.join(" ");
        s.push('.');
        s
    })
}

fn uneven_judgment() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::collection::vec(uneven_sentence(), 1..6).prop_map(|s| s.join(" ")),
        1..5,
    )
    .prop_map(|paragraphs| {
        paragraphs
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{}. {}", i + 1, p))
            .collect::<Vec<_>>()
            .join("\n\n")
    })
}

fn paragraph() -> impl Strategy<Value = String> {
    prop::collection::vec(sentence(), 1..12).prop_map(|sentences| sentences.join(" "))
}

fn judgment() -> impl Strategy<Value = String> {
    prop::collection::vec(paragraph(), 1..8).prop_map(|paragraphs| {
        paragraphs
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{}. {}", i + 1, p))
            .collect::<Vec<_>>()
            .join("\n\n")
    })
}

fn chunker() -> Chunker {
    let config = ChunkingConfig {
        max_tokens: 80,
        target_tokens: 50,
        min_tokens: 10,
        ..ChunkingConfig::default()
    };
    Chunker::new(Arc::new(TokenCounter::new(10_000).unwrap()), config)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn rechunking_is_deterministic(text in judgment()) {
        let chunker = chunker();
        let doc = entity("doc", EntityKind::Case, "Doc");
        let first = chunker.chunk(&doc, &text);
        let second = chunker.chunk(&doc, &text);
        prop_assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            prop_assert_eq!(&a.id, &b.id);
            prop_assert_eq!(&a.content_hash, &b.content_hash);
            prop_assert_eq!(a.start_offset, b.start_offset);
            prop_assert_eq!(a.end_offset, b.end_offset);
            prop_assert_eq!(a.chunk_type, b.chunk_type);
        }
    }

    #[test]
    fn chunks_cover_the_text_in_order(text in judgment()) {
        let chunks = chunker().chunk(&entity("doc", EntityKind::Case, "Doc"), &text);
        let chars: Vec<char> = text.chars().collect();
        for chunk in &chunks {
            let slice: String = chars[chunk.start_offset..chunk.end_offset].iter().collect();
            prop_assert_eq!(&slice, &chunk.text);
            prop_assert!(chunk.paragraph_number.is_some());
        }
        for pair in chunks.windows(2) {
            prop_assert!(pair[0].end_offset <= pair[1].start_offset);
            prop_assert_eq!(pair[0].chunk_index + 1, pair[1].chunk_index);
        }
        let original: Vec<&str> = text.split_whitespace().collect();
        let rebuilt: Vec<&str> = chunks.iter().flat_map(|c| c.text.split_whitespace()).collect();
        prop_assert_eq!(original, rebuilt);
    }

    #[test]
    fn chunks_respect_the_token_budget(text in uneven_judgment()) {
        let chunks = chunker().chunk(&entity("doc", EntityKind::Case, "Doc"), &text);
        for chunk in &chunks {
            prop_assert!(chunk.token_count <= 80, "{} tokens: {}", chunk.token_count, chunk.text);
        }
        for pair in chunks.windows(2) {
            // Only a paragraph's last chunk may fall below the floor.
            if pair[0].paragraph_number == pair[1].paragraph_number {
                prop_assert!(pair[0].token_count >= 10, "{} tokens: {}", pair[0].token_count, pair[0].text);
            }
        }
    }
}
