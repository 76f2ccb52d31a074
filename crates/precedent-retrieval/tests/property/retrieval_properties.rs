use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use proptest::prelude::*;

use precedent_core::config::TrustConfig;
use precedent_core::errors::PrecedentResult;
use precedent_core::models::{ChunkType, EntityKind};
use precedent_core::traits::IPairwiseScorer;
use precedent_core::Intent;
use precedent_graph::GraphState;
use precedent_retrieval::intent::weight_matrix::WeightMatrix;
use precedent_retrieval::search::{fuse, Candidate, KeywordHit, KeywordIndex, VectorHit};
use precedent_retrieval::Reranker;
use test_fixtures::{chunk, entity};

const WORDS: &[&str] = &[
    "registration", "sale", "deed", "evidence", "possession", "lease", "gift", "plaint", "appeal",
    "section", "17", "49", "collateral", "immovable", "property",
];

fn sentence() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 1..12).prop_map(|w| w.join(" "))
}

fn corpus() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(sentence(), 1..8)
}

fn state_of(texts: &[String]) -> GraphState {
    let mut state = GraphState::new();
    for (i, text) in texts.iter().enumerate() {
        let id = format!("e{i}");
        state
            .insert_version(entity(&id, EntityKind::Case, &id))
            .unwrap();
        state
            .replace_chunks(&id, vec![chunk(&id, 0, ChunkType::Holding, text)])
            .unwrap();
    }
    state
}

struct Fixed(Vec<f64>);

impl IPairwiseScorer for Fixed {
    fn score(&self, _query: &str, _text: &str) -> PrecedentResult<f64> {
        Ok(0.5)
    }

    fn score_batch(&self, _query: &str, texts: &[String]) -> PrecedentResult<Vec<f64>> {
        Ok(self.0.iter().copied().cycle().take(texts.len()).collect())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn blend_stays_in_unit_interval(
        intent in prop::sample::select(Intent::ALL.to_vec()),
        s in 0.0f64..=1.0, k in 0.0f64..=1.0, t in 0.0f64..=1.0, r in 0.0f64..=1.0,
    ) {
        let w = WeightMatrix::default().weights(intent);
        prop_assert!((w.sum() - 1.0).abs() < 1e-9);
        let blended = w.blend(s, k, t, r);
        prop_assert!((0.0..=1.0 + 1e-9).contains(&blended));
        let keyword_only = w.without_semantic().blend(s, k, t, r);
        prop_assert!((0.0..=1.0 + 1e-9).contains(&keyword_only));
    }

    #[test]
    fn keyword_scores_are_normalized_and_sorted(texts in corpus(), query in sentence()) {
        let state = state_of(&texts);
        let hits = KeywordIndex::build(&state).search(&query, &[], 50);
        for pair in hits.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
        for hit in &hits {
            prop_assert!(hit.score > 0.0 && hit.score <= 1.0 + 1e-9);
        }
        if let Some(top) = hits.first() {
            prop_assert!((top.score - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn fused_scores_are_bounded_and_unique(
        texts in corpus(),
        keyword in prop::collection::vec(0.0f64..=1.0, 8),
        vector in prop::collection::vec(0.0f64..=1.0, 8),
        intent in prop::sample::select(Intent::ALL.to_vec()),
    ) {
        let state = state_of(&texts);
        let keyword: Vec<KeywordHit> = texts.iter().enumerate().map(|(i, _)| KeywordHit {
            chunk_id: format!("e{i}:0"),
            entity_id: format!("e{i}"),
            score: keyword[i],
            exact_reference: false,
        }).collect();
        let vector: Vec<VectorHit> = texts.iter().enumerate().map(|(i, _)| VectorHit {
            chunk_id: format!("e{i}:0"),
            entity_id: format!("e{i}"),
            score: vector[i],
        }).collect();

        let weights = WeightMatrix::default().weights(intent);
        let fused = fuse(&state, &keyword, &vector, weights, &TrustConfig::default(), Utc::now());
        prop_assert_eq!(fused.len(), texts.len());
        for c in &fused {
            prop_assert!((0.0..=1.0).contains(&c.score));
        }
        for pair in fused.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
        let mut ids: Vec<&str> = fused.iter().map(|c| c.chunk_id.as_str()).collect();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), fused.len());
    }

    #[test]
    fn rerank_reorders_without_adding_or_dropping(
        scores in prop::collection::vec(0.0f64..=1.0, 1..20),
        pairwise in prop::collection::vec(0.0f64..=1.0, 1..20),
        top_k in 1usize..25,
    ) {
        let candidates: Vec<Candidate> = scores
            .iter()
            .enumerate()
            .map(|(i, s)| Candidate::direct(format!("c{i}:0"), format!("c{i}"), *s))
            .collect();
        let texts: Vec<String> = candidates.iter().map(|c| c.chunk_id.clone()).collect();
        let reranker = Reranker::new(top_k, 0.6, Duration::from_secs(5))
            .with_scorer(Arc::new(Fixed(pairwise)));

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let (out, _) = runtime.block_on(reranker.rerank(
            "q",
            candidates.clone(),
            texts,
            Duration::from_secs(5),
        ));

        let mut before: Vec<String> = candidates.iter().map(|c| c.chunk_id.clone()).collect();
        let mut after: Vec<String> = out.iter().map(|c| c.chunk_id.clone()).collect();
        let head = top_k.min(candidates.len());
        prop_assert_eq!(&after[head..], &before[head..]);
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
        for c in &out {
            prop_assert!((0.0..=1.0).contains(&c.score));
        }
    }
}
