//! BM25 keyword search over chunk text with an exact-reference boost.
//!
//! The index is rebuilt from a graph snapshot and cached by the snapshot's
//! generation, so repeated queries against an unchanged graph reuse it.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use precedent_graph::{normalize_reference, GraphState};
use precedent_ingest::CitationExtractor;

const K1: f64 = 1.2;
const B: f64 = 0.75;

/// Share of the keyword score carried by an exact reference match when
/// the query names one.
const REFERENCE_SHARE: f64 = 0.4;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "in", "is", "it", "of", "on",
    "or", "that", "the", "this", "to", "under", "what", "which", "with",
];

/// Lowercased alphanumeric terms without stopwords.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
        .collect()
}

/// Normalized keys of every reference candidate found in `text`.
pub fn reference_keys(extractor: &CitationExtractor, text: &str) -> Vec<String> {
    let mut keys: Vec<String> = extractor
        .extract(text)
        .iter()
        .flat_map(|r| r.candidates.iter().map(|c| normalize_reference(c)))
        .collect();
    keys.sort();
    keys.dedup();
    keys
}

/// `needle` occurs in `haystack` on word boundaries, so `section 17`
/// matches `section 17(1)` but not `section 170`.
pub fn mentions(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(i, _)| {
        let before = haystack[..i].chars().next_back();
        let after = haystack[i + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[derive(Debug, Clone)]
struct IndexedChunk {
    chunk_id: String,
    entity_id: String,
    len: usize,
    /// Reference keys of the chunk text and of its entity's title and aliases.
    references: Vec<String>,
}

impl IndexedChunk {
    fn names(&self, query_refs: &[String]) -> bool {
        query_refs.iter().any(|q| {
            self.references
                .iter()
                .any(|r| mentions(r, q) || mentions(q, r))
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordHit {
    pub chunk_id: String,
    pub entity_id: String,
    /// In [0, 1].
    pub score: f64,
    pub exact_reference: bool,
}

pub struct KeywordIndex {
    generation: u64,
    docs: Vec<IndexedChunk>,
    postings: HashMap<String, Vec<(usize, u32)>>,
    avg_len: f64,
}

impl KeywordIndex {
    pub fn build(state: &GraphState) -> Self {
        let extractor = CitationExtractor::new();
        let mut docs = Vec::new();
        let mut postings: HashMap<String, Vec<(usize, u32)>> = HashMap::new();
        let mut total_len = 0usize;

        for entity in state.current_entities() {
            let mut entity_refs: Vec<String> = std::iter::once(&entity.attributes.title)
                .chain(&entity.attributes.aliases)
                .map(|s| normalize_reference(s))
                .filter(|s| !s.is_empty())
                .collect();
            entity_refs.extend(reference_keys(&extractor, &entity.attributes.title));

            for chunk in state.chunks(&entity.id) {
                let terms = tokenize(&chunk.text);
                let doc = docs.len();
                let mut tf: HashMap<&str, u32> = HashMap::new();
                for term in &terms {
                    *tf.entry(term.as_str()).or_default() += 1;
                }
                for (term, count) in tf {
                    postings.entry(term.to_string()).or_default().push((doc, count));
                }
                total_len += terms.len();

                let mut references = entity_refs.clone();
                references.extend(reference_keys(&extractor, &chunk.text));
                docs.push(IndexedChunk {
                    chunk_id: chunk.id.clone(),
                    entity_id: entity.id.clone(),
                    len: terms.len(),
                    references,
                });
            }
        }

        let avg_len = if docs.is_empty() {
            0.0
        } else {
            total_len as f64 / docs.len() as f64
        };
        debug!(chunks = docs.len(), terms = postings.len(), "built keyword index");
        Self {
            generation: state.generation(),
            docs,
            postings,
            avg_len,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Top `limit` chunks for `query`. `query_refs` are the normalized
    /// references named in the query; chunks naming one of them get the
    /// reference share of the score on top of their normalized BM25.
    pub fn search(&self, query: &str, query_refs: &[String], limit: usize) -> Vec<KeywordHit> {
        let mut raw: HashMap<usize, f64> = HashMap::new();
        let n = self.docs.len() as f64;
        let mut terms = tokenize(query);
        terms.sort();
        terms.dedup();
        for term in &terms {
            let Some(list) = self.postings.get(term) else {
                continue;
            };
            let df = list.len() as f64;
            let idf = (1.0 + (n - df + 0.5) / (df + 0.5)).ln();
            for &(doc, tf) in list {
                let tf = f64::from(tf);
                let len_norm = if self.avg_len > 0.0 {
                    self.docs[doc].len as f64 / self.avg_len
                } else {
                    1.0
                };
                let score = idf * tf * (K1 + 1.0) / (tf + K1 * (1.0 - B + B * len_norm));
                *raw.entry(doc).or_default() += score;
            }
        }

        let exact: Vec<usize> = if query_refs.is_empty() {
            Vec::new()
        } else {
            (0..self.docs.len())
                .filter(|&d| self.docs[d].names(query_refs))
                .collect()
        };
        for &doc in &exact {
            raw.entry(doc).or_default();
        }

        let max_raw = raw.values().copied().fold(0.0f64, f64::max);
        let mut hits: Vec<KeywordHit> = raw
            .into_iter()
            .map(|(doc, score)| {
                let bm25 = if max_raw > 0.0 { score / max_raw } else { 0.0 };
                let exact_reference = exact.contains(&doc);
                let score = if query_refs.is_empty() {
                    bm25
                } else {
                    (1.0 - REFERENCE_SHARE) * bm25
                        + if exact_reference { REFERENCE_SHARE } else { 0.0 }
                };
                KeywordHit {
                    chunk_id: self.docs[doc].chunk_id.clone(),
                    entity_id: self.docs[doc].entity_id.clone(),
                    score,
                    exact_reference,
                }
            })
            .filter(|h| h.score > 0.0)
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.chunk_id.cmp(&b.chunk_id))
        });
        hits.truncate(limit);
        hits
    }
}

/// Keyword search with an index cached per graph generation.
#[derive(Default)]
pub struct KeywordSearcher {
    extractor: CitationExtractor,
    cached: RwLock<Option<Arc<KeywordIndex>>>,
}

impl KeywordSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// The index for `state`, rebuilt when the generation moved.
    pub fn index(&self, state: &GraphState) -> Arc<KeywordIndex> {
        let current = match self.cached.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        if let Some(index) = current.filter(|i| i.generation() == state.generation()) {
            return index;
        }
        let index = Arc::new(KeywordIndex::build(state));
        match self.cached.write() {
            Ok(mut guard) => *guard = Some(Arc::clone(&index)),
            Err(poisoned) => *poisoned.into_inner() = Some(Arc::clone(&index)),
        }
        index
    }

    pub fn search(&self, state: &GraphState, query: &str, limit: usize) -> Vec<KeywordHit> {
        let refs = reference_keys(&self.extractor, query);
        self.index(state).search(query, &refs, limit)
    }
}
