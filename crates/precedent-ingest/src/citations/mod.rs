//! Citation extraction: statutory and authority references found in chunk
//! text, resolved against the graph's alias index.

pub mod authority;
pub mod resolve;
pub mod statutory;

use precedent_core::constants::CITATION_CONTEXT_CHARS;
use precedent_core::models::CitationType;
use precedent_graph::normalize_reference;

use crate::chunker::sentences;

pub use resolve::{resolve, Resolved};

/// One reference found in a piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedReference {
    pub citation_type: CitationType,
    /// Exactly as written.
    pub raw: String,
    /// Lookup strings in preference order.
    pub candidates: Vec<String>,
    pub locator: Option<String>,
    /// Byte span in the scanned text.
    pub start: usize,
    pub end: usize,
}

impl ExtractedReference {
    /// Normalized key of the most specific candidate.
    pub fn key(&self) -> String {
        normalize_reference(self.candidates.first().unwrap_or(&self.raw))
    }
}

/// Stateless scanner over both reference families.
#[derive(Debug, Clone, Copy, Default)]
pub struct CitationExtractor;

impl CitationExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Every reference in `text`, ordered by position.
    pub fn extract(&self, text: &str) -> Vec<ExtractedReference> {
        let mut refs = statutory::extract(text);
        refs.extend(authority::extract(text));
        refs.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
        refs
    }

    /// The sentence containing `text[start..end]`, cut to
    /// [`CITATION_CONTEXT_CHARS`] characters around the reference.
    pub fn context(&self, text: &str, start: usize, end: usize) -> String {
        let (s, e) = sentence_span(text, start, end);
        window(text, s, e, start)
    }

    /// The clause of its sentence that belongs to `refs[index]`: treatment
    /// words are read from here so that one sentence naming two
    /// authorities treats each by its own words.
    ///
    /// A neighbouring reference separated only by spaces, commas or
    /// brackets (a case name and its report citation) belongs to the same
    /// clause. Otherwise the text between two references is split at its
    /// last `,` `;` or `:`, and shared when it has none.
    pub fn clause(&self, text: &str, refs: &[ExtractedReference], index: usize) -> String {
        let Some(target) = refs.get(index) else {
            return String::new();
        };
        let (s, e) = sentence_span(text, target.start, target.end);
        let neighbours: Vec<(usize, usize)> = refs
            .iter()
            .filter(|r| s <= r.start && r.end <= e)
            .filter(|r| r.end <= target.start || target.end <= r.start)
            .map(|r| (r.start, r.end))
            .collect();

        let (mut lo, mut hi) = (target.start, target.end);
        let mut from = s;
        while let Some(&(p_start, p_end)) = neighbours
            .iter()
            .filter(|(_, p_end)| *p_end <= lo)
            .max_by_key(|(_, p_end)| *p_end)
        {
            let gap = &text[p_end..lo];
            if is_joiner(gap) {
                lo = p_start.min(lo);
                continue;
            }
            from = p_end + last_break(gap).unwrap_or(0);
            break;
        }
        let mut to = e;
        while let Some(&(n_start, n_end)) = neighbours
            .iter()
            .filter(|(n_start, _)| *n_start >= hi)
            .min_by_key(|(n_start, _)| *n_start)
        {
            let gap = &text[hi..n_start];
            if is_joiner(gap) {
                hi = n_end.max(hi);
                continue;
            }
            to = hi + last_break(gap).unwrap_or(gap.len());
            break;
        }
        window(text, from, to, target.start)
    }
}

fn sentence_span(text: &str, start: usize, end: usize) -> (usize, usize) {
    sentences::spans(text, 0, text.len())
        .into_iter()
        .find(|(s, e)| *s <= start && end <= *e)
        .unwrap_or((start, end))
}

/// `text[s..e]`, trimmed, and cut to [`CITATION_CONTEXT_CHARS`]
/// characters centred on `anchor` when longer.
fn window(text: &str, s: usize, e: usize, anchor: usize) -> String {
    let span = &text[s..e];
    if span.chars().count() <= CITATION_CONTEXT_CHARS {
        return span.trim().to_string();
    }
    let before = text[s..anchor.max(s)].chars().count();
    let from = before.saturating_sub(CITATION_CONTEXT_CHARS / 2);
    span.chars()
        .skip(from)
        .take(CITATION_CONTEXT_CHARS)
        .collect::<String>()
        .trim()
        .to_string()
}

fn is_joiner(gap: &str) -> bool {
    gap.chars()
        .all(|c| c.is_whitespace() || matches!(c, ',' | '(' | ')' | '[' | ']'))
}

/// Byte offset of the last clause break in `gap`.
fn last_break(gap: &str) -> Option<usize> {
    gap.rfind([',', ';', ':'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_references_in_order() {
        let text = "Section 49 of the Registration Act was applied in Alpha Builders v. Union of India, (1990) 2 SCC 101.";
        let refs = CitationExtractor::new().extract(text);
        let kinds: Vec<_> = refs.iter().map(|r| r.citation_type).collect();
        assert_eq!(
            kinds,
            vec![CitationType::Statutory, CitationType::Judicial, CitationType::Judicial]
        );
        assert_eq!(refs[0].key(), "section 49 of the registration act");
    }

    #[test]
    fn context_is_the_containing_sentence() {
        let text = "Facts were agreed. In our view Alpha Builders v. Union of India is overruled. Costs follow.";
        let extractor = CitationExtractor::new();
        let refs = extractor.extract(text);
        let context = extractor.context(text, refs[0].start, refs[0].end);
        assert_eq!(context, "In our view Alpha Builders v. Union of India is overruled.");
    }

    #[test]
    fn clause_stops_at_the_neighbouring_authority() {
        let text = "We follow Alpha Builders v. Beta Traders, and hold that Gamma Holdings v. Delta Bank is overruled.";
        let extractor = CitationExtractor::new();
        let refs = extractor.extract(text);
        assert_eq!(refs.len(), 2);
        assert_eq!(
            extractor.clause(text, &refs, 0),
            "We follow Alpha Builders v. Beta Traders"
        );
        assert_eq!(
            extractor.clause(text, &refs, 1),
            ", and hold that Gamma Holdings v. Delta Bank is overruled."
        );
    }

    #[test]
    fn leading_authority_does_not_see_the_later_overruling() {
        let text = "Following Alpha Builders v. Beta Traders, we hold that Gamma Holdings v. Delta Bank is overruled.";
        let extractor = CitationExtractor::new();
        let refs = extractor.extract(text);
        assert_eq!(refs.len(), 2);
        let first = extractor.clause(text, &refs, 0);
        assert_eq!(first, "Following Alpha Builders v. Beta Traders");
        assert!(extractor.clause(text, &refs, 1).ends_with("is overruled."));
    }

    #[test]
    fn report_citation_shares_the_case_name_clause() {
        let text = "Alpha Builders v. Union of India, (1990) 2 SCC 101, is overruled; Beta Estates v. Gamma Traders is followed.";
        let extractor = CitationExtractor::new();
        let refs = extractor.extract(text);
        assert_eq!(refs.len(), 3);
        for index in 0..2 {
            let clause = extractor.clause(text, &refs, index);
            assert!(clause.ends_with("is overruled"), "{clause}");
            assert!(!clause.contains("followed"), "{clause}");
        }
        assert_eq!(
            extractor.clause(text, &refs, 2),
            "; Beta Estates v. Gamma Traders is followed."
        );
    }

    #[test]
    fn single_reference_clause_is_the_sentence() {
        let text = "Facts were agreed. In our view Alpha Builders v. Union of India is overruled. Costs follow.";
        let extractor = CitationExtractor::new();
        let refs = extractor.extract(text);
        assert_eq!(
            extractor.clause(text, &refs, 0),
            extractor.context(text, refs[0].start, refs[0].end)
        );
    }

    #[test]
    fn long_context_is_windowed() {
        let filler = "word ".repeat(200);
        let text = format!("{filler}Alpha v. Beta {filler}.");
        let extractor = CitationExtractor::new();
        let refs = extractor.extract(&text);
        let context = extractor.context(&text, refs[0].start, refs[0].end);
        assert!(context.chars().count() <= CITATION_CONTEXT_CHARS);
        assert!(context.contains("Alpha v. Beta"));
    }
}
