//! Authority references: case names, law-report citations and
//! secondary sources.

use precedent_core::models::CitationType;

use super::ExtractedReference;
use crate::patterns::{RE_CASE_NAME, RE_REPORTER_AIR, RE_REPORTER_SCC, RE_REPORTER_UK, RE_SECONDARY};

/// Upper bound on lookup candidates generated per case name.
const MAX_CASE_CANDIDATES: usize = 24;

const CONNECTORS: &[&str] = &["of", "and", "the", "&"];

pub fn extract(text: &str) -> Vec<ExtractedReference> {
    let mut out = case_names(text);
    for pattern in [&RE_REPORTER_SCC, &RE_REPORTER_UK, &RE_REPORTER_AIR] {
        if let Some(re) = pattern.as_ref() {
            out.extend(re.find_iter(text).map(|m| ExtractedReference {
                citation_type: CitationType::Judicial,
                raw: m.as_str().to_string(),
                candidates: vec![m.as_str().to_string()],
                locator: None,
                start: m.start(),
                end: m.end(),
            }));
        }
    }
    if let Some(re) = RE_SECONDARY.as_ref() {
        out.extend(re.find_iter(text).map(|m| ExtractedReference {
            citation_type: CitationType::Secondary,
            raw: m.as_str().to_string(),
            candidates: vec![m.as_str().to_string()],
            locator: None,
            start: m.start(),
            end: m.end(),
        }));
    }
    out
}

fn case_names(text: &str) -> Vec<ExtractedReference> {
    let Some(re) = RE_CASE_NAME.as_ref() else {
        return Vec::new();
    };
    re.captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let left = caps.get(1)?.as_str();
            let right = caps.get(2)?.as_str();
            Some(ExtractedReference {
                citation_type: CitationType::Judicial,
                raw: whole.as_str().to_string(),
                candidates: case_candidates(left, right),
                locator: None,
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// The regex over-captures capitalized words around a case name ("In
/// Alpha Builders v. Union of India"), so candidates trim leading words
/// from the first party and trailing words from the second, longest first.
fn case_candidates(left: &str, right: &str) -> Vec<String> {
    let left: Vec<&str> = left.split_whitespace().collect();
    let right: Vec<&str> = right.split_whitespace().collect();
    let starts: Vec<usize> = (0..left.len())
        .filter(|&i| !CONNECTORS.contains(&left[i]))
        .collect();
    let ends: Vec<usize> = (1..=right.len())
        .rev()
        .filter(|&j| !CONNECTORS.contains(&right[j - 1]))
        .collect();

    let mut candidates = Vec::new();
    for &i in &starts {
        for &j in &ends {
            if candidates.len() >= MAX_CASE_CANDIDATES {
                return candidates;
            }
            candidates.push(format!("{} v. {}", left[i..].join(" "), right[..j].join(" ")));
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_name_candidates_trim_leading_words() {
        let refs = extract("In Alpha Builders v. Union of India the court held otherwise.");
        let case = refs
            .iter()
            .find(|r| r.citation_type == CitationType::Judicial)
            .unwrap();
        assert_eq!(case.raw, "In Alpha Builders v. Union of India");
        assert_eq!(case.candidates[0], "In Alpha Builders v. Union of India");
        assert!(case
            .candidates
            .contains(&"Alpha Builders v. Union of India".to_string()));
        assert!(!case.candidates.iter().any(|c| c.ends_with(" of")));
    }

    #[test]
    fn reporter_citations() {
        let refs = extract("see (1990) 2 SCC 101 and [2004] UKHL 22 and AIR 1961 SC 1747");
        let raws: Vec<&str> = refs.iter().map(|r| r.raw.as_str()).collect();
        assert!(raws.contains(&"(1990) 2 SCC 101"));
        assert!(raws.contains(&"[2004] UKHL 22"));
        assert!(raws.contains(&"AIR 1961 SC 1747"));
    }

    #[test]
    fn secondary_sources() {
        let refs = extract("as stated in Halsbury's Laws of England (4th Edn.), Vol. 16");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].citation_type, CitationType::Secondary);
    }
}
