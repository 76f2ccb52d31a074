//! Statutory references: sections, articles, order/rule pairs.

use precedent_core::models::CitationType;

use super::ExtractedReference;
use crate::patterns::{RE_ARTICLE_REF, RE_ORDER_RULE_REF, RE_SECTION_REF};

pub fn extract(text: &str) -> Vec<ExtractedReference> {
    let mut out = sections(text);
    out.extend(articles(text));
    out.extend(order_rules(text));
    out
}

fn locator(sub: &str) -> Option<String> {
    (!sub.is_empty()).then(|| format!("sub-section {sub}"))
}

fn sections(text: &str) -> Vec<ExtractedReference> {
    let Some(re) = RE_SECTION_REF.as_ref() else {
        return Vec::new();
    };
    re.captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let number = caps.get(1)?.as_str();
            let sub = caps.get(2).map_or("", |m| m.as_str());
            let act = caps.get(3).map(|m| m.as_str().trim());
            let year = caps.get(4).map(|m| m.as_str());

            let mut candidates = Vec::new();
            match act {
                Some(act) => {
                    if !sub.is_empty() {
                        candidates.push(format!("Section {number}{sub} of the {act}"));
                    }
                    candidates.push(format!("Section {number} of the {act}"));
                    candidates.push(format!("Section {number} of {act}"));
                    candidates.push(format!("{act} s. {number}"));
                    if let Some(year) = year {
                        candidates.push(format!("{act}, {year}, Section {number}"));
                        candidates.push(format!("Section {number} of the {act}, {year}"));
                    }
                }
                None => {
                    if !sub.is_empty() {
                        candidates.push(format!("Section {number}{sub}"));
                    }
                    candidates.push(format!("Section {number}"));
                }
            }
            Some(ExtractedReference {
                citation_type: CitationType::Statutory,
                raw: whole.as_str().to_string(),
                candidates,
                locator: locator(sub),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

fn articles(text: &str) -> Vec<ExtractedReference> {
    let Some(re) = RE_ARTICLE_REF.as_ref() else {
        return Vec::new();
    };
    re.captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let number = caps.get(1)?.as_str();
            let sub = caps.get(2).map_or("", |m| m.as_str());
            let mut candidates = Vec::new();
            if !sub.is_empty() {
                candidates.push(format!("Article {number}{sub} of the Constitution"));
            }
            candidates.push(format!("Article {number} of the Constitution"));
            if !sub.is_empty() {
                candidates.push(format!("Article {number}{sub}"));
            }
            candidates.push(format!("Article {number}"));
            Some(ExtractedReference {
                citation_type: CitationType::Statutory,
                raw: whole.as_str().to_string(),
                candidates,
                locator: (!sub.is_empty()).then(|| format!("clause {sub}")),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

fn order_rules(text: &str) -> Vec<ExtractedReference> {
    let Some(re) = RE_ORDER_RULE_REF.as_ref() else {
        return Vec::new();
    };
    re.captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let order_raw = caps.get(1)?.as_str();
            let order = order_raw
                .parse::<u32>()
                .ok()
                .or_else(|| roman_to_arabic(order_raw))?;
            let rule = caps.get(2)?.as_str();
            Some(ExtractedReference {
                citation_type: CitationType::Statutory,
                raw: whole.as_str().to_string(),
                candidates: vec![format!("Order {order} Rule {rule}")],
                locator: None,
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// Roman numerals as used for CPC orders (I to CCC range is plenty).
pub fn roman_to_arabic(roman: &str) -> Option<u32> {
    let value = |c: char| match c {
        'I' => Some(1),
        'V' => Some(5),
        'X' => Some(10),
        'L' => Some(50),
        'C' => Some(100),
        _ => None,
    };
    let digits: Vec<u32> = roman.chars().map(value).collect::<Option<_>>()?;
    let mut total = 0;
    for (i, d) in digits.iter().enumerate() {
        match digits.get(i + 1) {
            Some(next) if next > d => total -= *d as i64,
            _ => total += *d as i64,
        }
    }
    u32::try_from(total).ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_with_act_prefers_qualified_candidates() {
        let refs = extract("Section 17 of the Registration Act makes registration compulsory.");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].candidates[0], "Section 17 of the Registration Act");
        assert!(refs[0].candidates.iter().all(|c| c.contains("Registration Act")));
    }

    #[test]
    fn subsection_becomes_locator() {
        let refs = extract("as required by s. 17(1)(b) of the Act");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].locator.as_deref(), Some("sub-section (1)(b)"));
        assert_eq!(refs[0].candidates, vec!["Section 17(1)(b)", "Section 17"]);
    }

    #[test]
    fn numbers_are_not_prefixes() {
        let refs = extract("Section 170 applies.");
        assert_eq!(refs[0].candidates, vec!["Section 170"]);
    }

    #[test]
    fn order_rule_normalizes_roman() {
        let refs = extract("rejected under Order VII Rule 11 and O. 7 r. 11");
        let candidates: Vec<_> = refs.iter().map(|r| r.candidates[0].as_str()).collect();
        assert_eq!(candidates, vec!["Order 7 Rule 11", "Order 7 Rule 11"]);
    }

    #[test]
    fn article_reference() {
        let refs = extract("a violation of Article 21 of the Constitution");
        assert_eq!(refs[0].candidates[0], "Article 21 of the Constitution");
    }

    #[test]
    fn roman_numerals() {
        assert_eq!(roman_to_arabic("VII"), Some(7));
        assert_eq!(roman_to_arabic("XXXIX"), Some(39));
        assert_eq!(roman_to_arabic("IV"), Some(4));
        assert_eq!(roman_to_arabic("Q"), None);
    }
}
