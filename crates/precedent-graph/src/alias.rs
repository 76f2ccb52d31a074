//! Reference normalization shared by the alias index and the citation extractor.

/// Normalize a legal reference to its lookup key.
///
/// Lowercases, drops punctuation other than parentheses, collapses
/// whitespace and canonicalizes abbreviations, so "s. 17", "Sec.17" and
/// "Section 17" all become `section 17`.
pub fn normalize_reference(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch.is_alphanumeric() || ch == '(' || ch == ')' {
            cleaned.extend(ch.to_lowercase());
        } else if ch == '\'' || ch == '\u{2019}' {
            continue;
        } else {
            cleaned.push(' ');
        }
    }

    let tokens: Vec<&str> = cleaned
        .split_whitespace()
        .map(|token| match token {
            "s" | "ss" | "sec" | "secs" | "section" | "sections" => "section",
            "art" | "arts" | "article" | "articles" => "article",
            "o" | "ord" | "order" => "order",
            "r" | "rule" | "rules" => "rule",
            "v" | "vs" | "versus" => "v",
            "para" | "paras" | "paragraph" => "paragraph",
            other => other,
        })
        .collect();
    tokens.join(" ")
}
