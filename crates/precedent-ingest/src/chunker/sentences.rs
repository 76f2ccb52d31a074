//! Abbreviation-aware sentence boundaries.

/// Tokens that end with a period without ending a sentence.
const ABBREVIATIONS: &[&str] = &[
    "v", "vs", "s", "ss", "sec", "secs", "no", "nos", "art", "arts", "cf", "e.g", "i.e", "etc",
    "mr", "mrs", "ms", "dr", "j", "jj", "cj", "ltd", "co", "corp", "inc", "para", "paras", "p",
    "pp", "r", "o", "ord", "viz", "ibid", "id", "vol", "ed", "edn", "sr", "st", "hon'ble", "supp",
];

fn is_abbreviation(word: &str) -> bool {
    let token: String = word
        .trim_start_matches(|c: char| matches!(c, '(' | '[' | '"' | '\'' | '\u{201c}'))
        .to_lowercase();
    if token.chars().count() == 1 && token.chars().all(char::is_alphabetic) {
        return true;
    }
    ABBREVIATIONS.contains(&token.as_str())
}

/// Sentence spans (byte offsets, trimmed) within `text[start..end]`.
///
/// A sentence ends at `.`, `?` or `!` followed by whitespace and a word
/// that does not start lowercase, unless the period closes a known
/// abbreviation, an initial, or a leading paragraph number.
pub fn spans(text: &str, start: usize, end: usize) -> Vec<(usize, usize)> {
    let slice = &text[start..end];
    let chars: Vec<(usize, char)> = slice.char_indices().collect();
    let mut out = Vec::new();
    let mut sentence_start = 0usize;

    let mut i = 0;
    while i < chars.len() {
        if matches!(chars[i].1, '.' | '?' | '!') {
            // Include trailing quotes and brackets in the sentence.
            let mut j = i + 1;
            while j < chars.len() && matches!(chars[j].1, '"' | '\'' | ')' | ']' | '\u{201d}') {
                j += 1;
            }
            let at_end = j == chars.len();
            let followed_by_space = at_end || chars[j].1.is_whitespace();
            if followed_by_space && (at_end || is_break(slice, &chars, sentence_start, i, j)) {
                let stop = if at_end { slice.len() } else { chars[j].0 };
                push_trimmed(&mut out, slice, start, sentence_start, stop);
                sentence_start = stop;
            }
            i = j;
            continue;
        }
        i += 1;
    }
    push_trimmed(&mut out, slice, start, sentence_start, slice.len());
    out
}

fn is_break(slice: &str, chars: &[(usize, char)], sentence_start: usize, punct: usize, after: usize) -> bool {
    let next = chars[after..].iter().find(|(_, c)| !c.is_whitespace());
    if let Some((_, c)) = next {
        if c.is_lowercase() {
            return false;
        }
    }
    if chars[punct].1 != '.' {
        return true;
    }
    let punct_pos = chars[punct].0;
    let before = &slice[sentence_start..punct_pos];
    let word = before
        .rsplit(|c: char| c.is_whitespace())
        .next()
        .unwrap_or("");
    if word.is_empty() {
        return true;
    }
    // "12." opening a numbered paragraph.
    if word.chars().all(|c| c.is_ascii_digit()) && before.trim() == word {
        return false;
    }
    !is_abbreviation(word)
}

fn push_trimmed(out: &mut Vec<(usize, usize)>, slice: &str, base: usize, from: usize, to: usize) {
    let piece = &slice[from..to];
    let lead = piece.len() - piece.trim_start().len();
    let body = piece.trim();
    if !body.is_empty() {
        let s = base + from + lead;
        out.push((s, s + body.len()));
    }
}

/// Word spans (byte offsets) within `text[start..end]`.
pub fn words(text: &str, start: usize, end: usize) -> Vec<(usize, usize)> {
    let slice = &text[start..end];
    let mut out = Vec::new();
    let mut word_start: Option<usize> = None;
    for (i, ch) in slice.char_indices() {
        match (ch.is_whitespace(), word_start) {
            (true, Some(s)) => {
                out.push((start + s, start + i));
                word_start = None;
            }
            (false, None) => word_start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = word_start {
        out.push((start + s, end));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(text: &str) -> Vec<&str> {
        spans(text, 0, text.len())
            .into_iter()
            .map(|(s, e)| &text[s..e])
            .collect()
    }

    #[test]
    fn splits_plain_sentences() {
        assert_eq!(
            sentences("The appeal fails. Costs follow! Is that so? Yes."),
            vec!["The appeal fails.", "Costs follow!", "Is that so?", "Yes."]
        );
    }

    #[test]
    fn case_names_and_abbreviations_do_not_split() {
        let text = "See Alpha Builders v. Union of India, cf. s. 17 of the Act. It was held so.";
        assert_eq!(
            sentences(text),
            vec![
                "See Alpha Builders v. Union of India, cf. s. 17 of the Act.",
                "It was held so."
            ]
        );
    }

    #[test]
    fn leading_paragraph_number_stays_attached() {
        assert_eq!(
            sentences("4. We therefore hold that it fails. The appeal is dismissed."),
            vec!["4. We therefore hold that it fails.", "The appeal is dismissed."]
        );
    }

    #[test]
    fn initials_do_not_split() {
        assert_eq!(
            sentences("Per K. Ramaswamy J. The bench agreed."),
            vec!["Per K. Ramaswamy J. The bench agreed."]
        );
    }

    #[test]
    fn offsets_are_absolute() {
        let text = "xx One. Two.";
        let got = spans(text, 3, text.len());
        assert_eq!(got, vec![(3, 7), (8, 12)]);
    }

    #[test]
    fn word_spans() {
        let text = "  alpha beta\tgamma ";
        let got: Vec<&str> = words(text, 0, text.len())
            .into_iter()
            .map(|(s, e)| &text[s..e])
            .collect();
        assert_eq!(got, vec!["alpha", "beta", "gamma"]);
    }
}
