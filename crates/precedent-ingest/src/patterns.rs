//! Compiled patterns shared by the chunker, the citation extractor and
//! the treatment classifier. A pattern that fails to compile is `None`
//! and simply never matches.

use regex::Regex;
use std::sync::LazyLock;

macro_rules! legal_pattern {
    ($name:ident, $regex_str:expr) => {
        pub static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

/// Test a pattern, treating an uncompiled pattern as no match.
pub fn is_match(pattern: &LazyLock<Option<Regex>>, text: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(text))
}

// ── Structural markers (line starts) ──────────────────────────────────────

/// "12. The appellant ..." in a judgment.
legal_pattern!(RE_PARAGRAPH_NUMBER, r"^\s*(\d{1,4})\.\s+");

/// "17. Documents of which ..." in legislation.
legal_pattern!(RE_SECTION_MARKER, r"^\s*(\d{1,4}[A-Z]?)\.\s");

/// "(1) The following ..." or "(a) instruments ...".
legal_pattern!(RE_SUBSECTION_MARKER, r"^\s*\((\d{1,3}[A-Z]?|[a-z]{1,4})\)\s");

// ── Statutory references ──────────────────────────────────────────────────

legal_pattern!(
    RE_SECTION_REF,
    r"\b(?:[Ss][Ee][Cc][Tt][Ii][Oo][Nn][Ss]?|[Ss][Ee][Cc][Ss]?\.?|[Ss]{1,2}\.)\s*(\d{1,4}[A-Z]?)((?:\(\w{1,4}\))*)(?:\s+of\s+(?:the\s+)?((?:[A-Z][\w'-]*\s+(?:(?:of|and|the)\s+)*)+?(?:Act|Code)\b)(?:,\s*(\d{4}))?)?"
);

legal_pattern!(
    RE_ARTICLE_REF,
    r"\b(?:[Aa]rticles?|[Aa]rt\.)\s*(\d{1,3}[A-Z]?)((?:\(\w{1,4}\))*)(?:\s+of\s+the\s+(Constitution))?"
);

legal_pattern!(
    RE_ORDER_RULE_REF,
    r"\b(?:[Oo]rder|O\.)\s*([IVXLC]{1,6}|\d{1,3})\s*,?\s*(?:[Rr]ule|r\.)\s*(\d{1,3}[A-Z]?)"
);

// ── Authority references ──────────────────────────────────────────────────

legal_pattern!(
    RE_CASE_NAME,
    r"\b([A-Z][\w'&-]*(?:\s+(?:(?:of|and|the|&)\s+)*[A-Z][\w'&-]*)*)\s+(?:v\.?|vs\.?|versus)\s+([A-Z][\w'&-]*(?:\s+(?:(?:of|and|the|&)\s+)*[A-Z][\w'&-]*)*)"
);

legal_pattern!(RE_REPORTER_SCC, r"\(\d{4}\)\s+\d{1,3}\s+(?:SCC|SCR|SCALE)\s+\d{1,5}");

legal_pattern!(
    RE_REPORTER_UK,
    r"\[\d{4}\]\s+(?:\d{1,2}\s+)?(?:UKHL|UKSC|UKPC|EWCA Civ|AC|QB|KB|Ch|WLR|All ER)\s+\d{1,5}"
);

legal_pattern!(RE_REPORTER_AIR, r"\bAIR\s+\d{4}\s+[A-Z][A-Za-z]{1,12}\s+\d{1,5}");

legal_pattern!(
    RE_SECONDARY,
    r"\bHalsbury'?s\s+Laws\s+of\s+[A-Z]\w+(?:\s*\(\d{1,2}(?:st|nd|rd|th)\s+[Ee]dn?\.?\))?(?:,?\s*(?:Vol\.?|Volume)\s*\d{1,3})?"
);

// ── Chunk-type signals ────────────────────────────────────────────────────

legal_pattern!(
    RE_DISSENT,
    r"(?i)\b(?:dissent(?:ing)?|i (?:respectfully )?disagree|i am unable to agree|with (?:great )?respect,? i cannot agree)\b"
);

legal_pattern!(
    RE_HOLDING,
    r"(?i)\b(?:we (?:therefore |accordingly )?hold|it is (?:hereby )?held|held that|we are of the (?:view|opinion) that|(?:the )?appeal is (?:accordingly )?(?:allowed|dismissed)|is (?:hereby )?set aside|we answer the question)\b"
);

legal_pattern!(
    RE_ISSUES,
    r"(?i)\b(?:the (?:question|questions|issue|issues|point) (?:before us|for (?:our )?(?:determination|consideration)|that arises?)|(?:question|issue) for determination|the (?:short|sole|only) question)\b"
);

legal_pattern!(
    RE_PROCEDURAL,
    r"(?i)\b(?:(?:petitioner|appellant|plaintiff|respondent)s? (?:challenged|filed|preferred|instituted)|counsel (?:for \w+ )?(?:referred|submitted|contended|argued)|learned counsel|trial court|high court (?:dismissed|allowed)|writ petition|impugned (?:order|judgment)|special leave|leave to appeal|interim order)\b"
);

legal_pattern!(
    RE_FACTS,
    r"(?i)\b(?:the (?:appellant|respondent|petitioner|plaintiff|defendant|accused)|entered into|agreement|the facts|facts of|on the date|executed a|purchased|sold)\b"
);

legal_pattern!(
    RE_REASONING,
    r"(?i)\b(?:in (?:our|my) (?:view|opinion)|it is (?:well )?settled|it follows that|the (?:ratio|principle) (?:of|in)|we (?:are unable to|cannot) accept|section \d+|article \d+)\b"
);

legal_pattern!(RE_ISSUE_WHETHER, r"(?i)^\s*(?:\d+\.\s+)?whether\b");

// ── Treatment signals ─────────────────────────────────────────────────────

legal_pattern!(
    RE_TREAT_OVERRULED,
    r"(?i)\b(?:overrul(?:ed|es|ing)|no longer (?:good|valid) law|(?:stands|is) impliedly overruled)\b"
);

legal_pattern!(RE_TREAT_DISTINGUISHED, r"(?i)\bdistinguish(?:ed|able|es|ing)?\b");

legal_pattern!(
    RE_TREAT_CRITICIZED,
    r"(?i)\b(?:criticis(?:ed|es|ing)|criticiz(?:ed|es|ing)|doubted|per incuriam|wrongly decided)\b"
);

legal_pattern!(
    RE_TREAT_QUALIFIED,
    r"(?i)\b(?:qualified|limited to (?:its|the) (?:own )?facts|read down)\b"
);

legal_pattern!(
    RE_TREAT_HARMONIZED,
    r"(?i)\b(?:harmoni[sz](?:ed|es|ing)|reconciled?)\b"
);

legal_pattern!(
    RE_TREAT_FOLLOWED,
    r"(?i)\bfollow(?:ed|s)\b|\bwe (?:respectfully )?follow\b|\bfollowing (?:the )?(?:decision|judgment|ratio|view)\b"
);

legal_pattern!(RE_TREAT_APPLIED, r"(?i)\b(?:applied|applies|applying)\b");

legal_pattern!(RE_NEGATION, r"(?i)(?:\bnot\b|\bnever\b|n't\b|\bcannot\b)");

legal_pattern!(RE_CONTEXT_COMPARE, r"(?i)(?:\bcf\.|\bcompare\b)");

legal_pattern!(RE_CONTEXT_SEE_ALSO, r"(?i)\bsee also\b");

legal_pattern!(
    RE_CONTEXT_RELIED,
    r"(?i)\b(?:relied (?:on|upon)|placed (?:strong )?reliance|reliance (?:was|is) placed)\b"
);

legal_pattern!(RE_CONTEXT_CONSISTENT, r"(?i)\b(?:consistent with|in line with|in consonance with)\b");

legal_pattern!(RE_CONTEXT_CONTRA, r"(?i)\bcontra\b");
