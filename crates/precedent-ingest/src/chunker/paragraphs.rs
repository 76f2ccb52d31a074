//! Paragraph segmentation.
//!
//! Lines are separated by `\n` or form feed. A blank line or a form feed
//! closes the current block; a marker line (numbered paragraph, section
//! or subsection) opens a new one.

use precedent_core::models::EntityKind;

use crate::patterns::{RE_PARAGRAPH_NUMBER, RE_SECTION_MARKER, RE_SUBSECTION_MARKER};

/// A trimmed paragraph span in byte offsets of the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub start: usize,
    pub end: usize,
    pub paragraph_number: Option<u32>,
    pub section_marker: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct Line {
    start: usize,
    end: usize,
    /// The line ended at a form feed.
    page_break: bool,
}

fn lines(text: &str) -> Vec<Line> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        if ch == '\n' || ch == '\x0c' {
            out.push(Line {
                start,
                end: i,
                page_break: ch == '\x0c',
            });
            start = i + ch.len_utf8();
        }
    }
    out.push(Line {
        start,
        end: text.len(),
        page_break: false,
    });
    out
}

/// Line span with surrounding whitespace removed; `None` when blank.
fn trimmed(text: &str, line: Line) -> Option<(usize, usize)> {
    let slice = &text[line.start..line.end];
    let lead = slice.len() - slice.trim_start().len();
    let body = slice.trim();
    if body.is_empty() {
        None
    } else {
        Some((line.start + lead, line.start + lead + body.len()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Marker {
    None,
    Paragraph(u32),
    Section(String),
    Subsection(String),
}

fn marker(kind: EntityKind, line: &str) -> Marker {
    if kind.is_judgment() {
        if let Some(n) = RE_PARAGRAPH_NUMBER
            .as_ref()
            .and_then(|re| re.captures(line))
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
        {
            return Marker::Paragraph(n);
        }
    } else if kind.is_legislation() {
        if let Some(m) = RE_SECTION_MARKER
            .as_ref()
            .and_then(|re| re.captures(line))
            .and_then(|caps| caps.get(1))
        {
            return Marker::Section(m.as_str().to_string());
        }
        if let Some(m) = RE_SUBSECTION_MARKER
            .as_ref()
            .and_then(|re| re.captures(line))
            .and_then(|caps| caps.get(1))
        {
            return Marker::Subsection(m.as_str().to_string());
        }
    }
    Marker::None
}

/// Tracks the section/subsection/clause path of legislative text.
#[derive(Debug, Default)]
struct SectionPath {
    section: Option<String>,
    subsection: Option<String>,
    clause: Option<String>,
}

impl SectionPath {
    fn enter_section(&mut self, section: String) {
        self.section = Some(section);
        self.subsection = None;
        self.clause = None;
    }

    /// Numeric markers are subsections; alphabetic ones are clauses of the
    /// current subsection (or of the section when there is none).
    fn enter_subsection(&mut self, marker: String) {
        if marker.starts_with(|c: char| c.is_ascii_digit()) {
            self.subsection = Some(marker);
            self.clause = None;
        } else {
            self.clause = Some(marker);
        }
    }

    fn render(&self) -> Option<String> {
        let mut out = self.section.clone()?;
        if let Some(sub) = &self.subsection {
            out.push_str(&format!("({sub})"));
        }
        if let Some(clause) = &self.clause {
            out.push_str(&format!("({clause})"));
        }
        Some(out)
    }
}

/// Split `text` into paragraph blocks according to the entity kind's
/// conventions.
pub fn split(kind: EntityKind, text: &str) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut open: Option<Block> = None;
    let mut last_paragraph: Option<u32> = None;
    let mut path = SectionPath::default();

    for line in lines(text) {
        match trimmed(text, line) {
            None => {
                blocks.extend(open.take());
            }
            Some((start, end)) => {
                let found = marker(kind, &text[start..end]);
                let opens_block = found != Marker::None || open.is_none();
                match found {
                    Marker::Paragraph(n) => last_paragraph = Some(n),
                    Marker::Section(s) => path.enter_section(s),
                    Marker::Subsection(s) => path.enter_subsection(s),
                    Marker::None => {}
                }
                if opens_block {
                    blocks.extend(open.take());
                    open = Some(Block {
                        start,
                        end,
                        paragraph_number: last_paragraph,
                        section_marker: if kind.is_legislation() {
                            path.render()
                        } else {
                            None
                        },
                    });
                } else if let Some(block) = open.as_mut() {
                    block.end = end;
                }
            }
        }
        if line.page_break {
            blocks.extend(open.take());
        }
    }
    blocks.extend(open);
    blocks
}
