//! Current-line analysis: inline constructs and formatting around the caret,
//! and the word/whitespace/punctuation helpers.

use crate::{
    model::{Mark, Span},
    parsing::{
        blocks::ContentView,
        inline::{ConstructKind, parse_inline},
    },
};

use super::InlineContext;

/// Inline constructs enclosing the caret on one line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineInlines {
    pub link: Option<InlineContext>,
    pub image: Option<InlineContext>,
    pub math: Option<InlineContext>,
    pub footnote: Option<InlineContext>,
    /// Innermost first.
    pub formats: Vec<Mark>,
}

/// Scans `content` (starting at absolute offset `abs`) for what encloses `caret`.
///
/// Atomic constructs must strictly contain the caret: a caret right before
/// `[` or right after `)` is outside the link. A mark is active anywhere from
/// just after its opening delimiter to just before its closing one.
pub fn scan(content: &str, abs: usize, caret: usize) -> LineInlines {
    let scan = parse_inline(&ContentView::contiguous(content, abs), false);
    let mut out = LineInlines::default();
    let mut formats: Vec<(usize, Mark)> = Vec::new();

    for c in &scan.constructs {
        if !(c.span.start < caret && caret < c.span.end) {
            continue;
        }
        let ctx = InlineContext {
            span: c.span,
            content: c.content,
        };
        let slot = match c.kind {
            ConstructKind::Link | ConstructKind::WikiLink => &mut out.link,
            ConstructKind::Image | ConstructKind::WikiEmbed => &mut out.image,
            ConstructKind::Math => &mut out.math,
            ConstructKind::FootnoteRef => &mut out.footnote,
            ConstructKind::Code => {
                formats.push((c.span.len(), Mark::Code));
                continue;
            }
        };
        // Link text may hold an image; keep the innermost of each kind.
        if slot.is_none_or(|s| s.span.encloses(ctx.span)) {
            *slot = Some(ctx);
        }
    }

    for p in &scan.pairs {
        if p.open.end <= caret && caret <= p.close.start {
            formats.push((p.span().len(), p.mark));
        }
    }
    formats.sort_by_key(|(len, _)| *len);
    for (_, mark) in formats {
        if !out.formats.contains(&mark) {
            out.formats.push(mark);
        }
    }
    out
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || (!c.is_alphanumeric() && !c.is_whitespace() && !c.is_control())
}

/// Range of the word touching `col` in `line`, shifted by `abs`.
pub fn word_range(line: &str, col: usize, abs: usize) -> Option<Span> {
    let start = line[..col]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word(*c))
        .last()
        .map_or(col, |(i, _)| i);
    let end = line[col..]
        .char_indices()
        .find(|(_, c)| !is_word(*c))
        .map_or(line.len(), |(i, _)| col + i);
    (start < end).then(|| Span::new(abs + start, abs + end))
}

/// Characters immediately before and after `col`.
pub fn neighbours(line: &str, col: usize) -> (Option<char>, Option<char>) {
    (line[..col].chars().next_back(), line[col..].chars().next())
}

pub fn near_whitespace(line: &str, col: usize) -> bool {
    let (before, after) = neighbours(line, col);
    before.is_some_and(char::is_whitespace) || after.is_some_and(char::is_whitespace)
}

pub fn near_punctuation(line: &str, col: usize) -> bool {
    let (before, after) = neighbours(line, col);
    before.is_some_and(is_punctuation) || after.is_some_and(is_punctuation)
}
